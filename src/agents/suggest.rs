//! Project suggestion agent
//!
//! Builds a Rig agent with the mentor prompt and the four GitHub tools, streams
//! every text chunk to a [`StreamingCallback`] and returns the text of the
//! model's final turn as the suggestion.

use anyhow::Result;
use async_trait::async_trait;
use futures::StreamExt;
use rig::agent::MultiTurnStreamItem;
use rig::client::CompletionClient;
use rig::providers::{gemini, openai};
use rig::streaming::{StreamedAssistantContent, StreamingPrompt};
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;

use super::prompts::PromptLibrary;
use super::tools::{
    FetchLanguageStats, FetchRepos, FetchStarredRepos, FetchUserProfile, GitHubToolContext,
    ToolFailures,
};
use crate::config::Config;
use crate::github::{GitHubClient, GitHubError, validate_username};
use crate::providers::{Provider, ProviderError};
use crate::{log_debug, log_info};

/// Trait for streaming callback to handle real-time response processing.
///
/// An error from any method cancels the request with [`SuggestError::Cancelled`].
#[async_trait]
pub trait StreamingCallback: Send + Sync {
    /// Called when a new chunk of text is received.
    ///
    /// Returning an error stops the generation, e.g. when the client went away.
    async fn on_chunk(&self, chunk: &str) -> Result<()>;

    /// Called once with the full text after a successful generation
    async fn on_complete(&self, _full_response: &str) -> Result<()> {
        Ok(())
    }

    /// Called for status updates
    async fn on_status_update(&self, _message: &str) -> Result<()> {
        Ok(())
    }
}

/// Callback that discards everything, for callers that only want the final text
pub struct NoopCallback;

#[async_trait]
impl StreamingCallback for NoopCallback {
    async fn on_chunk(&self, _chunk: &str) -> Result<()> {
        Ok(())
    }
}

/// Reasons a suggestion request fails
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("{0}")]
    InvalidArgument(String),

    /// A GitHub tool failed while the model was gathering data
    #[error("GitHub lookup failed: {0}")]
    Tool(String),

    #[error("Model request failed: {0}")]
    Model(String),

    #[error("The model returned an empty suggestion")]
    EmptyResponse,

    /// The caller stopped listening to the stream
    #[error("Suggestion cancelled: {0}")]
    Cancelled(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    GitHub(GitHubError),
}

impl From<GitHubError> for SuggestError {
    fn from(err: GitHubError) -> Self {
        if err.is_invalid_argument() {
            Self::InvalidArgument(err.to_string())
        } else {
            Self::GitHub(err)
        }
    }
}

impl SuggestError {
    /// True when the request itself was at fault
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Anything that can turn a username into a suggestion
#[async_trait]
pub trait SuggestionEngine: Send + Sync {
    async fn suggest(
        &self,
        username: &str,
        callback: &dyn StreamingCallback,
    ) -> Result<String, SuggestError>;
}

/// The production engine: a hosted model with GitHub tools
#[derive(Debug, Clone)]
pub struct SuggestAgent {
    github: Arc<GitHubClient>,
    provider: Provider,
    model: String,
    api_key: String,
    temperature: f64,
    max_turns: usize,
    max_tokens: u64,
    base_url: Option<String>,
}

/// Provider-specific request parameters.
///
/// Rig's Gemini request body requires a `generationConfig` object, even an
/// empty one; temperature and token limits are merged into it per request.
fn provider_params(provider: Provider) -> Option<Value> {
    match provider {
        Provider::Google => Some(json!({ "generationConfig": {} })),
        Provider::OpenAI => None,
    }
}

impl SuggestAgent {
    /// Build an agent from configuration, failing early on missing secrets
    pub fn from_config(config: &Config) -> Result<Self, SuggestError> {
        let provider = config.provider()?;
        let api_key = config.api_key(provider)?;
        let github = Arc::new(GitHubClient::new(&config.github)?);
        let provider_config = config.provider_config(provider);
        let model = provider_config.effective_model(provider).to_string();
        let base_url = provider_config.base_url().map(str::to_string);

        Ok(Self {
            github,
            provider,
            model,
            api_key,
            temperature: config.temperature(provider),
            max_turns: config.suggestion.max_turns,
            max_tokens: config.suggestion.max_tokens,
            base_url,
        })
    }

    fn gemini_client(&self) -> Result<gemini::Client, SuggestError> {
        let mut builder = gemini::Client::builder(&self.api_key);
        if let Some(url) = self.base_url.as_deref() {
            builder = builder.base_url(url);
        }
        builder
            .build()
            .map_err(|e| SuggestError::Model(format!("Failed to create Gemini client: {e}")))
    }

    fn openai_client(&self) -> openai::Client {
        let mut builder = openai::Client::builder(&self.api_key);
        if let Some(url) = self.base_url.as_deref() {
            builder = builder.base_url(url);
        }
        builder.build()
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn github(&self) -> &Arc<GitHubClient> {
        &self.github
    }
}

#[async_trait]
impl SuggestionEngine for SuggestAgent {
    #[tracing::instrument(name = "suggest", skip(self, callback), fields(provider = %self.provider))]
    async fn suggest(
        &self,
        username: &str,
        callback: &dyn StreamingCallback,
    ) -> Result<String, SuggestError> {
        let username = validate_username(username)?;
        let failures = ToolFailures::new();
        let context = GitHubToolContext::new(Arc::clone(&self.github), failures.clone());
        let prompt = PromptLibrary::project_suggestion(username);

        log_info!(
            "Suggesting a project for {} with {}/{}",
            username,
            self.provider,
            self.model
        );
        callback
            .on_status_update(&format!("Studying {username}'s GitHub profile..."))
            .await
            .map_err(|e| SuggestError::Cancelled(e.to_string()))?;

        // Agent types differ per provider, so the build-and-stream body is shared by macro
        macro_rules! stream_with {
            ($client:expr) => {{
                let builder = $client
                    .agent(&self.model)
                    .preamble(PromptLibrary::mentor_preamble())
                    .temperature(self.temperature)
                    .max_tokens(self.max_tokens)
                    .tool(FetchUserProfile(context.clone()))
                    .tool(FetchRepos(context.clone()))
                    .tool(FetchLanguageStats(context.clone()))
                    .tool(FetchStarredRepos(context.clone()));
                let agent = match provider_params(self.provider) {
                    Some(params) => builder.additional_params(params),
                    None => builder,
                }
                .build();

                let mut stream = agent
                    .stream_prompt(prompt.as_str())
                    .multi_turn(self.max_turns)
                    .await;

                // Text written before a tool call is streamed but not returned
                let mut turn_text = String::new();
                let mut tool_ran = false;
                let mut final_text = None;
                while let Some(item) = stream.next().await {
                    if let Some(failure) = failures.first() {
                        return Err(SuggestError::Tool(failure));
                    }
                    match item {
                        Ok(MultiTurnStreamItem::StreamAssistantItem(
                            StreamedAssistantContent::Text(text),
                        )) => {
                            if tool_ran {
                                turn_text.clear();
                                tool_ran = false;
                            }
                            turn_text.push_str(&text.text);
                            callback
                                .on_chunk(&text.text)
                                .await
                                .map_err(|e| SuggestError::Cancelled(e.to_string()))?;
                        }
                        Ok(MultiTurnStreamItem::StreamUserItem(_)) => tool_ran = true,
                        Ok(MultiTurnStreamItem::FinalResponse(res)) => {
                            final_text = Some(res.response().to_string());
                        }
                        Ok(_) => {}
                        Err(e) => return Err(SuggestError::Model(e.to_string())),
                    }
                }
                final_text.unwrap_or(turn_text)
            }};
        }

        let text = match self.provider {
            Provider::Google => stream_with!(self.gemini_client()?),
            Provider::OpenAI => stream_with!(self.openai_client()),
        };

        if let Some(failure) = failures.first() {
            return Err(SuggestError::Tool(failure));
        }

        let suggestion = text.trim();
        if suggestion.is_empty() {
            return Err(SuggestError::EmptyResponse);
        }

        log_debug!("Suggestion complete, {} chars", suggestion.len());
        callback
            .on_complete(suggestion)
            .await
            .map_err(|e| SuggestError::Cancelled(e.to_string()))?;
        Ok(suggestion.to_string())
    }
}
