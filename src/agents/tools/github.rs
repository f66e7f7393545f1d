//! GitHub tools for the suggestion agent
//!
//! Each tool wraps one fetch adapter and takes a single `username` argument.
//! Tool names match the callable names the prompt refers to.

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::common::{ToolFailures, parameters_schema};
use crate::define_tool_error;
use crate::github::{
    GitHubClient, GitHubError, LanguageStats, RepoSummary, StarredSummary, UserProfile,
};
use crate::{log_debug, log_warn};

define_tool_error!(GitHubToolError);

/// Arguments shared by every GitHub tool
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UsernameArgs {
    /// GitHub username (login) to look up
    pub username: String,
}

/// State shared by the GitHub tools of one request
#[derive(Debug, Clone)]
pub struct GitHubToolContext {
    client: Arc<GitHubClient>,
    failures: ToolFailures,
}

impl GitHubToolContext {
    pub fn new(client: Arc<GitHubClient>, failures: ToolFailures) -> Self {
        Self { client, failures }
    }

    pub fn failures(&self) -> &ToolFailures {
        &self.failures
    }

    /// Record adapter failures before handing them back to the model runtime
    fn observe<T>(&self, tool: &str, result: Result<T, GitHubError>) -> Result<T, GitHubToolError> {
        result.map_err(|err| {
            log_warn!("Tool {} failed: {}", tool, err);
            self.failures.record(tool, &err.to_string());
            GitHubToolError::from(err)
        })
    }
}

fn definition(name: &str, description: &str) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        parameters: parameters_schema::<UsernameArgs>(),
    }
}

/// Fetches the public profile of a user
#[derive(Debug, Clone)]
pub struct FetchUserProfile(pub GitHubToolContext);

impl Tool for FetchUserProfile {
    const NAME: &'static str = "fetchGithubUserProfile";
    type Error = GitHubToolError;
    type Args = UsernameArgs;
    type Output = UserProfile;

    async fn definition(&self, _: String) -> ToolDefinition {
        definition(
            Self::NAME,
            "Fetches the public profile of a GitHub user including bio, followers, company, etc.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        log_debug!("🔧 {} called for {}", Self::NAME, args.username);
        let result = self.0.client.fetch_user_profile(&args.username).await;
        self.0.observe(Self::NAME, result)
    }
}

/// Fetches the most recently pushed repositories
#[derive(Debug, Clone)]
pub struct FetchRepos(pub GitHubToolContext);

impl Tool for FetchRepos {
    const NAME: &'static str = "fetchGithubRepos";
    type Error = GitHubToolError;
    type Args = UsernameArgs;
    type Output = Vec<RepoSummary>;

    async fn definition(&self, _: String) -> ToolDefinition {
        definition(
            Self::NAME,
            "Fetches a list of public repositories for a given GitHub username sorted by pushed date (recently updated).",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        log_debug!("🔧 {} called for {}", Self::NAME, args.username);
        let result = self.0.client.fetch_repos(&args.username).await;
        let repos = self.0.observe(Self::NAME, result)?;
        log_debug!("✅ {} returned {} repos", Self::NAME, repos.len());
        Ok(repos)
    }
}

/// Computes language usage across the user's repositories
#[derive(Debug, Clone)]
pub struct FetchLanguageStats(pub GitHubToolContext);

impl Tool for FetchLanguageStats {
    const NAME: &'static str = "fetchLanguageStats";
    type Error = GitHubToolError;
    type Args = UsernameArgs;
    type Output = LanguageStats;

    async fn definition(&self, _: String) -> ToolDefinition {
        definition(
            Self::NAME,
            "Analyzes programming languages used across all repositories to calculate usage statistics.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        log_debug!("🔧 {} called for {}", Self::NAME, args.username);
        let result = self.0.client.fetch_language_stats(&args.username).await;
        self.0.observe(Self::NAME, result)
    }
}

/// Summarizes what the user stars
#[derive(Debug, Clone)]
pub struct FetchStarredRepos(pub GitHubToolContext);

impl Tool for FetchStarredRepos {
    const NAME: &'static str = "fetchStarredRepos";
    type Error = GitHubToolError;
    type Args = UsernameArgs;
    type Output = StarredSummary;

    async fn definition(&self, _: String) -> ToolDefinition {
        definition(
            Self::NAME,
            "Fetches repositories that the user has starred to analyze their interests vs their own work.",
        )
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        log_debug!("🔧 {} called for {}", Self::NAME, args.username);
        let result = self.0.client.fetch_starred_repos(&args.username).await;
        self.0.observe(Self::NAME, result)
    }
}
