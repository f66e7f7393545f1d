use crate::log_debug;
use crate::providers::{Provider, ProviderConfig, ProviderError};

use anyhow::{Context, Result, anyhow};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the GitHub token
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
/// Environment variable selecting the provider
pub const PROVIDER_ENV: &str = "PROJECT_MUSE_PROVIDER";
/// Environment variable overriding the server bind address
pub const BIND_ENV: &str = "PROJECT_MUSE_BIND";
/// Port variable set by most container platforms
pub const PORT_ENV: &str = "PORT";

/// Configuration structure for Project Muse
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// GitHub API access
    #[serde(default)]
    pub github: GitHubConfig,
    /// Callable endpoint settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Generation settings for the suggestion flow
    #[serde(default)]
    pub suggestion: SuggestionConfig,
}

/// GitHub API configuration
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct GitHubConfig {
    /// Personal access token sent as a bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// GitHub rejects requests without a User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_repos_per_page")]
    pub repos_per_page: u32,
    #[serde(default = "default_stats_per_page")]
    pub stats_per_page: u32,
    #[serde(default = "default_starred_per_page")]
    pub starred_per_page: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            repos_per_page: default_repos_per_page(),
            stats_per_page: default_stats_per_page(),
            starred_per_page: default_starred_per_page(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// HTTP server configuration
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Route the callable function is mounted on
    #[serde(default = "default_function_path")]
    pub function_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            function_path: default_function_path(),
        }
    }
}

/// Model generation settings
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct SuggestionConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Upper bound on model turns spent calling tools
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u64,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_turns: default_max_turns(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_provider() -> String {
    Provider::default().name().to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    "Project-Muse-Agent".to_string()
}

fn default_repos_per_page() -> u32 {
    15
}

fn default_stats_per_page() -> u32 {
    100
}

fn default_starred_per_page() -> u32 {
    20
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_function_path() -> String {
    "/githubProjectSuggestFunction".to_string()
}

fn default_temperature() -> f64 {
    0.6
}

fn default_max_turns() -> usize {
    8
}

fn default_max_tokens() -> u64 {
    2048
}

impl Config {
    /// Load the personal configuration file and apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());

        log_debug!("Configuration loaded from {}", config_path.display());
        Ok(config)
    }

    /// Load a configuration file, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).map_err(|e| {
            anyhow!(
                "Invalid configuration file format: {}. Please check {} for syntax errors.",
                e,
                path.display()
            )
        })
    }

    /// Apply environment overrides using the given lookup.
    ///
    /// Secrets (`GITHUB_TOKEN`, provider API keys) from the environment win over
    /// the file so deployments never need them written to disk.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(GITHUB_TOKEN_ENV) {
            self.github.token = Some(token);
        }

        if let Some(provider) = non_empty(PROVIDER_ENV) {
            self.default_provider = provider.trim().to_lowercase();
        }

        for provider in Provider::ALL {
            if let Some(key) = non_empty(provider.api_key_env()) {
                self.providers
                    .entry(provider.name().to_string())
                    .or_insert_with(|| ProviderConfig::with_defaults(*provider))
                    .api_key = key;
            }
        }

        if let Some(bind) = non_empty(BIND_ENV) {
            self.server.bind = bind;
        } else if let Some(port) = non_empty(PORT_ENV) {
            self.server.bind = format!("0.0.0.0:{}", port.trim());
        }
    }

    /// Save the configuration to the personal config file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Save the configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        log_debug!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let mut path =
            config_dir().ok_or_else(|| anyhow!("Unable to determine config directory"))?;
        path.push("project-muse");
        path.push("config.toml");
        Ok(path)
    }

    /// The selected provider
    pub fn provider(&self) -> Result<Provider, ProviderError> {
        self.default_provider.parse()
    }

    /// Configuration for a provider, with defaults when it has no section
    pub fn provider_config(&self, provider: Provider) -> ProviderConfig {
        self.providers
            .get(provider.name())
            .cloned()
            .unwrap_or_else(|| ProviderConfig::with_defaults(provider))
    }

    /// API key for a provider, or an error naming the variable to set
    pub fn api_key(&self, provider: Provider) -> Result<String, ProviderError> {
        let provider_config = self.provider_config(provider);
        if provider_config.has_api_key() {
            Ok(provider_config.api_key.trim().to_string())
        } else {
            Err(ProviderError::MissingApiKey(
                provider.name().to_string(),
                provider.api_key_env(),
            ))
        }
    }

    /// Sampling temperature for a provider (provider override, then global)
    pub fn temperature(&self, provider: Provider) -> f64 {
        self.provider_config(provider)
            .temperature
            .unwrap_or(self.suggestion.temperature)
    }

    /// Update the configuration with new values
    pub fn update(
        &mut self,
        provider: Option<Provider>,
        api_key: Option<String>,
        model: Option<String>,
        temperature: Option<f64>,
        github_token: Option<String>,
    ) -> Result<()> {
        if let Some(provider) = provider {
            self.default_provider = provider.name().to_string();
        }

        let provider = self.provider()?;
        let provider_config = self
            .providers
            .entry(provider.name().to_string())
            .or_insert_with(|| ProviderConfig::with_defaults(provider));

        if let Some(key) = api_key {
            provider_config.api_key = key;
        }
        if let Some(model) = model {
            provider_config.model = model;
        }
        if let Some(temperature) = temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(anyhow!("Temperature must be between 0.0 and 2.0"));
            }
            provider_config.temperature = Some(temperature);
        }
        if let Some(token) = github_token {
            self.github.token = Some(token);
        }

        log_debug!("Configuration updated for provider {}", provider);
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let providers = Provider::ALL
            .iter()
            .map(|p| (p.name().to_string(), ProviderConfig::with_defaults(*p)))
            .collect();

        Self {
            default_provider: default_provider(),
            providers,
            github: GitHubConfig::default(),
            server: ServerConfig::default(),
            suggestion: SuggestionConfig::default(),
        }
    }
}
