//! HTTP client for the GitHub REST endpoints used by the suggestion tools.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::{GitHubError, Result};
use super::stats::{language_stats, starred_summary};
use super::types::{
    LanguageStats, RawLanguageRepo, RepoSummary, StarredRepo, StarredSummary, UserProfile,
};
use super::validate_username;
use crate::config::GitHubConfig;
use crate::log_debug;

/// Media type GitHub expects for the v3 REST API
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Fetch adapters for a single GitHub API host.
///
/// Every request carries the bearer token, the v3 `Accept` header and the
/// configured `User-Agent`, which GitHub requires.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: Url,
    token: String,
    repos_per_page: u32,
    stats_per_page: u32,
    starred_per_page: u32,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let token = config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(GitHubError::MissingToken)?
            .to_string();

        // Url::join drops the last path segment unless the base ends with '/'
        let mut base = config.api_url.trim_end_matches('/').to_string();
        base.push('/');
        let api_url = Url::parse(&base).map_err(|e| GitHubError::InvalidUrl(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            api_url,
            token,
            repos_per_page: config.repos_per_page,
            stats_per_page: config.stats_per_page,
            starred_per_page: config.starred_per_page,
        })
    }

    /// Base URL requests are resolved against
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self
            .api_url
            .join(path)
            .map_err(|e| GitHubError::InvalidUrl(e.to_string()))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, what: &'static str, url: Url) -> Result<T> {
        log_debug!("GET {} ({})", url, what);

        let response = self.http.get(url).bearer_auth(&self.token).send().await?;

        let status = response.status();
        if !status.is_success() {
            log_debug!("GitHub returned {} for {}", status, what);
            return Err(GitHubError::status(what, status));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| GitHubError::Decode { what, source })
    }

    /// `GET /users/{username}`
    pub async fn fetch_user_profile(&self, username: &str) -> Result<UserProfile> {
        let username = validate_username(username)?;
        log_debug!("Fetching profile for {}", username);

        let url = self.endpoint(&format!("users/{username}"), &[])?;
        self.get_json("GitHub user profile", url).await
    }

    /// The most recently pushed repositories, `GET /users/{username}/repos?sort=pushed`
    pub async fn fetch_repos(&self, username: &str) -> Result<Vec<RepoSummary>> {
        let username = validate_username(username)?;
        log_debug!("Fetching repos for {}", username);

        let url = self.endpoint(
            &format!("users/{username}/repos"),
            &[
                ("sort", "pushed".to_string()),
                ("per_page", self.repos_per_page.to_string()),
            ],
        )?;
        self.get_json("repos from GitHub", url).await
    }

    /// Language usage over the full repository listing
    pub async fn fetch_language_stats(&self, username: &str) -> Result<LanguageStats> {
        let username = validate_username(username)?;
        log_debug!("Analyzing language stats for {}", username);

        let url = self.endpoint(
            &format!("users/{username}/repos"),
            &[
                ("per_page", self.stats_per_page.to_string()),
                ("type", "all".to_string()),
            ],
        )?;
        let repos: Vec<RawLanguageRepo> = self.get_json("repos", url).await?;

        Ok(language_stats(repos.iter().map(|r| r.language.as_deref())))
    }

    /// Recently starred repositories, `GET /users/{username}/starred?sort=created`
    pub async fn fetch_starred_repos(&self, username: &str) -> Result<StarredSummary> {
        let username = validate_username(username)?;
        log_debug!("Fetching starred repos for {}", username);

        let url = self.endpoint(
            &format!("users/{username}/starred"),
            &[
                ("per_page", self.starred_per_page.to_string()),
                ("sort", "created".to_string()),
            ],
        )?;
        let starred: Vec<StarredRepo> = self.get_json("starred repos", url).await?;

        Ok(starred_summary(starred))
    }
}
