use thiserror::Error;

/// Errors raised by the GitHub fetch adapters
#[derive(Debug, Error)]
pub enum GitHubError {
    /// GitHub answered with a non-success status
    #[error("Failed to fetch {what}: {status_text}")]
    Status {
        what: &'static str,
        status: reqwest::StatusCode,
        status_text: String,
    },

    /// The response body did not match the expected shape
    #[error("Unexpected response shape for {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The request never produced a response
    #[error("GitHub request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid GitHub username: {0:?}")]
    InvalidUsername(String),

    #[error("Invalid GitHub API URL: {0}")]
    InvalidUrl(String),

    #[error("No GitHub token configured. Set GITHUB_TOKEN or run `project-muse config --github-token`")]
    MissingToken,
}

impl GitHubError {
    pub(crate) fn status(what: &'static str, status: reqwest::StatusCode) -> Self {
        let status_text = status.canonical_reason().map_or_else(
            || status.as_u16().to_string(),
            ToString::to_string,
        );
        Self::Status {
            what,
            status,
            status_text,
        }
    }

    /// True when the failure was caused by the caller's input rather than GitHub or the network
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidUsername(_))
    }
}

pub type Result<T> = std::result::Result<T, GitHubError>;
