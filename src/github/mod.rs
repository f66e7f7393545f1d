//! GitHub fetch adapters
//!
//! Four thin wrappers over the GitHub REST API, each issuing a single GET and
//! projecting the response onto the fields the suggestion model needs:
//! - **profile**: `GET /users/{username}`
//! - **repos**: recently pushed repositories
//! - **language stats**: language counts over the full listing
//! - **starred**: what the user stars

pub mod client;
pub mod error;
pub mod stats;
pub mod types;

use regex::Regex;
use std::sync::LazyLock;

pub use client::{GITHUB_ACCEPT, GitHubClient};
pub use error::GitHubError;
pub use types::{
    LanguageCounts, LanguageStats, RepoSummary, StarredRepo, StarredSummary, TopLanguage,
    UserProfile,
};

/// GitHub logins are at most 39 characters
pub const MAX_USERNAME_LEN: usize = 39;

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9-]+$").expect("username pattern is valid")
});

/// Check a username and return it trimmed.
///
/// Only alphanumerics and hyphens, up to 39 characters, so the name stays inside
/// its URL path segment. Hyphen placement is left to GitHub: older accounts
/// still have consecutive or trailing hyphens.
pub fn validate_username(username: &str) -> Result<&str, GitHubError> {
    let trimmed = username.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_USERNAME_LEN || !USERNAME_RE.is_match(trimmed) {
        return Err(GitHubError::InvalidUsername(username.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        for name in [
            "octocat",
            "a",
            "hyper-b1iss",
            " torvalds ",
            "A1-b2-C3",
            "trailing-",
            "double--hyphen",
        ] {
            assert!(validate_username(name).is_ok(), "{name} should be valid");
        }
        assert_eq!(validate_username("  octocat\n").ok(), Some("octocat"));
    }

    #[test]
    fn test_invalid_usernames() {
        let too_long = "a".repeat(MAX_USERNAME_LEN + 1);
        for name in [
            "",
            "   ",
            "has space",
            "../etc",
            "user/repos",
            "ünïcode",
            "dot.name",
            "name?tab=repos",
            too_long.as_str(),
        ] {
            assert!(
                matches!(validate_username(name), Err(GitHubError::InvalidUsername(_))),
                "{name:?} should be rejected"
            );
        }
    }
}
