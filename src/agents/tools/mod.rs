//! Agent tools module
//!
//! The tools offered to the suggestion model. Each wraps one GitHub fetch
//! adapter:
//! - **`FetchUserProfile`**: public profile
//! - **`FetchRepos`**: recently pushed repositories
//! - **`FetchLanguageStats`**: language usage statistics
//! - **`FetchStarredRepos`**: starred repositories summary

pub mod common;
pub mod github;

pub use common::{ToolFailures, parameters_schema};
pub use github::{
    FetchLanguageStats, FetchRepos, FetchStarredRepos, FetchUserProfile, GitHubToolContext,
    GitHubToolError, UsernameArgs,
};

/// Names of every tool, in the order they are attached to the agent
pub const TOOL_NAMES: &[&str] = &[
    "fetchGithubUserProfile",
    "fetchGithubRepos",
    "fetchLanguageStats",
    "fetchStarredRepos",
];
