//! Project Muse - next-project suggestions from GitHub activity
//!
//! This library fetches a user's GitHub profile, repositories, language mix and
//! stars, offers them as tools to a hosted model, and turns the model's answer
//! into a shareable suggestion card. The same flow is served as a callable
//! HTTP endpoint.

// Allow certain clippy warnings that are either stylistic or from external dependencies
#![allow(clippy::uninlined_format_args)] // Style preference
#![allow(clippy::format_push_string)] // Performance improvement but stylistic
#![allow(clippy::future_not_send)] // From Rig framework internals, can't fix
#![allow(clippy::return_self_not_must_use)] // Builder pattern is clear enough
#![allow(clippy::items_after_statements)] // Locally-scoped use statements are fine

pub mod agents;
pub mod card;
pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod github;
pub mod logger;
pub mod providers;
pub mod server;
pub mod ui;

// Re-export important structs and functions for easier testing
pub use card::SuggestionCard;
pub use config::Config;
pub use github::{GitHubClient, GitHubError};
pub use providers::{Provider, ProviderConfig};
