//! Agent system for Project Muse
//!
//! The suggestion flow: a mentor prompt, the GitHub tools, and a streaming
//! engine that runs them on a hosted model.

pub mod prompts;
pub mod suggest;
pub mod tools;

pub use prompts::PromptLibrary;
pub use suggest::{
    NoopCallback, StreamingCallback, SuggestAgent, SuggestError, SuggestionEngine,
};
