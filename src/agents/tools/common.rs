//! Common utilities for agent tools
//!
//! Shared by every GitHub tool:
//! - Schema generation for provider-compatible tool definitions
//! - The per-request failure slot
//! - The tool error macro

use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Keys emitted by schemars that hosted providers reject in tool parameters
const UNSUPPORTED_SCHEMA_KEYS: &[&str] = &["$schema", "title", "definitions", "$defs"];

/// Generate a JSON schema for tool parameters.
///
/// Every property is listed in `required` (`OpenAI` insists on it) and
/// schema metadata Gemini refuses is removed.
pub fn parameters_schema<T: schemars::JsonSchema>() -> Value {
    use schemars::schema_for;

    let schema = schema_for!(T);
    let mut value = serde_json::to_value(schema).unwrap_or_else(|_| Value::Object(Map::new()));
    strip_unsupported_keys(&mut value);
    enforce_required_properties(&mut value);
    value
}

fn strip_unsupported_keys(value: &mut Value) {
    if let Some(obj) = value.as_object_mut() {
        for key in UNSUPPORTED_SCHEMA_KEYS {
            obj.remove(*key);
        }
    }
}

/// Ensure all properties are listed in the `required` array.
fn enforce_required_properties(value: &mut Value) {
    let Some(obj) = value.as_object_mut() else {
        return;
    };

    let props_entry = obj
        .entry("properties")
        .or_insert_with(|| Value::Object(Map::new()));
    let required_keys: Vec<Value> = props_entry
        .as_object()
        .map(|props| props.keys().cloned().map(Value::String).collect())
        .unwrap_or_default();

    obj.insert("required".to_string(), Value::Array(required_keys));
}

/// First tool failure seen during one suggestion request.
///
/// The model runtime turns tool errors into text for the model, so a GitHub
/// failure would otherwise surface as a suggestion built on partial data.
/// The orchestrator checks this slot and fails the request instead.
#[derive(Debug, Clone, Default)]
pub struct ToolFailures {
    first: Arc<Mutex<Option<String>>>,
}

impl ToolFailures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure; only the first one is kept
    pub fn record(&self, tool: &str, message: &str) {
        let mut first = self.first.lock();
        if first.is_none() {
            *first = Some(format!("{tool}: {message}"));
        }
    }

    /// The first recorded failure, if any
    pub fn first(&self) -> Option<String> {
        self.first.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.first.lock().is_none()
    }
}

/// Macro to define a tool error type with standard From implementations.
///
/// This creates a newtype wrapper around String that implements:
/// - `Debug`, `Display`, `std::error::Error`
/// - `From<GitHubError>`
/// - `From<anyhow::Error>`
///
/// # Example
/// ```ignore
/// define_tool_error!(GitHubToolError);
/// // Creates: pub struct GitHubToolError(String);
/// ```
#[macro_export]
macro_rules! define_tool_error {
    ($name:ident) => {
        #[derive(Debug)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::error::Error for $name {}

        impl From<$crate::github::GitHubError> for $name {
            fn from(err: $crate::github::GitHubError) -> Self {
                $name(err.to_string())
            }
        }

        impl From<anyhow::Error> for $name {
            fn from(err: anyhow::Error) -> Self {
                $name(err.to_string())
            }
        }
    };
}

pub use define_tool_error;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(schemars::JsonSchema)]
    #[allow(dead_code)]
    struct Args {
        username: String,
        page: Option<u32>,
    }

    #[test]
    fn test_schema_lists_every_property_as_required() {
        let schema = parameters_schema::<Args>();
        let required = schema["required"].as_array().expect("required array");
        assert_eq!(required.len(), 2);
        assert!(schema.get("$schema").is_none());
        assert!(schema.get("title").is_none());
        assert_eq!(schema["type"], "object");
    }

    #[test]
    fn test_tool_failures_keep_first() {
        let failures = ToolFailures::new();
        assert!(failures.is_empty());
        failures.record("fetchGithubRepos", "Failed to fetch repos from GitHub: Not Found");
        failures.clone().record("fetchStarredRepos", "later");
        assert_eq!(
            failures.first().as_deref(),
            Some("fetchGithubRepos: Failed to fetch repos from GitHub: Not Found")
        );
    }
}
