//! Wire shapes of the callable function protocol.
//!
//! Requests wrap their payload in `data`; successful responses wrap theirs in
//! `result`; failures carry an `error` object with a canonical status code.

use serde::{Deserialize, Serialize};

/// Envelope of every callable request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallableRequest<T> {
    pub data: T,
}

/// Payload of the suggestion call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestRequest {
    pub username: String,
}

/// Envelope of a successful response, also the final event of a stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallableResult<T> {
    pub result: T,
}

/// One streamed chunk of model output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMessage {
    pub message: String,
}

/// Canonical error codes used by callable functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallableStatus {
    InvalidArgument,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallableErrorBody {
    pub status: CallableStatus,
    pub message: String,
}

/// Envelope of a failed response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallableError {
    pub error: CallableErrorBody,
}

/// Health check payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_serialize_in_callable_form() {
        let body = CallableError {
            error: CallableErrorBody {
                status: CallableStatus::InvalidArgument,
                message: "bad".to_string(),
            },
        };
        let json = serde_json::to_value(&body).expect("serializes");
        assert_eq!(json["error"]["status"], "INVALID_ARGUMENT");
    }

    #[test]
    fn test_request_requires_data_envelope() {
        let parsed: Result<CallableRequest<SuggestRequest>, _> =
            serde_json::from_str(r#"{"username":"octocat"}"#);
        assert!(parsed.is_err());

        let parsed: CallableRequest<SuggestRequest> =
            serde_json::from_str(r#"{"data":{"username":"octocat"}}"#).expect("valid envelope");
        assert_eq!(parsed.data.username, "octocat");
    }
}
