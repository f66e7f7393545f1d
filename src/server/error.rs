//! API error types and handling

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::protocol::{CallableError, CallableErrorBody, CallableStatus};
use crate::agents::SuggestError;

/// Errors surfaced to callable clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> CallableStatus {
        match self {
            Self::InvalidArgument(_) => CallableStatus::InvalidArgument,
            Self::Internal(_) => CallableStatus::Internal,
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The body sent to clients, both as a JSON response and as a stream event
    pub fn body(&self) -> CallableError {
        CallableError {
            error: CallableErrorBody {
                status: self.status(),
                message: self.to_string(),
            },
        }
    }
}

impl From<SuggestError> for ApiError {
    fn from(err: SuggestError) -> Self {
        if err.is_invalid_argument() {
            Self::InvalidArgument(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.http_status(), Json(self.body())).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
