use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::models::Envelope;

/// Custom error types for the Happy Thoughts service
#[derive(Error, Debug)]
pub enum ThoughtsError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Connection pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("Connection pool creation error: {0}")]
    PoolCreation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("Invalid thought id: {0}")]
    InvalidId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corrupt record {key}: {reason}")]
    CorruptRecord { key: String, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::validation::ValidationError> for ThoughtsError {
    fn from(err: crate::validation::ValidationError) -> Self {
        ThoughtsError::Validation {
            field: err.field().to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for ThoughtsError {
    fn from(err: config::ConfigError) -> Self {
        ThoughtsError::Configuration(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ThoughtsError>;

/// Closed set of error tags exposed to clients.
///
/// Clients match on these, never on `detail` or `message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ValidationFailed,
    InvalidId,
    NotFound,
    StorageError,
    Internal,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::ValidationFailed | ErrorKind::InvalidId => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::StorageError | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ThoughtsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ThoughtsError::Validation { .. } => ErrorKind::ValidationFailed,
            ThoughtsError::InvalidId(_) => ErrorKind::InvalidId,
            ThoughtsError::NotFound(_) => ErrorKind::NotFound,
            ThoughtsError::Redis(_)
            | ThoughtsError::Pool(_)
            | ThoughtsError::PoolCreation(_)
            | ThoughtsError::CorruptRecord { .. } => ErrorKind::StorageError,
            ThoughtsError::Configuration(_) | ThoughtsError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Client-safe description. Driver and pool errors never reach the wire.
    pub fn public_detail(&self) -> String {
        match self {
            ThoughtsError::Validation { reason, .. } => reason.clone(),
            ThoughtsError::InvalidId(_) => "thought id must be a UUID".to_string(),
            ThoughtsError::NotFound(id) => format!("no thought with id {}", id),
            ThoughtsError::Redis(_)
            | ThoughtsError::Pool(_)
            | ThoughtsError::PoolCreation(_)
            | ThoughtsError::CorruptRecord { .. } => "the thought store is unavailable".to_string(),
            ThoughtsError::Configuration(_) | ThoughtsError::Internal(_) => {
                "internal server error".to_string()
            }
        }
    }
}

/// Error payload placed in the envelope's `response` field.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    pub detail: String,
}

/// Handler-boundary error: a service error plus the operation's summary line.
#[derive(Debug)]
pub struct ApiError {
    pub error: ThoughtsError,
    pub message: String,
}

impl ApiError {
    /// Wrap `error` for the response. Not-found and malformed ids carry their
    /// own summary; everything else uses the operation's `fallback`.
    pub fn new(error: ThoughtsError, fallback: &str) -> Self {
        let message = match &error {
            ThoughtsError::NotFound(_) => "Thought not found".to_string(),
            ThoughtsError::InvalidId(_) => "Invalid thought id".to_string(),
            _ => fallback.to_string(),
        };
        Self { error, message }
    }

    pub fn status_code(&self) -> StatusCode {
        self.error.kind().status_code()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}: {}", self.message, self.error);
        } else {
            tracing::warn!("{}: {}", self.message, self.error);
        }

        let body = Envelope::failure(
            ErrorDetail {
                kind: self.error.kind(),
                detail: self.error.public_detail(),
            },
            self.message,
        );
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_to_status_mapping() {
        assert_eq!(ErrorKind::ValidationFailed.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::InvalidId.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::StorageError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorKind::Internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn kind_serializes_as_screaming_snake() {
        let json = serde_json::to_value(ErrorKind::ValidationFailed).unwrap();
        assert_eq!(json, "VALIDATION_FAILED");
        let json = serde_json::to_value(ErrorKind::StorageError).unwrap();
        assert_eq!(json, "STORAGE_ERROR");
    }

    #[test]
    fn storage_faults_do_not_leak_driver_text() {
        let err = ThoughtsError::CorruptRecord {
            key: "HappyThoughts:Thoughts:abc".to_string(),
            reason: "missing field hearts".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::StorageError);
        assert!(!err.public_detail().contains("HappyThoughts"));
        assert!(!err.public_detail().contains("hearts"));
    }

    #[test]
    fn api_error_message_selection() {
        let not_found = ApiError::new(ThoughtsError::NotFound("x".into()), "Could not like thought");
        assert_eq!(not_found.message, "Thought not found");
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let invalid = ApiError::new(ThoughtsError::InvalidId("x".into()), "Could not like thought");
        assert_eq!(invalid.message, "Invalid thought id");
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let internal = ApiError::new(ThoughtsError::Internal("boom".into()), "Could not like thought");
        assert_eq!(internal.message, "Could not like thought");
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_error_converts_with_field() {
        let err: ThoughtsError = crate::validation::ValidationError::MissingMessage.into();
        match err {
            ThoughtsError::Validation { field, .. } => assert_eq!(field, "message"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
