//! JSON bodies for errors and plain acknowledgements.

use serde::{Deserialize, Serialize};

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ValidationError,
    Conflict,
    InvalidCredentials,
    Unauthorized,
    Forbidden,
    NotFound,
    StorageError,
    InternalError,
}

/// Error body: `{ "message": ..., "error": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable explanation.
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: Some(code),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_value(ErrorResponse::new(
            ErrorCode::InvalidCredentials,
            "invalid email or password",
        ))
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "message": "invalid email or password",
                "error": "invalid_credentials",
            })
        );
    }

    #[test]
    fn test_error_code_omitted_when_absent() {
        let body = serde_json::to_value(ErrorResponse {
            message: "x".to_string(),
            error: None,
        })
        .unwrap();
        assert!(body.get("error").is_none());
    }
}
