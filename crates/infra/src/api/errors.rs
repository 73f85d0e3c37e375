//! API-specific error types
//!
//! Every HTTP-level failure is normalized into a [`NormalizedError`] built
//! from the server's `{ error: { code, message, details?, requestId } }`
//! envelope. Transport failures are kept apart and never normalized.

use devpage_domain::{DevPageError, ErrorBody, ErrorCode, ErrorEnvelope, FieldError};
use reqwest::StatusCode;
use thiserror::Error;

/// HTTP error as seen by callers: they tell kinds apart by `code`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NormalizedError {
    pub code: String,
    pub message: String,
    pub status: u16,
    pub details: Option<Vec<FieldError>>,
    pub request_id: String,
}

impl NormalizedError {
    /// Build from a decoded error envelope.
    pub fn from_body(status: StatusCode, body: ErrorBody) -> Self {
        Self {
            code: body.code,
            message: body.message,
            status: status.as_u16(),
            details: body.details,
            request_id: body.request_id,
        }
    }

    /// Fallback for bodies that are not a valid error envelope.
    pub fn unknown(status: StatusCode) -> Self {
        Self {
            code: ErrorCode::UnknownError.to_string(),
            message: format!(
                "Error {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            ),
            status: status.as_u16(),
            details: None,
            request_id: String::new(),
        }
    }

    /// Normalize a raw error response body.
    pub fn from_response_body(status: StatusCode, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorEnvelope>(body) {
            Ok(envelope) => Self::from_body(status, envelope.error),
            Err(_) => Self::unknown(status),
        }
    }

    /// Typed view of `code`.
    pub fn kind(&self) -> ErrorCode {
        ErrorCode::from(self.code.as_str())
    }

    pub fn is(&self, code: &ErrorCode) -> bool {
        self.code == code.as_str()
    }

    /// True when the body could not be decoded.
    pub fn is_unknown(&self) -> bool {
        self.is(&ErrorCode::UnknownError)
    }
}

/// API operation errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Non-2xx response, normalized
    #[error(transparent)]
    Api(#[from] NormalizedError),

    /// The transport failed before a response arrived
    #[error(transparent)]
    Transport(#[from] DevPageError),

    /// A 2xx body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Failed to encode request body: {0}")]
    Encode(String),

    #[error("Credential store error: {0}")]
    CredentialStore(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Error code when this is an HTTP-level error.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api(err) => Some(err.code.as_str()),
            _ => None,
        }
    }

    /// HTTP status when this is an HTTP-level error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => Some(err.status),
            _ => None,
        }
    }

    pub fn is_code(&self, code: &ErrorCode) -> bool {
        matches!(self, Self::Api(err) if err.is(code))
    }

    pub fn as_normalized(&self) -> Option<&NormalizedError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<devpage_common::CredentialStoreError> for ApiError {
    fn from(err: devpage_common::CredentialStoreError) -> Self {
        Self::CredentialStore(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_structured_error_body() {
        let body = br#"{
            "error": {
                "code": "VALIDATION_ERROR",
                "message": "Validation failed",
                "details": [{ "field": "email", "message": "Email is required" }],
                "requestId": "req_123"
            }
        }"#;

        let err = NormalizedError::from_response_body(StatusCode::BAD_REQUEST, body);
        assert_eq!(err.code, "VALIDATION_ERROR");
        assert_eq!(err.kind(), ErrorCode::ValidationError);
        assert_eq!(err.status, 400);
        assert_eq!(err.request_id, "req_123");
        assert_eq!(
            err.details,
            Some(vec![FieldError {
                field: "email".to_string(),
                message: "Email is required".to_string()
            }])
        );
        assert_eq!(err.to_string(), "Validation failed");
    }

    #[test]
    fn non_json_body_becomes_unknown_error_with_status() {
        let err =
            NormalizedError::from_response_body(StatusCode::BAD_GATEWAY, b"<html>oops</html>");
        assert!(err.is_unknown());
        assert!(err.message.contains("502"));
        assert_eq!(err.status, 502);
        assert!(err.details.is_none());
        assert!(err.request_id.is_empty());
    }

    #[test]
    fn json_without_error_envelope_becomes_unknown_error() {
        let err = NormalizedError::from_response_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{ "message": "boom" }"#,
        );
        assert!(err.is_unknown());
        assert!(err.message.contains("500"));
    }

    #[test]
    fn server_defined_codes_pass_through_verbatim() {
        let err = NormalizedError::from_response_body(
            StatusCode::PAYMENT_REQUIRED,
            br#"{ "error": { "code": "PLAN_LIMIT", "message": "Upgrade", "requestId": "r" } }"#,
        );
        assert_eq!(err.code, "PLAN_LIMIT");
        assert_eq!(err.kind(), ErrorCode::Other("PLAN_LIMIT".to_string()));
    }

    #[test]
    fn api_error_accessors() {
        let api: ApiError = NormalizedError::unknown(StatusCode::NOT_FOUND).into();
        assert_eq!(api.code(), Some("UNKNOWN_ERROR"));
        assert_eq!(api.status(), Some(404));
        assert!(api.is_code(&ErrorCode::UnknownError));

        let transport: ApiError = DevPageError::Network("refused".into()).into();
        assert_eq!(transport.code(), None);
        assert!(transport.as_normalized().is_none());
    }
}
