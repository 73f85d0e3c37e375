//! Error types used throughout the application

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for devpage
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum DevPageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for devpage operations
pub type Result<T> = std::result::Result<T, DevPageError>;

/// Machine-readable error codes returned by the API.
///
/// Codes the server defines that are not listed here are kept verbatim in
/// [`ErrorCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EmailAlreadyExists,
    ValidationError,
    InvalidCode,
    CodeExpired,
    UserNotFound,
    AlreadyVerified,
    RateLimited,
    InvalidCredentials,
    EmailNotVerified,
    InvalidRefreshToken,
    TokenExpired,
    TokenInvalid,
    Unauthorized,
    Forbidden,
    NotFound,
    BadRequest,
    /// Synthesized when an error body cannot be decoded
    UnknownError,
    Other(String),
}

impl ErrorCode {
    /// Wire representation of the code.
    pub fn as_str(&self) -> &str {
        match self {
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidCode => "INVALID_CODE",
            Self::CodeExpired => "CODE_EXPIRED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::AlreadyVerified => "ALREADY_VERIFIED",
            Self::RateLimited => "RATE_LIMITED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenInvalid => "TOKEN_INVALID",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::Other(code) => code.as_str(),
        }
    }
}

impl FromStr for ErrorCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "EMAIL_ALREADY_EXISTS" => Self::EmailAlreadyExists,
            "VALIDATION_ERROR" => Self::ValidationError,
            "INVALID_CODE" => Self::InvalidCode,
            "CODE_EXPIRED" => Self::CodeExpired,
            "USER_NOT_FOUND" => Self::UserNotFound,
            "ALREADY_VERIFIED" => Self::AlreadyVerified,
            "RATE_LIMITED" => Self::RateLimited,
            "INVALID_CREDENTIALS" => Self::InvalidCredentials,
            "EMAIL_NOT_VERIFIED" => Self::EmailNotVerified,
            "INVALID_REFRESH_TOKEN" => Self::InvalidRefreshToken,
            "TOKEN_EXPIRED" => Self::TokenExpired,
            "TOKEN_INVALID" => Self::TokenInvalid,
            "UNAUTHORIZED" => Self::Unauthorized,
            "FORBIDDEN" => Self::Forbidden,
            "NOT_FOUND" => Self::NotFound,
            "BAD_REQUEST" => Self::BadRequest,
            "UNKNOWN_ERROR" => Self::UnknownError,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<&str> for ErrorCode {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(code) => code,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
