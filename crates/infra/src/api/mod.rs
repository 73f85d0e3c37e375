//! Authenticated API client for devpage
//!
//! This module provides the HTTP client for the devpage API and the
//! authentication endpoints built on it.
//!
//! # Architecture
//!
//! - Uses the shared [`HttpClient`](crate::http::HttpClient) (cookie jar, no
//!   retry)
//! - Bearer access token from a [`CredentialStore`](devpage_common::CredentialStore)
//! - One shared renewal on 401, one replay per request
//! - Every non-2xx response normalized into [`NormalizedError`]
//!
//! # Compliance
//!
//! - Structured tracing only (no println!)
//! - Tokens are never logged
//! - Timeout on all external calls

pub mod auth;
pub mod client;
pub mod errors;
pub mod refresh;
pub mod request;

pub use auth::AuthService;
pub use client::{ApiClient, ApiClientBuilder, NO_BODY};
pub use errors::{ApiError, NormalizedError};
pub use refresh::{RenewalCoordinator, RenewalFailure};
pub use request::RequestDescriptor;
