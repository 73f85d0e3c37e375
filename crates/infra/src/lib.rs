//! # devpage Infrastructure
//!
//! Infrastructure side of the devpage authentication client.
//!
//! This crate contains:
//! - HTTP transport with a persistent cookie jar
//! - Authenticated API client with single-flight token renewal
//! - Authentication endpoint service
//! - Configuration loading (environment, JSON/TOML files)
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Wire types and errors come from `devpage-domain`
//! - Credential persistence comes from `devpage-common`
//! - Contains all "impure" code (network and file I/O)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod logging;

// Re-export commonly used items
pub use api::{ApiClient, ApiError, AuthService, NormalizedError, RequestDescriptor};
pub use errors::InfraError;
pub use http::*;
pub use logging::init_tracing;
