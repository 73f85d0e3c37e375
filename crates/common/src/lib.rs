//! Common utilities shared across devpage crates.
//!
//! # Features
//!
//! - `keychain` (default): platform keychain credential store
//! - `test-utils`: expose [`testing`] mocks to downstream test suites

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use auth::{CredentialStore, CredentialStoreError, MemoryCredentialStore};
