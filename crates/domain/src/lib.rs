//! # devpage Domain
//!
//! Business domain types for the devpage authentication client.
//!
//! This crate contains:
//! - Wire contracts of the authentication API (requests, responses, error
//!   envelope)
//! - Domain error types, error codes and Result definitions
//! - Client configuration structures
//! - Domain constants (endpoint paths, credential key)
//!
//! ## Architecture
//! - No dependencies on other devpage crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
