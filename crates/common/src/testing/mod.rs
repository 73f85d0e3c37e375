//! Testing utilities and helpers
//!
//! - **[`mocks`]**: Mock implementations of common traits
//!
//! Enabled for other crates through the `test-utils` feature.

pub mod mocks;

pub use mocks::MockCredentialStore;
