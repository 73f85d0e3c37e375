//! Traits for access-credential persistence
//!
//! These traits enable dependency injection and testing by abstracting
//! where the short-lived access credential lives (process memory, system
//! keychain).

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a [`CredentialStore`] backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialStoreError {
    /// The backend could not be reached or refused the operation
    #[error("Credential store access failed: {0}")]
    AccessFailed(String),
}

/// Trait for access-credential storage
///
/// A store holds at most one access credential. Setting a new one
/// overwrites the previous value; clearing an empty store is a no-op.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Current access credential, `None` when signed out
    ///
    /// # Errors
    /// Returns error if the backend cannot be read
    async fn access_token(&self) -> Result<Option<String>, CredentialStoreError>;

    /// Replace the stored access credential
    ///
    /// # Errors
    /// Returns error if the backend cannot be written
    async fn set_access_token(&self, token: &str) -> Result<(), CredentialStoreError>;

    /// Remove the stored access credential (idempotent)
    ///
    /// # Errors
    /// Returns error if the backend cannot be written
    async fn clear_access_token(&self) -> Result<(), CredentialStoreError>;

    /// Whether a credential is currently stored
    ///
    /// Backend failures read as "not stored".
    async fn has_access_token(&self) -> bool {
        matches!(self.access_token().await, Ok(Some(_)))
    }
}
