//! In-process credential store.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::traits::{CredentialStore, CredentialStoreError};

/// Credential store backed by process memory.
///
/// The credential lives as long as the store; nothing is written to disk.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: RwLock::new(Some(token.into())) }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn access_token(&self) -> Result<Option<String>, CredentialStoreError> {
        Ok(self.token.read().clone())
    }

    async fn set_access_token(&self, token: &str) -> Result<(), CredentialStoreError> {
        *self.token.write() = Some(token.to_string());
        debug!("Access token stored in memory");
        Ok(())
    }

    async fn clear_access_token(&self) -> Result<(), CredentialStoreError> {
        *self.token.write() = None;
        debug!("Access token cleared from memory");
        Ok(())
    }
}
