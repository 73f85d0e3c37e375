//! Access-credential storage in the platform keychain.
//!
//! The credential is persisted under one service name and the well-known
//! `accessToken` account, so a restarted process picks up the session it
//! left behind. Backends: macOS Keychain, Windows Credential Manager, and
//! the Linux kernel keyring (`keyutils`, kept for the login session).

use async_trait::async_trait;
use keyring::Entry;
use tracing::debug;

use super::traits::{CredentialStore, CredentialStoreError};
use super::ACCESS_TOKEN_ACCOUNT;

/// Keychain-backed credential store
pub struct KeychainCredentialStore {
    service_name: String,
    entry: Entry,
}

impl KeychainCredentialStore {
    /// Create a store for a specific service
    ///
    /// # Arguments
    /// * `service_name` - Service identifier (e.g., "devpage")
    ///
    /// # Errors
    /// Returns `CredentialStoreError::AccessFailed` if the keychain entry
    /// cannot be created
    pub fn new(service_name: impl Into<String>) -> Result<Self, CredentialStoreError> {
        let service_name = service_name.into();
        let entry = Entry::new(&service_name, ACCESS_TOKEN_ACCOUNT).map_err(|e| {
            CredentialStoreError::AccessFailed(format!(
                "Failed to open keychain entry for {}: {}",
                service_name, e
            ))
        })?;

        Ok(Self { service_name, entry })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

#[async_trait]
impl CredentialStore for KeychainCredentialStore {
    async fn access_token(&self) -> Result<Option<String>, CredentialStoreError> {
        debug!(service = %self.service_name, "Retrieving access token from keychain");

        match self.entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CredentialStoreError::AccessFailed(format!(
                "Failed to retrieve access token: {}",
                e
            ))),
        }
    }

    async fn set_access_token(&self, token: &str) -> Result<(), CredentialStoreError> {
        debug!(service = %self.service_name, "Storing access token in keychain");

        self.entry.set_password(token).map_err(|e| {
            CredentialStoreError::AccessFailed(format!("Failed to store access token: {}", e))
        })
    }

    async fn clear_access_token(&self) -> Result<(), CredentialStoreError> {
        debug!(service = %self.service_name, "Deleting access token from keychain");

        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CredentialStoreError::AccessFailed(format!(
                "Failed to delete access token: {}",
                e
            ))),
        }
    }
}
