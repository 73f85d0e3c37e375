//! Mock implementations of common traits

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::auth::{CredentialStore, CredentialStoreError};

/// In-memory credential store that counts every operation.
///
/// Set [`fail_reads`](Self::fail_reads) / [`fail_writes`](Self::fail_writes)
/// to make the store return `AccessFailed`.
#[derive(Debug, Default)]
pub struct MockCredentialStore {
    token: Mutex<Option<String>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    clears: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::default();
        *store.token.lock() = Some(token.into());
        store
    }

    /// Current token without touching the counters.
    pub fn peek(&self) -> Option<String> {
        self.token.lock().clone()
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
    async fn access_token(&self) -> Result<Option<String>, CredentialStoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CredentialStoreError::AccessFailed("mock read failure".into()));
        }
        Ok(self.token.lock().clone())
    }

    async fn set_access_token(&self, token: &str) -> Result<(), CredentialStoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CredentialStoreError::AccessFailed("mock write failure".into()));
        }
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    async fn clear_access_token(&self) -> Result<(), CredentialStoreError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CredentialStoreError::AccessFailed("mock write failure".into()));
        }
        *self.token.lock() = None;
        Ok(())
    }
}
