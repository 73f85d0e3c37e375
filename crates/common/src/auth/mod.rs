//! Access-credential persistence
//!
//! The authenticated API client reads the short-lived bearer credential from a
//! [`CredentialStore`] before every authenticated request, replaces it after a
//! successful login or renewal, and clears it on logout or when renewal fails.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │   CredentialStore    │  trait (single well-known key)
//! └──────────┬───────────┘
//!            │
//!            ├──► MemoryCredentialStore     (process lifetime)
//!            └──► KeychainCredentialStore   (platform keychain, `keychain` feature)
//! ```

#[cfg(feature = "keychain")]
mod keychain;
mod store;
pub mod traits;

/// Account name the access credential is stored under
pub const ACCESS_TOKEN_ACCOUNT: &str = "accessToken";

#[cfg(feature = "keychain")]
pub use keychain::KeychainCredentialStore;
pub use store::MemoryCredentialStore;
pub use traits::{CredentialStore, CredentialStoreError};
