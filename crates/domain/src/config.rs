//! Client configuration structures

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_PREFIX, DEFAULT_CREDENTIAL_SERVICE, DEFAULT_DEV_API_URL,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};

/// Configuration for the API client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Server root (e.g., "https://api.devpage.io"), without the version prefix
    pub base_url: String,
    /// Versioned prefix appended to `base_url`
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Transport timeout for a single request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Keychain service name the access credential is stored under
    #[serde(default = "default_credential_service")]
    pub credential_service: String,
}

impl ApiConfig {
    /// Create a config for `base_url` with every other field defaulted.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    /// Versioned API root every endpoint path is appended to.
    pub fn api_root(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.api_prefix)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DEV_API_URL.to_string(),
            api_prefix: default_api_prefix(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            credential_service: default_credential_service(),
        }
    }
}

fn default_api_prefix() -> String {
    DEFAULT_API_PREFIX.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_credential_service() -> String {
    DEFAULT_CREDENTIAL_SERVICE.to_string()
}
