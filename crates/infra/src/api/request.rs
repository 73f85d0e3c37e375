//! Request descriptor consumed by [`ApiClient::send`](super::ApiClient::send)

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::errors::ApiError;

/// One logical API call: method, path relative to the API root, optional
/// JSON body, and whether the stored access credential should be attached.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub include_auth: bool,
}

impl RequestDescriptor {
    /// Authenticated request without a body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: None, include_auth: true }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Whether to attach the bearer credential (default `true`).
    pub fn with_auth(mut self, include_auth: bool) -> Self {
        self.include_auth = include_auth;
        self
    }
}
