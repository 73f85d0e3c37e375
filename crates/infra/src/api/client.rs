//! Authenticated API client
//!
//! Attaches the stored access credential as a bearer token, renews it once
//! on a 401 through the [`RenewalCoordinator`], and normalizes every non-2xx
//! response into a [`NormalizedError`].

use std::sync::Arc;
use std::time::Duration;

use devpage_common::CredentialStore;
use devpage_domain::constants::REFRESH_PATH;
use devpage_domain::ApiConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::errors::{ApiError, NormalizedError};
use super::refresh::{RenewalCoordinator, RenewalFailure};
use super::request::RequestDescriptor;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Body placeholder for verb helpers called without a payload.
pub const NO_BODY: Option<&'static ()> = None;

/// API client with transparent access-token renewal
pub struct ApiClient {
    http: HttpClient,
    store: Arc<dyn CredentialStore>,
    config: ApiConfig,
    api_root: String,
    renewals: RenewalCoordinator,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the base URL is invalid or the HTTP
    /// transport cannot be built
    pub fn new(config: ApiConfig, store: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        let mut http = HttpClient::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(agent) = &config.user_agent {
            http = http.user_agent(agent.clone());
        }
        let http = http
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {}", e)))?;

        Self::with_http_client(config, store, http)
    }

    /// Create a client on top of an existing transport (and its cookie jar).
    pub fn with_http_client(
        config: ApiConfig,
        store: Arc<dyn CredentialStore>,
        http: HttpClient,
    ) -> Result<Self, ApiError> {
        let api_root = config.api_root();
        url::Url::parse(&api_root)
            .map_err(|e| ApiError::Config(format!("Invalid base URL '{}': {}", api_root, e)))?;

        let renewals =
            RenewalCoordinator::new(http.clone(), store.clone(), format!("{api_root}{REFRESH_PATH}"));

        Ok(Self { http, store, config, api_root, renewals })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Credential store the access token lives in.
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn http_client(&self) -> &HttpClient {
        &self.http
    }

    /// Renewal coordinator shared by every request of this client.
    pub fn renewals(&self) -> &RenewalCoordinator {
        &self.renewals
    }

    /// Execute a GET request
    pub async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        include_auth: bool,
    ) -> Result<R, ApiError> {
        self.send(RequestDescriptor::get(path).with_auth(include_auth)).await
    }

    /// Execute a POST request
    pub async fn post<B, R>(
        &self,
        path: &str,
        body: Option<&B>,
        include_auth: bool,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(Self::with_body(RequestDescriptor::post(path), body)?.with_auth(include_auth))
            .await
    }

    /// Execute a PUT request
    pub async fn put<B, R>(
        &self,
        path: &str,
        body: Option<&B>,
        include_auth: bool,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(Self::with_body(RequestDescriptor::put(path), body)?.with_auth(include_auth))
            .await
    }

    /// Execute a DELETE request
    pub async fn delete<B, R>(
        &self,
        path: &str,
        body: Option<&B>,
        include_auth: bool,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(Self::with_body(RequestDescriptor::delete(path), body)?.with_auth(include_auth))
            .await
    }

    /// Issue a request and decode its 2xx body.
    ///
    /// A 401 on an authenticated request triggers one renewal (shared with
    /// any concurrent caller) and one replay with the new token. Whatever
    /// the replay returns is final.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Api`] for any non-2xx response, including a failed
    ///   renewal
    /// - [`ApiError::Transport`] when no response was received
    /// - [`ApiError::Decode`] when a 2xx body does not match `R`
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send<R: DeserializeOwned>(&self, request: RequestDescriptor) -> Result<R, ApiError> {
        let url = format!("{}{}", self.api_root, request.path);
        let token = if request.include_auth { self.store.access_token().await? } else { None };

        let mut response = self.execute(&request, &url, token.as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            // Without a credential at call time there is nothing to renew.
            if let Some(sent_with) = token.as_deref() {
                response = self.renew_and_replay(&request, &url, sent_with, response).await?;
            }
        }

        let result = Self::decode(response).await?;
        debug!("request successful");
        Ok(result)
    }

    async fn renew_and_replay(
        &self,
        request: &RequestDescriptor,
        url: &str,
        sent_with: &str,
        unauthorized: Response,
    ) -> Result<Response, ApiError> {
        let original = Self::normalize(unauthorized).await;

        let token = match self.store.access_token().await? {
            // Renewed (or re-logged in) while this request was in flight.
            Some(current) if current != sent_with => {
                debug!("stored token changed since request was sent, replaying");
                current
            }
            // Cleared by a failed renewal or a logout in the meantime.
            None => return Err(original.into()),
            Some(_) => match self.renewals.renew().await {
                Ok(token) => token,
                Err(RenewalFailure::Rejected(err)) => {
                    info!(code = %err.code, "session could not be renewed");
                    return Err(err.into());
                }
                Err(RenewalFailure::Unavailable(cause)) => {
                    warn!(error = %cause, "token renewal unavailable");
                    return Err(original.into());
                }
            },
        };

        self.execute(request, url, Some(&token)).await
    }

    async fn execute(
        &self,
        request: &RequestDescriptor,
        url: &str,
        token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        Ok(self.http.send(builder).await?)
    }

    async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::normalize(response).await.into());
        }

        // 204/205 have no body by RFC
        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return Self::decode_empty(status);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(InfraError::from(e).into()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::decode_empty(status);
        }
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn decode_empty<R: DeserializeOwned>(status: StatusCode) -> Result<R, ApiError> {
        serde_json::from_value(serde_json::Value::Null).map_err(|_| {
            ApiError::Decode(format!(
                "Empty response ({}), but response type cannot be deserialized from empty body",
                status.as_u16()
            ))
        })
    }

    async fn normalize(response: Response) -> NormalizedError {
        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();
        NormalizedError::from_response_body(status, &body)
    }

    fn with_body<B: Serialize + ?Sized>(
        request: RequestDescriptor,
        body: Option<&B>,
    ) -> Result<RequestDescriptor, ApiError> {
        match body {
            Some(body) => request.json(body),
            None => Ok(request),
        }
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiConfig>,
    store: Option<Arc<dyn CredentialStore>>,
    http: Option<HttpClient>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the credential store
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Reuse an existing transport
    pub fn http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if the credential store is missing or client creation
    /// fails
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        let store = self
            .store
            .ok_or_else(|| ApiError::Config("Credential store not set".to_string()))?;

        match self.http {
            Some(http) => ApiClient::with_http_client(config, store, http),
            None => ApiClient::new(config, store),
        }
    }
}
