#![allow(dead_code)]

use std::sync::Arc;

use devpage_common::testing::MockCredentialStore;
use devpage_domain::ApiConfig;
use devpage_infra::api::{ApiClient, AuthService};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock server plus a client wired to it through an inspectable store.
pub struct TestSession {
    pub server: MockServer,
    pub store: Arc<MockCredentialStore>,
    pub client: Arc<ApiClient>,
    pub auth: AuthService,
}

impl TestSession {
    /// Start a mock server and a client with an empty credential store.
    pub async fn start() -> Self {
        Self::with_store(MockCredentialStore::new()).await
    }

    /// Start with `token` already stored, as after a previous login.
    pub async fn signed_in(token: &str) -> Self {
        Self::with_store(MockCredentialStore::with_token(token)).await
    }

    async fn with_store(store: MockCredentialStore) -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(store);
        let client = ApiClient::builder()
            .config(ApiConfig::new(server.uri()))
            .credential_store(store.clone())
            .build()
            .expect("api client should build");
        let client = Arc::new(client);
        let auth = AuthService::new(client.clone());

        Self { server, store, client, auth }
    }

    /// Mount a `POST /api/v1/auth/refresh` responder expected `times` times.
    pub async fn mount_refresh(&self, template: ResponseTemplate, times: u64) {
        Mock::given(method("POST"))
            .and(path(api_path("/auth/refresh")))
            .respond_with(template)
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Number of requests the server saw for `path` (relative to the API root).
    pub async fn hits(&self, relative: &str) -> usize {
        let full = api_path(relative);
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == full)
            .count()
    }
}

pub fn api_path(relative: &str) -> String {
    format!("/api/v1{}", relative)
}

pub fn user_json() -> Value {
    json!({
        "id": "usr_1",
        "email": "ada@example.com",
        "emailVerifiedAt": "2026-01-05T10:05:00Z",
        "createdAt": "2026-01-05T10:00:00Z",
        "updatedAt": "2026-01-05T10:05:00Z"
    })
}

pub fn error_body(code: &str, message: &str) -> Value {
    json!({ "error": { "code": code, "message": message, "requestId": "req_test" } })
}

pub fn access_token_body(token: &str) -> Value {
    json!({ "accessToken": token })
}
