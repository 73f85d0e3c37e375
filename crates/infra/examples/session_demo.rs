//! Example: Signing in and calling an authenticated endpoint
//!
//! Logs in, fetches the current user (renewing the access token
//! transparently if the server rejects it), then logs out.
//!
//! # Setup
//!
//! 1. Point the client at a server, either in `.env` or the environment:
//!    ```bash
//!    export DEVPAGE_API_URL=http://localhost:3000
//!    export DEVPAGE_DEMO_EMAIL=ada@example.com
//!    export DEVPAGE_DEMO_PASSWORD=hunter22
//!    ```
//!
//! 2. Run this example: `cargo run -p devpage-infra --example session_demo`
//!
//! Set `DEVPAGE_DEMO_KEYCHAIN=1` to persist the access token in the platform
//! keychain instead of memory.

use std::sync::Arc;

use anyhow::Context;
use devpage_common::{CredentialStore, MemoryCredentialStore};
use devpage_domain::LoginRequest;
use devpage_infra::api::{ApiClient, AuthService};
use devpage_infra::{config, init_tracing};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = config::load().context("loading API configuration")?;
    info!(api_root = %config.api_root(), "Using API");

    let store = credential_store(&config.credential_service)?;
    let client = Arc::new(ApiClient::new(config, store)?);
    let auth = AuthService::new(client);

    let email = std::env::var("DEVPAGE_DEMO_EMAIL").context("DEVPAGE_DEMO_EMAIL not set")?;
    let password =
        std::env::var("DEVPAGE_DEMO_PASSWORD").context("DEVPAGE_DEMO_PASSWORD not set")?;

    if !auth.is_authenticated().await {
        let session = auth.login(&LoginRequest { email, password }).await?;
        info!(user_id = %session.user.id, verified = session.user.is_verified(), "Signed in");
    }

    match auth.current_user().await {
        Ok(me) => info!(email = %me.user.email, "Current user"),
        Err(err) => info!(code = ?err.code(), error = %err, "Could not fetch current user"),
    }

    auth.logout().await?;
    info!("Signed out");
    Ok(())
}

fn credential_store(service: &str) -> anyhow::Result<Arc<dyn CredentialStore>> {
    let use_keychain = std::env::var("DEVPAGE_DEMO_KEYCHAIN").map(|v| v == "1").unwrap_or(false);

    if use_keychain {
        let store = devpage_common::auth::KeychainCredentialStore::new(service)?;
        return Ok(Arc::new(store));
    }

    Ok(Arc::new(MemoryCredentialStore::new()))
}
