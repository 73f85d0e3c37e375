//! Access-token renewal with a single in-flight operation
//!
//! State machine: `idle → renewing → (resolved | failed) → idle`.
//!
//! The first caller that needs a new access token starts the renewal and
//! parks it in the pending slot as a shared future. Every caller arriving
//! while the slot is occupied awaits that same future, so one `POST
//! /auth/refresh` serves any number of concurrent 401s. The renewal itself
//! stores (or clears) the credential and empties the slot before its result
//! is handed out. It is also spawned onto the runtime, so a renewal whose
//! callers were all cancelled still settles and frees the slot.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use devpage_common::CredentialStore;
use devpage_domain::{ErrorCode, RefreshResponse};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use tracing::{debug, info, instrument, warn};

use super::errors::{ApiError, NormalizedError};
use crate::http::HttpClient;

/// Why a renewal did not produce a new access token
#[derive(Debug, Clone)]
pub enum RenewalFailure {
    /// The renewal endpoint answered with a non-2xx status
    Rejected(NormalizedError),
    /// No HTTP-level answer: transport failure or an undecodable success body
    Unavailable(ApiError),
}

impl From<RenewalFailure> for ApiError {
    fn from(failure: RenewalFailure) -> Self {
        match failure {
            RenewalFailure::Rejected(err) => ApiError::Api(err),
            RenewalFailure::Unavailable(err) => err,
        }
    }
}

pub type RenewalResult = Result<String, RenewalFailure>;

type PendingRenewal = Shared<BoxFuture<'static, RenewalResult>>;

/// Coordinates access-token renewal for one API client.
pub struct RenewalCoordinator {
    http: HttpClient,
    store: Arc<dyn CredentialStore>,
    refresh_url: String,
    pending: Arc<Mutex<Option<PendingRenewal>>>,
    started: AtomicUsize,
}

impl RenewalCoordinator {
    pub fn new(
        http: HttpClient,
        store: Arc<dyn CredentialStore>,
        refresh_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            store,
            refresh_url: refresh_url.into(),
            pending: Arc::new(Mutex::new(None)),
            started: AtomicUsize::new(0),
        }
    }

    /// Obtain a new access token, joining the in-flight renewal if any.
    ///
    /// On success the token is already stored. On failure the stored token
    /// has been cleared.
    #[instrument(skip(self))]
    pub async fn renew(&self) -> RenewalResult {
        let renewal = {
            let mut slot = self.pending.lock();
            match slot.as_ref() {
                Some(pending) => {
                    debug!("Joining in-flight token renewal");
                    pending.clone()
                }
                None => {
                    self.started.fetch_add(1, Ordering::SeqCst);
                    debug!("Starting token renewal");
                    let renewal = run_renewal(
                        self.http.clone(),
                        self.store.clone(),
                        self.refresh_url.clone(),
                        self.pending.clone(),
                    )
                    .boxed()
                    .shared();
                    *slot = Some(renewal.clone());
                    // Runs to completion even if every caller stops waiting.
                    tokio::spawn(renewal.clone());
                    renewal
                }
            }
        };

        renewal.await
    }

    /// Whether a renewal is currently in flight.
    ///
    /// Turns false once the renewal settles, whether or not anyone is still
    /// awaiting it.
    pub fn is_renewing(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// Number of renewal calls started over the coordinator's lifetime.
    pub fn renewals_started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

async fn run_renewal(
    http: HttpClient,
    store: Arc<dyn CredentialStore>,
    refresh_url: String,
    pending: Arc<Mutex<Option<PendingRenewal>>>,
) -> RenewalResult {
    let result = match request_new_token(&http, &refresh_url).await {
        Ok(token) => {
            if let Err(err) = store.set_access_token(&token).await {
                warn!(error = %err, "Renewed access token could not be stored");
            }
            info!("Access token renewed");
            Ok(token)
        }
        Err(failure) => {
            warn!(?failure, "Access token renewal failed, clearing stored credential");
            if let Err(err) = store.clear_access_token().await {
                warn!(error = %err, "Failed to clear stored credential");
            }
            Err(failure)
        }
    };

    *pending.lock() = None;
    result
}

async fn request_new_token(http: &HttpClient, refresh_url: &str) -> RenewalResult {
    let request = http
        .request(Method::POST, refresh_url)
        .header(CONTENT_TYPE, "application/json");

    let response = http
        .send(request)
        .await
        .map_err(|err| RenewalFailure::Unavailable(ApiError::Transport(err)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.bytes().await.unwrap_or_default();
        let err = NormalizedError::from_response_body(status, &body);
        if err.is_unknown() {
            return Err(RenewalFailure::Rejected(NormalizedError {
                code: ErrorCode::InvalidRefreshToken.to_string(),
                message: "Session expired, please sign in again".to_string(),
                ..err
            }));
        }
        return Err(RenewalFailure::Rejected(err));
    }

    let body = response
        .bytes()
        .await
        .map_err(|err| RenewalFailure::Unavailable(ApiError::Decode(err.to_string())))?;
    let refreshed: RefreshResponse = serde_json::from_slice(&body)
        .map_err(|err| RenewalFailure::Unavailable(ApiError::Decode(err.to_string())))?;

    Ok(refreshed.access_token)
}
