//! Authentication endpoints
//!
//! Thin layer over [`ApiClient`] for the `/auth/*` and `/me` endpoints.
//! Login stores the issued access token; logout clears it whatever the
//! server answers.

use std::sync::Arc;

use devpage_domain::constants::{
    CURRENT_USER_PATH, FORGOT_PASSWORD_PATH, LOGIN_PATH, LOGOUT_PATH, REGISTER_PATH,
    RESEND_VERIFICATION_CODE_PATH, RESET_PASSWORD_PATH, VERIFY_EMAIL_PATH,
};
use devpage_domain::{
    CurrentUserResponse, EmailRequest, LoginRequest, LoginResponse, RefreshResponse,
    RegisterRequest, RegisterResponse, ResetPasswordRequest, StatusResponse, VerifyEmailRequest,
    VerifyEmailResponse,
};
use serde::de::IgnoredAny;
use tracing::{info, instrument, warn};

use super::client::{ApiClient, NO_BODY};
use super::errors::ApiError;

/// Account and session operations
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Create an account. The server emails a verification code.
    #[instrument(skip_all)]
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.client.post(REGISTER_PATH, Some(request), false).await
    }

    #[instrument(skip_all)]
    pub async fn verify_email(
        &self,
        request: &VerifyEmailRequest,
    ) -> Result<VerifyEmailResponse, ApiError> {
        self.client.post(VERIFY_EMAIL_PATH, Some(request), false).await
    }

    #[instrument(skip_all)]
    pub async fn resend_verification_code(
        &self,
        email: &str,
    ) -> Result<StatusResponse, ApiError> {
        let request = EmailRequest { email: email.to_string() };
        self.client.post(RESEND_VERIFICATION_CODE_PATH, Some(&request), false).await
    }

    /// Sign in and store the issued access token.
    ///
    /// The long-lived renewal credential arrives as a cookie and stays in
    /// the transport's cookie jar.
    #[instrument(skip_all)]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response: LoginResponse = self.client.post(LOGIN_PATH, Some(request), false).await?;
        self.client.credentials().set_access_token(&response.access_token).await?;
        info!(user_id = %response.user.id, "logged in");
        Ok(response)
    }

    /// Renew the access token now, sharing any renewal already in flight.
    pub async fn refresh(&self) -> Result<RefreshResponse, ApiError> {
        let access_token = self.client.renewals().renew().await?;
        Ok(RefreshResponse { access_token })
    }

    /// Sign out. The stored access token is cleared even if the call fails.
    #[instrument(skip_all)]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.client.post::<_, IgnoredAny>(LOGOUT_PATH, NO_BODY, true).await;
        let cleared = self.client.credentials().clear_access_token().await;

        match result {
            Ok(_) => {
                cleared?;
                info!("logged out");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "logout request failed, local session cleared");
                Err(err)
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn forgot_password(&self, email: &str) -> Result<StatusResponse, ApiError> {
        let request = EmailRequest { email: email.to_string() };
        self.client.post(FORGOT_PASSWORD_PATH, Some(&request), false).await
    }

    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<StatusResponse, ApiError> {
        self.client.post(RESET_PASSWORD_PATH, Some(request), false).await
    }

    /// Profile of the signed-in user.
    pub async fn current_user(&self) -> Result<CurrentUserResponse, ApiError> {
        self.client.get(CURRENT_USER_PATH, true).await
    }

    /// Whether an access token is stored. Says nothing about its validity.
    pub async fn is_authenticated(&self) -> bool {
        self.client.credentials().has_access_token().await
    }
}
