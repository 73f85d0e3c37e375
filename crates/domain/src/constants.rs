//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// API layout
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
pub const DEFAULT_DEV_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Credential persistence
pub const DEFAULT_CREDENTIAL_SERVICE: &str = "devpage";

// Endpoints (relative to the API root)
pub const REGISTER_PATH: &str = "/auth/register";
pub const VERIFY_EMAIL_PATH: &str = "/auth/verify-email";
pub const RESEND_VERIFICATION_CODE_PATH: &str = "/auth/resend-verification-code";
pub const LOGIN_PATH: &str = "/auth/login";
pub const REFRESH_PATH: &str = "/auth/refresh";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const FORGOT_PASSWORD_PATH: &str = "/auth/password/forgot";
pub const RESET_PASSWORD_PATH: &str = "/auth/password/reset";
pub const CURRENT_USER_PATH: &str = "/me";
