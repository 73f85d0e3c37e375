//! Domain types and models
//!
//! Wire contracts of the authentication API.

pub mod auth;
pub mod user;

pub use auth::{
    AckStatus, CurrentUserResponse, EmailRequest, ErrorBody, ErrorEnvelope, FieldError,
    LoginRequest, LoginResponse, NextAction, NextStep, RefreshResponse, RegisterRequest,
    RegisterResponse, ResetPasswordRequest, StatusResponse, VerifyEmailRequest,
    VerifyEmailResponse,
};
pub use user::User;
