//! Conversions from external infrastructure errors into domain errors.

use devpage_domain::DevPageError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub DevPageError);

impl From<InfraError> for DevPageError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DevPageError> for InfraError {
    fn from(value: DevPageError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoDevPageError {
    fn into_devpage(self) -> DevPageError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → DevPageError */
/* -------------------------------------------------------------------------- */

impl IntoDevPageError for HttpError {
    fn into_devpage(self) -> DevPageError {
        if self.is_timeout() {
            return DevPageError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return DevPageError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return DevPageError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => DevPageError::Auth(message),
                400..=499 => DevPageError::InvalidInput(message),
                _ => DevPageError::Network(message),
            };
        }

        DevPageError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_devpage())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
