//! Standardized error types following the `error-alldone-<domain>-<number>` format.

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

/// Response body when `code` or `state` is absent from the callback.
pub const MISSING_CALLBACK_PARAMS_BODY: &str = "Missing 'code' or 'state' parameter.";

/// Response body when the decoded state does not name a device target.
pub const MISSING_DEVICE_TARGET_BODY: &str = "Missing 'device_ip' or 'callback_path' in state.";

/// Response body for any failure the handler did not anticipate.
pub const INTERNAL_SERVER_ERROR_BODY: &str = "Internal Server Error";

/// Configuration errors that occur during application startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error when PORT cannot be parsed
    #[error("error-alldone-config-1 Parsing PORT into u16 failed: {0:?}")]
    PortParsingFailed(std::num::ParseIntError),

    /// Error when version information is not available
    #[error("error-alldone-config-2 One of GIT_HASH or CARGO_PKG_VERSION must be set")]
    VersionNotSet,

    /// Error when the redirect route is not an absolute path
    #[error("error-alldone-config-3 REDIRECT_ROUTE must start with '/': {0:?}")]
    InvalidRoute(String),
}

/// Errors raised while decoding the `state` parameter
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// A `%` not followed by two hex digits
    #[error("error-alldone-state-1 Malformed percent escape at byte {0}")]
    MalformedEscape(usize),

    /// Percent-decoded bytes are not valid UTF-8
    #[error("error-alldone-state-2 Decoded state is not valid UTF-8: {0}")]
    InvalidUtf8(String),
}

/// HTTP server errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Error when template rendering fails
    #[error("error-alldone-http-1 Template rendering failed: {0}")]
    TemplateRenderingFailed(String),
}

/// Outcome of a failed redirect handoff.
///
/// The two `Missing*` variants are client errors and are answered without
/// logging. Everything else is logged and answered with a generic 500.
#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("error-alldone-handoff-1 Missing 'code' or 'state' parameter")]
    MissingCallbackParams,

    #[error("error-alldone-handoff-2 Missing 'device_ip' or 'callback_path' in state")]
    MissingDeviceTarget,

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Http(#[from] HttpError),
}

pub type Result<T> = std::result::Result<T, HandoffError>;

impl IntoResponse for HandoffError {
    fn into_response(self) -> Response {
        match self {
            HandoffError::MissingCallbackParams => {
                (StatusCode::BAD_REQUEST, MISSING_CALLBACK_PARAMS_BODY).into_response()
            }
            HandoffError::MissingDeviceTarget => {
                (StatusCode::BAD_REQUEST, MISSING_DEVICE_TARGET_BODY).into_response()
            }
            err => {
                tracing::error!(error = ?err, "error processing request");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR_BODY).into_response()
            }
        }
    }
}
