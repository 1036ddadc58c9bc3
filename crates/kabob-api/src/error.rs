//! # API Error Types
//!
//! Error types for store API calls and client configuration.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       API Error Categories                              │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Remote      │  │       Decoding          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  NoResponse     │  │  2xx body that is not   │ │
//! │  │  InvalidUrl     │  │  Error status + │  │  the expected shape     │ │
//! │  │ ConfigLoadFailed│  │  classified body│  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Every variant converts into a RemoteFailure so the session layer can  │
//! │  hand it to kabob_core::normalize() without matching on transport.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kabob_core::normalize::{ErrorPayload, RemoteFailure};
use thiserror::Error;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Store API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid API configuration: {0}")]
    InvalidConfig(String),

    /// Base URL is not an http(s) URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Remote Errors
    // =========================================================================
    /// The call failed: either no response, or an error status.
    #[error("Store API call failed: {0}")]
    Remote(RemoteFailure),

    /// A success response whose body could not be decoded.
    #[error("Unexpected response body (HTTP {status}): {message}")]
    Decode { status: u16, message: String },
}

impl ApiError {
    /// Converts this error into the failure shape the normalizer accepts.
    ///
    /// Configuration errors mean nothing was sent, so they count as
    /// "no response".
    pub fn into_failure(self) -> RemoteFailure {
        match self {
            ApiError::Remote(failure) => failure,
            ApiError::Decode { status, .. } => RemoteFailure::Response {
                status,
                payload: ErrorPayload::Unrecognized,
            },
            other => RemoteFailure::no_response(other.to_string()),
        }
    }

    /// Returns true if the service was never reached.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Remote(RemoteFailure::NoResponse { .. }))
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

/// Transport errors from reqwest.
///
/// An error carrying a status came from a response; everything else
/// (connect, DNS, reset, timeout) means no response was received.
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ApiError::Remote(RemoteFailure::Response {
                status: status.as_u16(),
                payload: ErrorPayload::Unrecognized,
            }),
            None => ApiError::Remote(RemoteFailure::no_response(err.to_string())),
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ApiError {
    fn from(err: toml::de::Error) -> Self {
        ApiError::ConfigLoadFailed(err.to_string())
    }
}
