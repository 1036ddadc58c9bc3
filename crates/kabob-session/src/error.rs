//! # Session Error Types
//!
//! Failures of controller actions. Order submission never fails through
//! this type; it always settles into a [`crate::SubmitOutcome`].

use kabob_api::ApiError;
use kabob_core::{CoreError, NormalizedError};
use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Controller-level error type.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Cart or catalog rule violated (unknown item, unavailable item).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A fetch of the same resource is already running.
    #[error("Already loading {resource}")]
    FetchInProgress { resource: &'static str },

    /// A remote fetch failed. Carries the user-facing error.
    #[error("{0}")]
    Remote(NormalizedError),

    /// The API client could not be built.
    #[error("Store API unavailable: {0}")]
    Api(#[from] ApiError),
}

impl SessionError {
    /// Returns true if this error only means "try again once the fetch ends".
    pub fn is_in_progress(&self) -> bool {
        matches!(self, SessionError::FetchInProgress { .. })
    }
}
