//! # Error Normalizer
//!
//! Reduces every remote failure to one user-facing [`NormalizedError`].
//!
//! ## Classification Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Remote Failure → NormalizedError                     │
//! │                                                                         │
//! │  No response at all ─────────────────────────► ConnectivityFailure     │
//! │                                                                         │
//! │  Error response (status, body)                                         │
//! │        │                                                                │
//! │        ▼  ErrorPayload::classify()  (once, on receipt)                  │
//! │  ┌───────────────────────────────────────────────────────────────┐     │
//! │  │ 1. {"errors": [{field, message}]}    → FieldErrors            │     │
//! │  │ 2. {"detail": [{loc: [...], msg}]}   → LocatedDetails         │     │
//! │  │ 3. {"detail": "<specific text>"}     → Detail                 │     │
//! │  │ 4. anything else                      → Unrecognized          │     │
//! │  └───────────────────────────────────────────────────────────────┘     │
//! │        │                                                                │
//! │        ▼  normalize()                                                   │
//! │  1-3: "Please check your order details" + one line per detail          │
//! │  4:   status banner (400 / 404 / 422 / 5xx / other), no details         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `normalize` is total: every input yields a non-empty message, and the
//! same input always yields the same output.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// User-Facing Messages
// =============================================================================

/// Banner shown whenever specific details could be recovered.
pub const ORDER_DETAILS_BANNER: &str = "Please check your order details";
/// Sole detail line when a structured payload yields nothing usable.
pub const INVALID_DATA_DETAIL: &str = "Invalid data provided";

pub const BAD_REQUEST_MESSAGE: &str = "Invalid order data. Please check your input and try again.";
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed. Please check your order details.";
pub const NOT_FOUND_MESSAGE: &str = "Order service not found. Please try again later.";
pub const SERVER_FAULT_MESSAGE: &str = "Server error. Please try again later.";
pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to reach the order service. Please check your connection and try again.";
pub const UNKNOWN_FAILURE_MESSAGE: &str = "Failed to place order. Please try again.";

/// Placeholder phrases the store API uses as a `detail` when the real
/// information lives elsewhere (or nowhere). Compared case-insensitively.
const GENERIC_DETAILS: &[&str] = &["validation error", "invalid request"];

// =============================================================================
// Failure Taxonomy
// =============================================================================

/// Which 4xx rejection the service answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    BadRequest,
    NotFound,
    Unprocessable,
}

/// Category of a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// 400, 404 or 422.
    RequestRejected(Rejection),
    /// Any 5xx.
    ServerFault,
    /// No response was received.
    ConnectivityFailure,
    /// Anything else.
    UnknownFailure,
}

impl FailureKind {
    /// Maps an HTTP status code to a failure category.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => FailureKind::RequestRejected(Rejection::BadRequest),
            404 => FailureKind::RequestRejected(Rejection::NotFound),
            422 => FailureKind::RequestRejected(Rejection::Unprocessable),
            500..=599 => FailureKind::ServerFault,
            _ => FailureKind::UnknownFailure,
        }
    }

    /// Banner used when no detail could be recovered from the body.
    pub fn banner(&self) -> &'static str {
        match self {
            FailureKind::RequestRejected(Rejection::BadRequest) => BAD_REQUEST_MESSAGE,
            FailureKind::RequestRejected(Rejection::NotFound) => NOT_FOUND_MESSAGE,
            FailureKind::RequestRejected(Rejection::Unprocessable) => VALIDATION_FAILED_MESSAGE,
            FailureKind::ServerFault => SERVER_FAULT_MESSAGE,
            FailureKind::ConnectivityFailure => CONNECTIVITY_MESSAGE,
            FailureKind::UnknownFailure => UNKNOWN_FAILURE_MESSAGE,
        }
    }
}

// =============================================================================
// Error Payload Variants
// =============================================================================

/// One entry of an `errors` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// One entry of a `detail` list: a location path plus message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedDetail {
    pub loc: Vec<String>,
    pub message: String,
}

/// The closed set of error body shapes the client understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorPayload {
    /// `{"errors": [{"field": ..., "message": ...}]}`
    FieldErrors(Vec<FieldError>),
    /// `{"detail": [{"loc": [...], "msg": ...}]}`
    LocatedDetails(Vec<LocatedDetail>),
    /// `{"detail": "..."}` with a specific (non-placeholder) text.
    Detail(String),
    /// Nothing recoverable.
    Unrecognized,
}

impl ErrorPayload {
    /// Classifies a raw response body. Non-JSON bodies are `Unrecognized`.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice::<Value>(body)
            .map(|value| Self::classify(&value))
            .unwrap_or(ErrorPayload::Unrecognized)
    }

    /// Classifies a decoded JSON body. First matching shape wins.
    pub fn classify(value: &Value) -> Self {
        if let Some(entries) = value.get("errors").and_then(Value::as_array) {
            return ErrorPayload::FieldErrors(entries.iter().filter_map(field_error).collect());
        }

        match value.get("detail") {
            Some(Value::Array(entries)) => {
                ErrorPayload::LocatedDetails(entries.iter().filter_map(located_detail).collect())
            }
            Some(Value::String(text)) if !is_generic(text) => {
                ErrorPayload::Detail(text.trim().to_string())
            }
            _ => ErrorPayload::Unrecognized,
        }
    }

    /// Detail lines for shapes 1-3, `None` for `Unrecognized`.
    fn details(&self) -> Option<Vec<String>> {
        match self {
            ErrorPayload::FieldErrors(entries) => Some(
                entries
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect(),
            ),
            ErrorPayload::LocatedDetails(entries) => Some(
                entries
                    .iter()
                    .map(|e| match e.loc.last() {
                        Some(field) => format!("{}: {}", field, e.message),
                        None => e.message.clone(),
                    })
                    .collect(),
            ),
            ErrorPayload::Detail(text) => Some(vec![text.clone()]),
            ErrorPayload::Unrecognized => None,
        }
    }
}

fn field_error(entry: &Value) -> Option<FieldError> {
    let field = entry.get("field").and_then(Value::as_str)?;
    let message = entry
        .get("message")
        .or_else(|| entry.get("msg"))
        .and_then(Value::as_str)?;
    Some(FieldError {
        field: field.to_string(),
        message: message.to_string(),
    })
}

fn located_detail(entry: &Value) -> Option<LocatedDetail> {
    let message = entry.get("msg").and_then(Value::as_str)?;
    let loc = entry
        .get("loc")
        .and_then(Value::as_array)
        .map(|segments| segments.iter().filter_map(segment_text).collect())
        .unwrap_or_default();
    Some(LocatedDetail {
        loc,
        message: message.to_string(),
    })
}

/// Location segments are names or list indices.
fn segment_text(segment: &Value) -> Option<String> {
    match segment {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_generic(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || GENERIC_DETAILS.iter().any(|g| text.eq_ignore_ascii_case(g))
}

// =============================================================================
// Remote Failure
// =============================================================================

/// A failed remote call, classified on receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteFailure {
    /// The request never produced a response (DNS, refused, reset, ...).
    NoResponse { reason: String },
    /// The service answered with an error status.
    Response { status: u16, payload: ErrorPayload },
}

impl RemoteFailure {
    /// Builds a failure from an error response.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        RemoteFailure::Response {
            status,
            payload: ErrorPayload::from_body(body),
        }
    }

    pub fn no_response(reason: impl Into<String>) -> Self {
        RemoteFailure::NoResponse {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            RemoteFailure::NoResponse { .. } => FailureKind::ConnectivityFailure,
            RemoteFailure::Response { status, .. } => FailureKind::from_status(*status),
        }
    }
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteFailure::NoResponse { reason } => write!(f, "no response: {}", reason),
            RemoteFailure::Response { status, payload } => {
                write!(f, "HTTP {} ({:?})", status, payload)
            }
        }
    }
}

// =============================================================================
// Normalized Error
// =============================================================================

/// The uniform `{message, details}` shape shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedError {
    /// Banner line. Never empty.
    pub message: String,
    /// Ordered detail lines, possibly empty.
    pub details: Vec<String>,
    pub kind: FailureKind,
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for detail in &self.details {
            write!(f, "\n  - {}", detail)?;
        }
        Ok(())
    }
}

/// Reduces a remote failure to a [`NormalizedError`].
///
/// ## Example
/// ```rust
/// use kabob_core::normalize::{normalize, RemoteFailure};
///
/// let failure = RemoteFailure::from_response(
///     422,
///     br#"{"errors": [{"field": "email", "message": "invalid"}]}"#,
/// );
/// assert_eq!(normalize(&failure).details, vec!["email: invalid"]);
/// ```
pub fn normalize(failure: &RemoteFailure) -> NormalizedError {
    let kind = failure.kind();

    let details = match failure {
        RemoteFailure::NoResponse { .. } => None,
        RemoteFailure::Response { payload, .. } => payload.details(),
    };

    match details {
        Some(details) => NormalizedError {
            message: ORDER_DETAILS_BANNER.to_string(),
            details: if details.is_empty() {
                vec![INVALID_DATA_DETAIL.to_string()]
            } else {
                details
            },
            kind,
        },
        None => NormalizedError {
            message: kind.banner().to_string(),
            details: Vec::new(),
            kind,
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
