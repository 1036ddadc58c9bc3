//! # kabob-session: Order Submission and Application State
//!
//! Owns the storefront's single application state and the order
//! submission state machine.
//!
//! ## Modules
//!
//! - [`state`] - `AppState` and its shared handle
//! - [`coordinator`] - Single-flight order submission
//! - [`reset`] - Cancellable post-order reset task
//! - [`controller`] - `SessionController`, the entry point for user actions
//! - [`error`] - Session error types

pub mod controller;
pub mod coordinator;
pub mod error;
pub mod reset;
pub mod state;

#[cfg(test)]
mod testing;

pub use controller::SessionController;
pub use coordinator::{OrderCoordinator, RejectReason, SubmitOutcome, SubmitPhase};
pub use error::{SessionError, SessionResult};
pub use reset::ScheduledReset;
pub use state::{AppState, OrderNotice, StateHandle};
