//! # Application State
//!
//! The one mutable structure behind the storefront: cart, customer form,
//! view, fetched data, and the loading and outcome flags the shell renders.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Application State Ownership                        │
//! │                                                                         │
//! │   SessionController ──owns──► StateHandle (Arc<Mutex<AppState>>)       │
//! │          │                          ▲          ▲                        │
//! │          │                          │          │                        │
//! │          └──owns──► OrderCoordinator┘          │                        │
//! │                            │                   │                        │
//! │                            └──spawns──► ScheduledReset                  │
//! │                                                                         │
//! │   All access goes through read()/update() closures, so a lock is       │
//! │   never held across an .await.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use kabob_api::Catalog;
use kabob_core::{
    Cart, CustomerInfo, NormalizedError, OrderRecord, OrderResult, ValidationErrorSet, ViewState,
};
use tracing::warn;

use crate::coordinator::SubmitPhase;

/// The result of the most recent submission, shown on the cart view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderNotice {
    Placed(OrderResult),
    Failed(NormalizedError),
}

impl OrderNotice {
    /// Text shown to the user.
    pub fn message(&self) -> String {
        match self {
            OrderNotice::Placed(result) => {
                format!("Order placed successfully! Order ID: {}", result.id)
            }
            OrderNotice::Failed(error) => error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OrderNotice::Placed(_))
    }
}

/// Everything the shell renders.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    // Working order
    pub cart: Cart,
    pub customer: CustomerInfo,
    pub field_errors: ValidationErrorSet,

    // Navigation
    pub view: ViewState,

    // Catalog
    pub catalog: Catalog,
    pub catalog_loading: bool,
    pub catalog_error: Option<NormalizedError>,

    // History
    pub history: Vec<OrderRecord>,
    pub history_loading: bool,
    pub history_error: Option<NormalizedError>,

    // Submission
    pub submit_phase: SubmitPhase,
    pub order_notice: Option<OrderNotice>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while an order is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submit_phase == SubmitPhase::Submitting
    }
}

/// Shared handle to the single [`AppState`].
#[derive(Debug, Clone, Default)]
pub struct StateHandle {
    inner: Arc<Mutex<AppState>>,
}

impl StateHandle {
    pub fn new(state: AppState) -> Self {
        StateHandle {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Executes a function with read access to the state.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppState) -> R,
    {
        f(&self.lock())
    }

    /// Executes a function with write access to the state.
    pub fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut AppState) -> R,
    {
        f(&mut self.lock())
    }

    /// Clones the current state.
    pub fn snapshot(&self) -> AppState {
        self.read(AppState::clone)
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("App state mutex was poisoned; recovering");
            poisoned.into_inner()
        })
    }
}
