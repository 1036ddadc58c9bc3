//! # Order Submission Coordinator
//!
//! Validates the working order, submits it once, and settles the outcome
//! into the application state.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Submission Lifecycle                           │
//! │                                                                         │
//! │   submit()                                                              │
//! │      │  empty cart / already Submitting ──► Rejected (no state change) │
//! │      ▼                                                                  │
//! │   ┌──────┐    ┌────────────┐  errors   ┌─────────┐                      │
//! │   │ Idle │───►│ Validating │──────────►│ Invalid │──► Idle             │
//! │   └──────┘    └─────┬──────┘           └─────────┘                      │
//! │       ▲             │ valid                                             │
//! │       │             ▼                                                   │
//! │       │      ┌────────────┐   Ok    ┌───────────┐                       │
//! │       │      │ Submitting │────────►│ Succeeded │──► Idle + reset task  │
//! │       │      └─────┬──────┘         └───────────┘                       │
//! │       │            │ Err                                                │
//! │       │            ▼                                                    │
//! │       │      ┌────────┐                                                 │
//! │       └──────│ Failed │  normalized error shown, cart/customer kept     │
//! │              └────────┘                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The phase lives in [`AppState`], so the busy check and the move to
//! `Submitting` happen under one lock. A second `submit` arriving while the
//! first is in flight is dropped, not queued.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use kabob_api::StoreApi;
use kabob_core::validation::{validate, validate_lines};
use kabob_core::{normalize, NormalizedError, OrderLine, OrderRequest, OrderResult, ValidationErrorSet};
use tracing::{debug, info, warn};

use crate::reset::ScheduledReset;
use crate::state::{AppState, OrderNotice, StateHandle};

// =============================================================================
// Phase / Outcome Types
// =============================================================================

/// Where the coordinator is in a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Validating,
    Invalid,
    Submitting,
    Succeeded,
    Failed,
}

/// Why a submit call was dropped without doing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyCart,
    AlreadySubmitting,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::EmptyCart => write!(f, "Your cart is empty"),
            RejectReason::AlreadySubmitting => write!(f, "An order is already being placed"),
        }
    }
}

/// How a submit call settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Dropped before validation. No remote call.
    Rejected(RejectReason),
    /// Local validation failed. No remote call.
    Invalid(ValidationErrorSet),
    /// Order created. A reset is scheduled.
    Succeeded(OrderResult),
    /// Remote call failed. Cart and customer are kept.
    Failed(NormalizedError),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded(_))
    }
}

// =============================================================================
// Coordinator
// =============================================================================

/// Single-flight order submission.
pub struct OrderCoordinator {
    api: Arc<dyn StoreApi>,
    state: StateHandle,
    reset_delay: Duration,
    pending_reset: Mutex<Option<ScheduledReset>>,
}

impl OrderCoordinator {
    pub fn new(api: Arc<dyn StoreApi>, state: StateHandle, reset_delay: Duration) -> Self {
        OrderCoordinator {
            api,
            state,
            reset_delay,
            pending_reset: Mutex::new(None),
        }
    }

    /// Submits the cart and customer currently in the application state.
    pub async fn submit(&self) -> SubmitOutcome {
        let request = match self.state.update(begin_submission) {
            Ok(request) => request,
            Err(outcome) => return outcome,
        };

        // A reset left over from the previous order must not clear this one.
        self.cancel_pending_reset();

        info!(
            lines = request.lines.len(),
            total = %request.total(),
            "Submitting order"
        );

        match self.api.create_order(&request).await {
            Ok(order) => {
                info!(order_id = %order.id, status = %order.status, "Order placed");
                self.state.update(|s| {
                    transition(s, SubmitPhase::Succeeded);
                    s.order_notice = Some(OrderNotice::Placed(order.clone()));
                    transition(s, SubmitPhase::Idle);
                });

                // The notice must be set before the reset can run.
                let reset = ScheduledReset::spawn(self.state.clone(), self.reset_delay, order.id.clone());
                self.replace_pending_reset(reset);
                SubmitOutcome::Succeeded(order)
            }
            Err(err) => {
                let failure = err.into_failure();
                let normalized = normalize(&failure);
                warn!(
                    failure = %failure,
                    kind = ?normalized.kind,
                    details = normalized.details.len(),
                    "Order submission failed"
                );

                self.state.update(|s| {
                    transition(s, SubmitPhase::Failed);
                    s.order_notice = Some(OrderNotice::Failed(normalized.clone()));
                    transition(s, SubmitPhase::Idle);
                });
                SubmitOutcome::Failed(normalized)
            }
        }
    }

    /// Cancels a pending post-order reset. Returns true if one was pending.
    pub fn cancel_pending_reset(&self) -> bool {
        match self.pending().take() {
            Some(reset) => {
                let was_pending = reset.is_pending();
                reset.cancel();
                was_pending
            }
            None => false,
        }
    }

    pub fn has_pending_reset(&self) -> bool {
        self.pending().as_ref().is_some_and(ScheduledReset::is_pending)
    }

    pub fn reset_delay(&self) -> Duration {
        self.reset_delay
    }

    /// Cancels anything scheduled. Called when the session ends.
    pub fn shutdown(&self) {
        if self.cancel_pending_reset() {
            debug!("Pending reset cancelled on shutdown");
        }
    }

    fn replace_pending_reset(&self, reset: ScheduledReset) {
        if let Some(previous) = self.pending().replace(reset) {
            previous.cancel();
        }
    }

    fn pending(&self) -> MutexGuard<'_, Option<ScheduledReset>> {
        self.pending_reset.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs under the state lock: guards, validation, and the move to
/// `Submitting`. Returns the request to send, or the outcome to report.
fn begin_submission(s: &mut AppState) -> Result<OrderRequest, SubmitOutcome> {
    if s.is_submitting() {
        debug!("Submit dropped: order already in flight");
        return Err(SubmitOutcome::Rejected(RejectReason::AlreadySubmitting));
    }
    if s.cart.is_empty() {
        debug!("Submit dropped: cart is empty");
        return Err(SubmitOutcome::Rejected(RejectReason::EmptyCart));
    }

    transition(s, SubmitPhase::Validating);
    let mut errors = validate(&s.customer);
    errors.merge(validate_lines(&s.cart));

    if !errors.is_empty() {
        transition(s, SubmitPhase::Invalid);
        info!(errors = %errors, "Order rejected by validation");
        s.field_errors = errors.clone();
        transition(s, SubmitPhase::Idle);
        return Err(SubmitOutcome::Invalid(errors));
    }

    s.field_errors.clear();
    s.order_notice = None;
    transition(s, SubmitPhase::Submitting);

    Ok(OrderRequest {
        customer_name: s.customer.name.trim().to_string(),
        customer_email: s.customer.email.trim().to_string(),
        lines: s.cart.lines().iter().map(OrderLine::from).collect(),
    })
}

fn transition(s: &mut AppState, to: SubmitPhase) {
    let from = std::mem::replace(&mut s.submit_phase, to);
    debug!(?from, ?to, "Submission phase");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{menu, valid_customer, wait_until, FakeStoreApi, BEEF_ID, CHICKEN_ID};
    use kabob_core::normalize::{
        FailureKind, RemoteFailure, CONNECTIVITY_MESSAGE, ORDER_DETAILS_BANNER, SERVER_FAULT_MESSAGE,
    };
    use kabob_core::validation::{FIELD_EMAIL, FIELD_NAME};
    use kabob_core::{CustomerInfo, Money};
    use tokio::sync::Notify;

    const DELAY: Duration = Duration::from_millis(3000);

    fn setup(api: FakeStoreApi) -> (Arc<FakeStoreApi>, StateHandle, OrderCoordinator) {
        let api = Arc::new(api);
        let state = StateHandle::default();
        let coordinator = OrderCoordinator::new(api.clone(), state.clone(), DELAY);
        (api, state, coordinator)
    }

    fn fill(state: &StateHandle, customer: CustomerInfo) {
        let items = menu();
        state.update(|s| {
            s.cart.add_item(&items[0]).unwrap();
            s.cart.add_item(&items[0]).unwrap();
            s.cart.add_item(&items[1]).unwrap();
            s.customer = customer;
        });
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected_without_remote_call() {
        let (api, state, coordinator) = setup(FakeStoreApi::new());
        state.update(|s| s.customer = valid_customer());

        let outcome = coordinator.submit().await;

        assert_eq!(outcome, SubmitOutcome::Rejected(RejectReason::EmptyCart));
        assert_eq!(api.order_calls(), 0);
        assert_eq!(state.read(|s| s.submit_phase), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn test_invalid_customer_never_reaches_the_network() {
        let (api, state, coordinator) = setup(FakeStoreApi::new());
        fill(&state, CustomerInfo::new("", "sam@example"));

        let outcome = coordinator.submit().await;

        let SubmitOutcome::Invalid(errors) = outcome else {
            panic!("expected Invalid");
        };
        assert!(errors.contains(FIELD_NAME));
        assert!(errors.contains(FIELD_EMAIL));
        assert_eq!(api.order_calls(), 0);
        state.read(|s| {
            assert_eq!(s.field_errors, errors);
            assert_eq!(s.submit_phase, SubmitPhase::Idle);
            assert_eq!(s.cart.item_count(), 3);
        });
    }

    #[tokio::test]
    async fn test_oversized_line_is_invalid() {
        let (api, state, coordinator) = setup(FakeStoreApi::new());
        fill(&state, valid_customer());
        state.update(|s| s.cart.update_quantity(BEEF_ID, 101)).unwrap();

        let outcome = coordinator.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Invalid(ref e) if e.contains("items")));
        assert_eq!(api.order_calls(), 0);
    }

    #[tokio::test]
    async fn test_request_is_built_from_cart_and_trimmed_customer() {
        let (api, state, coordinator) = setup(FakeStoreApi::new());
        fill(&state, CustomerInfo::new("  Sam Lee ", " sam@example.com"));

        assert!(coordinator.submit().await.is_success());

        let request = api.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.customer_name, "Sam Lee");
        assert_eq!(request.customer_email, "sam@example.com");
        assert_eq!(request.lines.len(), 2);
        assert_eq!(request.total(), Money::from_cents(1450 * 2 + 1299));
        coordinator.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_resets_cart_and_customer_after_delay() {
        let (api, state, coordinator) = setup(FakeStoreApi::new());
        fill(&state, valid_customer());

        let outcome = coordinator.submit().await;
        assert_eq!(
            outcome,
            SubmitOutcome::Succeeded(OrderResult {
                id: "order-1".into(),
                status: "pending".into()
            })
        );

        // Confirmation visible, cart kept until the delay elapses
        state.read(|s| {
            assert_eq!(s.submit_phase, SubmitPhase::Idle);
            assert!(s.order_notice.as_ref().is_some_and(OrderNotice::is_success));
            assert!(!s.cart.is_empty());
        });
        assert!(coordinator.has_pending_reset());

        tokio::time::sleep(DELAY + Duration::from_millis(1)).await;

        state.read(|s| {
            assert!(s.cart.is_empty());
            assert!(s.customer.is_empty());
            assert!(s.order_notice.is_none());
        });
        assert!(!coordinator.has_pending_reset());

        // A new order is accepted afterwards
        fill(&state, valid_customer());
        assert!(coordinator.submit().await.is_success());
        assert_eq!(api.order_calls(), 2);
        coordinator.shutdown();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_zero_delay_reset_also_clears_notice() {
        let api = Arc::new(FakeStoreApi::new());
        let state = StateHandle::default();
        let coordinator = OrderCoordinator::new(api.clone(), state.clone(), Duration::ZERO);
        fill(&state, valid_customer());

        assert!(coordinator.submit().await.is_success());
        wait_until(|| !coordinator.has_pending_reset()).await;

        state.read(|s| {
            assert!(s.cart.is_empty());
            assert!(s.customer.is_empty());
            assert!(s.order_notice.is_none());
        });
    }

    #[tokio::test]
    async fn test_field_error_body_normalizes_and_keeps_input() {
        let failure = RemoteFailure::from_response(
            422,
            br#"{"errors": [{"field": "email", "message": "invalid"}]}"#,
        );
        let (api, state, coordinator) = setup(FakeStoreApi::new().failing_orders(failure));
        fill(&state, valid_customer());

        let outcome = coordinator.submit().await;

        let SubmitOutcome::Failed(error) = outcome else {
            panic!("expected Failed");
        };
        assert_eq!(error.message, ORDER_DETAILS_BANNER);
        assert_eq!(error.details, vec!["email: invalid"]);
        assert_eq!(api.order_calls(), 1);

        state.read(|s| {
            assert_eq!(s.submit_phase, SubmitPhase::Idle);
            assert_eq!(s.cart.item_count(), 3);
            assert_eq!(s.customer, valid_customer());
            assert_eq!(s.order_notice, Some(OrderNotice::Failed(error.clone())));
        });
        assert!(!coordinator.has_pending_reset());
    }

    #[tokio::test]
    async fn test_no_response_differs_from_server_fault() {
        let (_, state, coordinator) =
            setup(FakeStoreApi::new().failing_orders(RemoteFailure::no_response("connection refused")));
        fill(&state, valid_customer());
        let SubmitOutcome::Failed(offline) = coordinator.submit().await else {
            panic!("expected Failed");
        };

        let (_, state, coordinator) =
            setup(FakeStoreApi::new().failing_orders(RemoteFailure::from_response(500, b"")));
        fill(&state, valid_customer());
        let SubmitOutcome::Failed(fault) = coordinator.submit().await else {
            panic!("expected Failed");
        };

        assert_eq!(offline.message, CONNECTIVITY_MESSAGE);
        assert_eq!(offline.kind, FailureKind::ConnectivityFailure);
        assert_eq!(fault.message, SERVER_FAULT_MESSAGE);
        assert_ne!(offline.message, fault.message);
    }

    #[tokio::test]
    async fn test_submit_while_in_flight_is_dropped() {
        let gate = Arc::new(Notify::new());
        let (api, state, coordinator) = setup(FakeStoreApi::new().gated(gate.clone()));
        let coordinator = Arc::new(coordinator);
        fill(&state, valid_customer());

        let first = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.submit().await }
        });
        wait_until(|| api.order_calls() == 1).await;
        assert!(state.read(AppState::is_submitting));

        let second = coordinator.submit().await;
        assert_eq!(second, SubmitOutcome::Rejected(RejectReason::AlreadySubmitting));

        gate.notify_one();
        assert!(first.await.unwrap().is_success());
        assert_eq!(api.order_calls(), 1);
        coordinator.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_reset_keeps_cart() {
        let (_, state, coordinator) = setup(FakeStoreApi::new());
        fill(&state, valid_customer());
        assert!(coordinator.submit().await.is_success());

        assert!(coordinator.cancel_pending_reset());
        tokio::time::sleep(DELAY * 2).await;

        state.read(|s| {
            assert_eq!(s.cart.item_count(), 3);
            assert_eq!(s.customer, valid_customer());
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_submission_replaces_pending_reset() {
        let (api, state, coordinator) = setup(FakeStoreApi::new());
        fill(&state, valid_customer());
        assert!(coordinator.submit().await.is_success());

        // Half way through the window, the user orders again
        tokio::time::sleep(DELAY / 2).await;
        state.update(|s| s.cart.add_item(&menu()[1])).unwrap();
        assert!(coordinator.submit().await.is_success());
        assert_eq!(api.order_calls(), 2);

        // The first reset would have fired here
        tokio::time::sleep(DELAY / 2 + Duration::from_millis(1)).await;
        assert!(!state.read(|s| s.cart.is_empty()));
        assert!(coordinator.has_pending_reset());

        tokio::time::sleep(DELAY / 2).await;
        assert!(state.read(|s| s.cart.is_empty()));
        assert!(state.read(|s| s.cart.line(CHICKEN_ID).is_none()));
    }
}
