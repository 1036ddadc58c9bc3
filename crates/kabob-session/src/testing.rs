//! In-memory store API for session tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kabob_api::{ApiError, ApiResult, HealthStatus, StoreApi};
use kabob_core::normalize::RemoteFailure;
use kabob_core::{CustomerInfo, MenuItem, Money, OrderRecord, OrderRequest, OrderResult};
use tokio::sync::Notify;

pub(crate) const BEEF_ID: &str = "550e8400-e29b-41d4-a716-446655440000";
pub(crate) const CHICKEN_ID: &str = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";
pub(crate) const FALAFEL_ID: &str = "6ba7b811-9dad-11d1-80b4-00c04fd430c8";

pub(crate) fn menu() -> Vec<MenuItem> {
    vec![
        menu_item(BEEF_ID, "Beef Kabob", 1450, true),
        menu_item(CHICKEN_ID, "Chicken Kabob", 1299, true),
        menu_item(FALAFEL_ID, "Falafel Wrap", 899, false),
    ]
}

pub(crate) fn menu_item(id: &str, name: &str, cents: i64, available: bool) -> MenuItem {
    MenuItem {
        id: id.into(),
        name: name.into(),
        description: String::new(),
        price: Money::from_cents(cents),
        category: "Kabobs".into(),
        image_url: None,
        available,
    }
}

pub(crate) fn valid_customer() -> CustomerInfo {
    CustomerInfo::new("Sam Lee", "sam@example.com")
}

/// Scripted [`StoreApi`].
///
/// With a gate set, every call waits for one `notify_one()` before answering.
#[derive(Default)]
pub(crate) struct FakeStoreApi {
    menu: Vec<MenuItem>,
    orders: Vec<OrderRecord>,
    order_failure: Option<RemoteFailure>,
    fetch_failure: Option<RemoteFailure>,
    gate: Option<Arc<Notify>>,
    pub(crate) order_calls: AtomicUsize,
    pub(crate) menu_calls: AtomicUsize,
    pub(crate) history_calls: AtomicUsize,
    pub(crate) last_request: Mutex<Option<OrderRequest>>,
}

impl FakeStoreApi {
    pub(crate) fn new() -> Self {
        FakeStoreApi {
            menu: menu(),
            ..Default::default()
        }
    }

    pub(crate) fn with_orders(mut self, orders: Vec<OrderRecord>) -> Self {
        self.orders = orders;
        self
    }

    pub(crate) fn failing_orders(mut self, failure: RemoteFailure) -> Self {
        self.order_failure = Some(failure);
        self
    }

    pub(crate) fn failing_fetches(mut self, failure: RemoteFailure) -> Self {
        self.fetch_failure = Some(failure);
        self
    }

    pub(crate) fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn order_calls(&self) -> usize {
        self.order_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn menu_calls(&self) -> usize {
        self.menu_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }

    fn fetch_result<T: Clone>(&self, value: &T) -> ApiResult<T> {
        match &self.fetch_failure {
            Some(failure) => Err(ApiError::Remote(failure.clone())),
            None => Ok(value.clone()),
        }
    }
}

#[async_trait]
impl StoreApi for FakeStoreApi {
    async fn fetch_menu(&self) -> ApiResult<Vec<MenuItem>> {
        self.menu_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;
        self.fetch_result(&self.menu)
    }

    async fn create_order(&self, request: &OrderRequest) -> ApiResult<OrderResult> {
        let call = self.order_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }
        self.wait_for_gate().await;

        match &self.order_failure {
            Some(failure) => Err(ApiError::Remote(failure.clone())),
            None => Ok(OrderResult {
                id: format!("order-{call}"),
                status: "pending".into(),
            }),
        }
    }

    async fn fetch_orders(&self) -> ApiResult<Vec<OrderRecord>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;
        self.fetch_result(&self.orders)
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        Ok(HealthStatus {
            status: "healthy".into(),
        })
    }
}

/// Yields until `condition` holds.
pub(crate) async fn wait_until(condition: impl Fn() -> bool) {
    while !condition() {
        tokio::task::yield_now().await;
    }
}
