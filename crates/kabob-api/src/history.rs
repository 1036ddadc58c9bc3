//! # Order History Reader
//!
//! Loads past orders and presents them newest first. Records without a
//! creation time sort after every dated record.

use std::cmp::Ordering;
use std::sync::Arc;

use kabob_core::OrderRecord;
use tracing::{debug, info};

use crate::client::StoreApi;
use crate::error::ApiResult;

/// Read-only consumer of `GET {base}/orders`.
#[derive(Clone)]
pub struct OrderHistoryReader {
    api: Arc<dyn StoreApi>,
}

impl OrderHistoryReader {
    pub fn new(api: Arc<dyn StoreApi>) -> Self {
        OrderHistoryReader { api }
    }

    /// Fetches all orders sorted by `created_at` descending.
    pub async fn fetch(&self) -> ApiResult<Vec<OrderRecord>> {
        debug!("Fetching order history");
        let mut orders = self.api.fetch_orders().await?;
        sort_newest_first(&mut orders);
        info!(orders = orders.len(), "Order history loaded");
        Ok(orders)
    }
}

/// Sorts by creation time, newest first, undated last.
///
/// The sort is stable, so records with equal timestamps keep the service's
/// order.
pub fn sort_newest_first(orders: &mut [OrderRecord]) {
    orders.sort_by(|a, b| match (&a.created_at, &b.created_at) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
