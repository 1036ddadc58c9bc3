//! # Scheduled Post-Order Reset
//!
//! After a successful order the confirmation stays visible for a short
//! delay, then the cart and customer form are cleared. The pending clear is
//! a tokio task that the coordinator can abort.
//!
//! ```text
//! success ──► spawn ──► sleep(delay) ──► clear cart + customer + notice
//!                │
//!                └── cancel() before the delay ends: nothing is cleared
//! ```

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::state::StateHandle;

/// A pending cart/customer reset.
#[derive(Debug)]
pub struct ScheduledReset {
    order_id: String,
    handle: JoinHandle<()>,
}

impl ScheduledReset {
    /// Spawns the reset on the current tokio runtime.
    pub fn spawn(state: StateHandle, delay: Duration, order_id: impl Into<String>) -> Self {
        let order_id = order_id.into();
        let task_order_id = order_id.clone();

        debug!(order_id = %order_id, delay_ms = delay.as_millis() as u64, "Scheduling post-order reset");

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.update(|s| {
                s.cart.clear();
                s.customer.clear();
                s.field_errors.clear();
                s.order_notice = None;
            });
            info!(order_id = %task_order_id, "Cart and customer reset after order");
        });

        ScheduledReset { order_id, handle }
    }

    /// The order whose success scheduled this reset.
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// True until the reset has run or been cancelled.
    pub fn is_pending(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Aborts the reset. Has no effect if it already ran.
    pub fn cancel(self) {
        if self.is_pending() {
            debug!(order_id = %self.order_id, "Cancelling post-order reset");
        }
        self.handle.abort();
    }
}
