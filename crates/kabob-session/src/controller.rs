//! # Session Controller
//!
//! The one owner of [`AppState`]. Every user action goes through here.
//!
//! ## Action Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Controller Actions                         │
//! │                                                                         │
//! │  User Action            Controller Method        State Change           │
//! │  ───────────            ─────────────────        ────────────           │
//! │                                                                         │
//! │  Pick menu item ──────► add_to_cart() ─────────► cart line += 1        │
//! │  Change quantity ─────► update_quantity() ─────► line qty / removal    │
//! │  Remove line ─────────► remove_from_cart() ────► line removed          │
//! │  Type name/email ─────► set_customer_*() ──────► field + its error     │
//! │  Switch screen ───────► navigate() ────────────► view, fetch, cancel   │
//! │  Place order ─────────► submit() ──────────────► OrderCoordinator      │
//! │                                                                         │
//! │  Fetches (catalog, history) each hold their own loading flag; a       │
//! │  second request for the same resource is refused while the first     │
//! │  runs, everything else stays usable.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use kabob_api::{
    ApiConfig, ApiResult, CatalogFetcher, HealthStatus, HttpStoreApi, OrderHistoryReader, StoreApi,
};
use kabob_core::validation::{FIELD_EMAIL, FIELD_NAME};
use kabob_core::{normalize, CoreError, MenuItem, View};
use tracing::{debug, info, warn};

use crate::coordinator::{OrderCoordinator, SubmitOutcome};
use crate::error::{SessionError, SessionResult};
use crate::state::{AppState, StateHandle};

/// Drives one storefront session.
pub struct SessionController {
    api: Arc<dyn StoreApi>,
    state: StateHandle,
    coordinator: OrderCoordinator,
    catalog: CatalogFetcher,
    history: OrderHistoryReader,
}

impl SessionController {
    pub fn new(api: Arc<dyn StoreApi>, reset_delay: Duration) -> Self {
        let state = StateHandle::default();
        SessionController {
            coordinator: OrderCoordinator::new(api.clone(), state.clone(), reset_delay),
            catalog: CatalogFetcher::new(api.clone()),
            history: OrderHistoryReader::new(api.clone()),
            state,
            api,
        }
    }

    /// Builds a controller talking HTTP to the configured store API.
    pub fn from_config(config: &ApiConfig) -> SessionResult<Self> {
        let api = HttpStoreApi::new(config)?;
        info!(base_url = %api.base_url(), "Store API client ready");
        Ok(Self::new(Arc::new(api), config.reset_delay()))
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    pub fn snapshot(&self) -> AppState {
        self.state.snapshot()
    }

    pub fn coordinator(&self) -> &OrderCoordinator {
        &self.coordinator
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds one unit of a catalog item by id. Returns the line's new quantity.
    pub fn add_to_cart(&self, item_id: &str) -> SessionResult<i64> {
        self.state.update(|s| {
            let item = s
                .catalog
                .find(item_id)
                .cloned()
                .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))?;
            add_item(s, &item)
        })
    }

    /// Adds one unit of the catalog item at a 1-based display position.
    pub fn add_at_position(&self, position: usize) -> SessionResult<i64> {
        self.state.update(|s| {
            let item = s
                .catalog
                .at_position(position)
                .cloned()
                .ok_or_else(|| CoreError::ItemNotFound(format!("#{}", position)))?;
            add_item(s, &item)
        })
    }

    /// Removes a line. Returns false if the item was not in the cart.
    pub fn remove_from_cart(&self, item_id: &str) -> bool {
        let removed = self.state.update(|s| s.cart.remove_item(item_id));
        debug!(item_id, removed, "Remove from cart");
        removed
    }

    /// Sets a line's quantity; zero or less removes it.
    ///
    /// Returns false if the item was not in the cart. Quantities above the
    /// cart ceiling are refused and leave the line as it was.
    pub fn update_quantity(&self, item_id: &str, quantity: i64) -> SessionResult<bool> {
        let changed = self.state.update(|s| s.cart.update_quantity(item_id, quantity))?;
        debug!(item_id, quantity, changed, "Update cart quantity");
        Ok(changed)
    }

    pub fn clear_cart(&self) {
        self.state.update(|s| s.cart.clear());
        debug!("Cart cleared");
    }

    // =========================================================================
    // Customer Form
    // =========================================================================

    /// Sets the name and clears only the name's error.
    pub fn set_customer_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.state.update(|s| {
            s.customer.name = name;
            s.field_errors.clear_field(FIELD_NAME);
        });
    }

    /// Sets the email and clears only the email's error.
    pub fn set_customer_email(&self, email: impl Into<String>) {
        let email = email.into();
        self.state.update(|s| {
            s.customer.email = email;
            s.field_errors.clear_field(FIELD_EMAIL);
        });
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Switches view and runs what the new view needs.
    ///
    /// - Leaving the cart view cancels a pending post-order reset.
    /// - The catalog view loads the menu if none is loaded yet.
    /// - The history view reloads orders every time.
    ///
    /// A fetch that is already running is not an error here.
    pub async fn navigate(&self, view: View) -> SessionResult<()> {
        let previous = self.state.update(|s| s.view.switch_to(view));
        debug!(from = %previous, to = %view, "View switched");

        if previous == View::Cart && view != View::Cart && self.coordinator.cancel_pending_reset() {
            info!("Left cart view; pending reset cancelled");
        }

        let fetched = match view {
            View::Catalog if self.state.read(|s| s.catalog.is_empty()) => {
                self.load_catalog().await.map(|_| ())
            }
            View::History => self.load_history().await.map(|_| ()),
            _ => Ok(()),
        };

        match fetched {
            Err(err) if err.is_in_progress() => Ok(()),
            other => other,
        }
    }

    // =========================================================================
    // Fetches
    // =========================================================================

    /// Loads the menu. Returns the number of items.
    pub async fn load_catalog(&self) -> SessionResult<usize> {
        let started = self.state.update(|s| {
            if s.catalog_loading {
                return false;
            }
            s.catalog_loading = true;
            s.catalog_error = None;
            true
        });
        if !started {
            return Err(SessionError::FetchInProgress { resource: "catalog" });
        }

        let result = self.catalog.fetch().await;

        self.state.update(|s| {
            s.catalog_loading = false;
            match result {
                Ok(catalog) => {
                    let count = catalog.len();
                    s.catalog = catalog;
                    Ok(count)
                }
                Err(err) => {
                    let error = normalize(&err.into_failure());
                    warn!(error = %error, "Catalog fetch failed");
                    s.catalog_error = Some(error.clone());
                    Err(SessionError::Remote(error))
                }
            }
        })
    }

    /// Loads order history, newest first. Returns the number of orders.
    pub async fn load_history(&self) -> SessionResult<usize> {
        let started = self.state.update(|s| {
            if s.history_loading {
                return false;
            }
            s.history_loading = true;
            s.history_error = None;
            true
        });
        if !started {
            return Err(SessionError::FetchInProgress { resource: "order history" });
        }

        let result = self.history.fetch().await;

        self.state.update(|s| {
            s.history_loading = false;
            match result {
                Ok(orders) => {
                    let count = orders.len();
                    s.history = orders;
                    Ok(count)
                }
                Err(err) => {
                    let error = normalize(&err.into_failure());
                    warn!(error = %error, "Order history fetch failed");
                    s.history_error = Some(error.clone());
                    Err(SessionError::Remote(error))
                }
            }
        })
    }

    // =========================================================================
    // Orders
    // =========================================================================

    pub async fn submit(&self) -> SubmitOutcome {
        self.coordinator.submit().await
    }

    /// Probes the store API once.
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        self.api.health().await
    }

    /// Cancels scheduled work. The state itself is left as is.
    pub fn shutdown(&self) {
        self.coordinator.shutdown();
        info!("Session shut down");
    }
}

fn add_item(s: &mut AppState, item: &MenuItem) -> SessionResult<i64> {
    if !item.available {
        return Err(CoreError::ItemUnavailable {
            id: item.id.clone(),
            name: item.name.clone(),
        }
        .into());
    }

    let quantity = s.cart.add_item(item)?;
    debug!(item_id = %item.id, quantity, total = %s.cart.total(), "Added to cart");
    Ok(quantity)
}
