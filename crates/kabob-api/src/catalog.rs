//! # Catalog Fetcher
//!
//! Loads the menu from the store API and keeps it addressable by id or by
//! display position.

use std::sync::Arc;

use kabob_core::MenuItem;
use tracing::{debug, info};

use crate::client::StoreApi;
use crate::error::ApiResult;

/// A fetched menu, in the order the service returned it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    items: Vec<MenuItem>,
}

impl Catalog {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Catalog { items }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Looks up an item by id.
    pub fn find(&self, item_id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Looks up an item by its 1-based display position.
    pub fn at_position(&self, position: usize) -> Option<&MenuItem> {
        position.checked_sub(1).and_then(|i| self.items.get(i))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items currently orderable.
    pub fn available_count(&self) -> usize {
        self.items.iter().filter(|item| item.available).count()
    }
}

/// Read-only consumer of `GET {base}/menu`.
#[derive(Clone)]
pub struct CatalogFetcher {
    api: Arc<dyn StoreApi>,
}

impl CatalogFetcher {
    pub fn new(api: Arc<dyn StoreApi>) -> Self {
        CatalogFetcher { api }
    }

    /// Fetches the menu. One attempt, no retry.
    pub async fn fetch(&self) -> ApiResult<Catalog> {
        debug!("Fetching catalog");
        let catalog = Catalog::new(self.api.fetch_menu().await?);
        info!(
            items = catalog.len(),
            available = catalog.available_count(),
            "Catalog loaded"
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HealthStatus;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use kabob_core::normalize::RemoteFailure;
    use kabob_core::{Money, OrderRecord, OrderRequest, OrderResult};

    fn item(id: &str, name: &str, available: bool) -> MenuItem {
        MenuItem {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price: Money::from_cents(999),
            category: "Kabobs".into(),
            image_url: None,
            available,
        }
    }

    struct MenuOnly(Option<Vec<MenuItem>>);

    #[async_trait]
    impl StoreApi for MenuOnly {
        async fn fetch_menu(&self) -> ApiResult<Vec<MenuItem>> {
            self.0
                .clone()
                .ok_or_else(|| ApiError::Remote(RemoteFailure::no_response("refused")))
        }
        async fn create_order(&self, _: &OrderRequest) -> ApiResult<OrderResult> {
            unreachable!()
        }
        async fn fetch_orders(&self) -> ApiResult<Vec<OrderRecord>> {
            unreachable!()
        }
        async fn health(&self) -> ApiResult<HealthStatus> {
            unreachable!()
        }
    }

    #[test]
    fn test_lookup_by_id_and_position() {
        let catalog = Catalog::new(vec![item("a", "Beef", true), item("b", "Lamb", false)]);

        assert_eq!(catalog.find("b").map(|i| i.name.as_str()), Some("Lamb"));
        assert!(catalog.find("zzz").is_none());
        assert_eq!(catalog.at_position(1).map(|i| i.id.as_str()), Some("a"));
        assert!(catalog.at_position(0).is_none());
        assert!(catalog.at_position(3).is_none());
        assert_eq!(catalog.available_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_wraps_menu() {
        let fetcher = CatalogFetcher::new(Arc::new(MenuOnly(Some(vec![item("a", "Beef", true)]))));
        let catalog = fetcher.fetch().await.unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_propagates_failure() {
        let fetcher = CatalogFetcher::new(Arc::new(MenuOnly(None)));
        let err = fetcher.fetch().await.unwrap_err();
        assert!(err.is_connectivity());
    }
}
