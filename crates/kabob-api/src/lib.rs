//! # kabob-api: Store API Access for the Kabob Storefront
//!
//! Everything that crosses the network lives here: the [`StoreApi`] trait,
//! its reqwest implementation, configuration, and the two read-only
//! consumers (catalog and order history).
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   reqwest::Error ──┐                                                    │
//! │   non-2xx + body ──┼──► ApiError ──► into_failure() ──► RemoteFailure   │
//! │   bad 2xx body  ───┘                                        │           │
//! │                                                             ▼           │
//! │                                          kabob_core::normalize()        │
//! │                                                             │           │
//! │                                                             ▼           │
//! │                                                     NormalizedError     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod history;

pub use catalog::{Catalog, CatalogFetcher};
pub use client::{HealthStatus, HttpStoreApi, StoreApi};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use history::{sort_newest_first, OrderHistoryReader};
