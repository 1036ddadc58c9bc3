//! # Store API Client
//!
//! The four remote endpoints the storefront talks to, behind one trait.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Store API Surface                                │
//! │                                                                         │
//! │  GET  {base}/menu     ──► Vec<MenuItem>       (Catalog Fetcher)        │
//! │  POST {base}/orders   ──► OrderResult         (Submission Coordinator) │
//! │  GET  {base}/orders   ──► Vec<OrderRecord>    (Order History Reader)   │
//! │  GET  {base}/health   ──► HealthStatus        (shell start-up probe)   │
//! │                                                                         │
//! │  Each call is attempted exactly once. A non-2xx answer is classified   │
//! │  into a RemoteFailure from its body before it leaves this module.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use kabob_core::normalize::RemoteFailure;
use kabob_core::{MenuItem, OrderRecord, OrderRequest, OrderResult};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

/// Body of `GET {base}/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

// =============================================================================
// StoreApi Trait
// =============================================================================

/// Remote store operations.
///
/// The session layer only sees this trait, so tests swap in an in-memory
/// implementation.
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// Fetches the full catalog.
    async fn fetch_menu(&self) -> ApiResult<Vec<MenuItem>>;

    /// Creates an order. Called once per submission.
    async fn create_order(&self, request: &OrderRequest) -> ApiResult<OrderResult>;

    /// Fetches all past orders, unsorted.
    async fn fetch_orders(&self) -> ApiResult<Vec<OrderRecord>>;

    /// Probes service reachability.
    async fn health(&self) -> ApiResult<HealthStatus>;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// reqwest-backed [`StoreApi`].
#[derive(Debug, Clone)]
pub struct HttpStoreApi {
    client: Client,
    base_url: String,
}

impl HttpStoreApi {
    /// Builds a client from validated configuration.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let base_url = config.base_url()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        Ok(HttpStoreApi {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl StoreApi for HttpStoreApi {
    async fn fetch_menu(&self) -> ApiResult<Vec<MenuItem>> {
        let url = self.endpoint("menu");
        debug!(%url, "GET menu");
        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }

    async fn create_order(&self, request: &OrderRequest) -> ApiResult<OrderResult> {
        let url = self.endpoint("orders");
        debug!(%url, lines = request.lines.len(), "POST order");
        let response = self.client.post(&url).json(request).send().await?;
        read_json(response).await
    }

    async fn fetch_orders(&self) -> ApiResult<Vec<OrderRecord>> {
        let url = self.endpoint("orders");
        debug!(%url, "GET orders");
        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        let url = self.endpoint("health");
        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }
}

/// Reads a response body and decodes it, or classifies the failure.
///
/// ## Outcome Table
/// ```text
/// ┌──────────────────────┬───────────────────────────────────────────────┐
/// │ Response             │ Result                                        │
/// ├──────────────────────┼───────────────────────────────────────────────┤
/// │ 2xx, body decodes    │ Ok(T)                                         │
/// │ 2xx, body malformed  │ ApiError::Decode                              │
/// │ non-2xx              │ ApiError::Remote(Response { status, payload })│
/// │ body read fails      │ ApiError::Remote(Response, Unrecognized)      │
/// └──────────────────────┴───────────────────────────────────────────────┘
/// ```
async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status().as_u16();
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => {
            warn!(status, error = %e, "Failed to read response body");
            return Err(ApiError::Remote(RemoteFailure::from_response(status, b"")));
        }
    };

    if !(200..300).contains(&status) {
        warn!(status, "Store API returned an error status");
        return Err(ApiError::Remote(RemoteFailure::from_response(status, &body)));
    }

    serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
        status,
        message: e.to_string(),
    })
}
