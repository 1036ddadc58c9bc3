//! # Domain Types
//!
//! Core domain types shared by the cart, the order coordinator and the API
//! client.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  GET /menu          ┌─────────────────┐                                │
//! │  ─────────────────► │    MenuItem     │ ──► Cart::add_item()            │
//! │                     └─────────────────┘                                │
//! │                                                                         │
//! │  Cart + CustomerInfo ──► ┌─────────────────┐   POST /orders            │
//! │                          │  OrderRequest   │ ─────────────────►        │
//! │                          │  [OrderLine]    │                           │
//! │                          └─────────────────┘ ◄── OrderResult           │
//! │                                                                         │
//! │  GET /orders        ┌─────────────────┐                                │
//! │  ─────────────────► │   OrderRecord   │ ──► history view               │
//! │                     └─────────────────┘                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names follow the store API's snake_case JSON; Rust-side names that
//! differ (`item_id`, `unit_price`, `lines`) are renamed at the serde layer.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::cart::CartLine;
use crate::money::Money;

// =============================================================================
// Catalog
// =============================================================================

/// An orderable item from the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Item identifier (UUID string).
    pub id: String,

    /// Display name.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Unit price.
    pub price: Money,

    /// Menu section ("Kabobs", "Appetizers", ...).
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub image_url: Option<String>,

    /// Whether the item can currently be ordered.
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

// =============================================================================
// Customer
// =============================================================================

/// Customer identity fields, free text until validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
}

impl CustomerInfo {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        CustomerInfo {
            name: name.into(),
            email: email.into(),
        }
    }

    /// True when both fields are empty (the post-order reset state).
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.email.clear();
    }
}

// =============================================================================
// Order Request / Result
// =============================================================================

/// One line of an order as sent to (and stored by) the order service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "id")]
    pub item_id: String,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Money,
    pub quantity: i64,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        OrderLine {
            item_id: line.item_id.clone(),
            name: line.name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
        }
    }
}

/// Body of `POST /orders`, built from the cart and customer at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    #[serde(rename = "items")]
    pub lines: Vec<OrderLine>,
}

impl OrderRequest {
    /// Sum of the requested lines.
    pub fn total(&self) -> Money {
        self.lines
            .iter()
            .map(|l| l.unit_price.multiply_quantity(l.quantity))
            .sum()
    }
}

/// Successful response of `POST /orders`. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    pub id: String,
    pub status: String,
}

// =============================================================================
// Order History
// =============================================================================

/// A previously placed order, as returned by `GET /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,

    /// The service stores lines as a JSON string; both encodings are accepted.
    #[serde(deserialize_with = "deserialize_lines")]
    pub items: Vec<OrderLine>,

    pub total_amount: Money,
    pub status: String,

    /// Creation time. Naive timestamps are taken as UTC.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderRecord {
    /// Total number of units across all lines.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LinesRepr {
    Lines(Vec<OrderLine>),
    Encoded(String),
}

fn deserialize_lines<'de, D>(deserializer: D) -> Result<Vec<OrderLine>, D::Error>
where
    D: Deserializer<'de>,
{
    match LinesRepr::deserialize(deserializer)? {
        LinesRepr::Lines(lines) => Ok(lines),
        LinesRepr::Encoded(raw) => serde_json::from_str(&raw).map_err(de::Error::custom),
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", s))),
    }
}

/// Parses RFC 3339, falling back to a naive ISO-8601 timestamp in UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

// =============================================================================
// Unit Tests
// =============================================================================
