//! # kabob-core: Pure Business Logic for the Kabob Storefront
//!
//! This crate is the **heart** of the storefront client. It contains the
//! cart, validation and error-normalization rules as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Kabob Storefront Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  storefront (command shell)                     │   │
//! │  │    menu ──► add ──► cart ──► name/email ──► submit ──► history  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          kabob-session (controller + order coordinator)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kabob-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌────────┐ ┌────────┐ ┌────────────┐ ┌───────────┐ ┌──────┐  │   │
//! │  │   │ types  │ │  cart  │ │ validation │ │ normalize │ │ view │  │   │
//! │  │   │ money  │ │        │ │            │ │           │ │      │  │   │
//! │  │   └────────┘ └────────┘ └────────────┘ └───────────┘ └──────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO ASYNC • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 kabob-api (HTTP client, reqwest)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog items, order request/result, history records
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - Cart State Store
//! - [`validation`] - Customer and order-line validation
//! - [`normalize`] - Remote failure → user-facing error
//! - [`view`] - Navigation state
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use kabob_core::{Cart, CustomerInfo, MenuItem, Money};
//! use kabob_core::validation::validate;
//!
//! let kabob = MenuItem {
//!     id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
//!     name: "Chicken Kabob".to_string(),
//!     description: String::new(),
//!     price: Money::from_cents(1299),
//!     category: "Kabobs".to_string(),
//!     image_url: None,
//!     available: true,
//! };
//!
//! let mut cart = Cart::new();
//! cart.add_item(&kabob).unwrap();
//! assert_eq!(cart.add_item(&kabob).unwrap(), 2);
//! assert_eq!(cart.total().cents(), 2598);
//!
//! let customer = CustomerInfo::new("Jo-Ann O'Neil", "jo@example.com");
//! assert!(validate(&customer).is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod normalize;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use normalize::{normalize, FailureKind, NormalizedError, RemoteFailure};
pub use types::*;
pub use validation::ValidationErrorSet;
pub use view::{View, ViewState};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of the customer name and email.
///
/// ## Business Reason
/// Matches the column width of the order store.
pub const MAX_FIELD_LENGTH: usize = 255;

/// Maximum quantity of a single item in one order.
pub const MAX_LINE_QUANTITY: i64 = 100;

/// Hard ceiling for one cart line.
///
/// The cart refuses to go past it. Orders are further limited to
/// [`MAX_LINE_QUANTITY`] when they are submitted.
pub const MAX_CART_QUANTITY: i64 = 999;

/// Maximum number of distinct items in one order.
pub const MAX_ORDER_LINES: usize = 50;

/// Email domains the order service refuses.
pub const BLOCKED_EMAIL_DOMAINS: &[&str] = &["tempmail.com", "throwaway.email", "guerrillamail.com"];
