//! # Validation Module
//!
//! Customer-field and order-line validation, run before any order leaves the
//! client.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form edit                                                    │
//! │  └── ValidationErrorSet::clear_field() drops the edited field's error  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Submit (THIS MODULE)                                         │
//! │  ├── validate()        name + email, each field independently          │
//! │  └── validate_lines()  order limits the store API enforces             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store API                                                    │
//! │  └── Request model validation → 422 → normalize()                      │
//! │                                                                         │
//! │  A non-empty set at Layer 2 means no request is sent.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kabob_core::types::CustomerInfo;
//! use kabob_core::validation::{validate, FIELD_NAME};
//!
//! let errors = validate(&CustomerInfo::new("Bob3", "user@example.com"));
//! assert_eq!(errors.len(), 1);
//! assert!(errors.get(FIELD_NAME).is_some());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::ValidationError;
use crate::types::CustomerInfo;
use crate::{
    BLOCKED_EMAIL_DOMAINS, MAX_CART_QUANTITY, MAX_FIELD_LENGTH, MAX_LINE_QUANTITY, MAX_ORDER_LINES,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Key of the customer name field.
pub const FIELD_NAME: &str = "name";
/// Key of the customer email field.
pub const FIELD_EMAIL: &str = "email";
/// Key under which order-line problems are reported.
pub const FIELD_ITEMS: &str = "items";

// =============================================================================
// Validation Error Set
// =============================================================================

/// Field name → human-readable message. Empty means valid.
///
/// Keys are kept sorted so display and iteration order are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorSet(BTreeMap<String, String>);

impl ValidationErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Drops the error of one field, leaving every other field untouched.
    ///
    /// Called when the user edits that field. The other field is never
    /// re-validated here.
    pub fn clear_field(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Adds every entry of `other`, overwriting fields present in both.
    pub fn merge(&mut self, other: ValidationErrorSet) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn record(&mut self, field: &str, result: ValidationResult<()>) {
        if let Err(err) = result {
            self.insert(field, err.to_string());
        }
    }
}

impl fmt::Display for ValidationErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

// =============================================================================
// Customer Validators
// =============================================================================

/// Validates the customer's name.
///
/// ## Rules
/// - Must not be empty or whitespace-only
/// - At most 255 characters
/// - Only letters, spaces, hyphens and apostrophes
///
/// ## Example
/// ```rust
/// use kabob_core::validation::validate_customer_name;
///
/// assert!(validate_customer_name("Jo-Ann O'Neil").is_ok());
/// assert!(validate_customer_name("Bob3").is_err());
/// assert!(validate_customer_name("   ").is_err());
/// ```
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "Name".to_string(),
        });
    }

    if name.chars().count() > MAX_FIELD_LENGTH {
        return Err(ValidationError::TooLong {
            field: "Name".to_string(),
            max: MAX_FIELD_LENGTH,
        });
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || c == '-' || c == '\'')
    {
        return Err(ValidationError::InvalidFormat {
            field: "Name".to_string(),
            reason: "can only contain letters, spaces, hyphens, and apostrophes".to_string(),
        });
    }

    Ok(())
}

/// Validates the customer's email address.
///
/// ## Rules
/// - Must not be empty
/// - At most 255 characters
/// - Shape `local@domain.tld`: exactly one `@`, a non-empty local part, and a
///   domain of at least two non-empty dot-separated labels
/// - No whitespace inside the address
/// - Disposable-mail domains are refused
///
/// ## Example
/// ```rust
/// use kabob_core::validation::validate_customer_email;
///
/// assert!(validate_customer_email("user@example.com").is_ok());
/// assert!(validate_customer_email("user@domain").is_err());
/// assert!(validate_customer_email("a@b@c.com").is_err());
/// ```
pub fn validate_customer_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "Email".to_string(),
        });
    }

    if email.chars().count() > MAX_FIELD_LENGTH {
        return Err(ValidationError::TooLong {
            field: "Email".to_string(),
            max: MAX_FIELD_LENGTH,
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "Email".to_string(),
        reason: "must be a valid email address".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }

    let domain = domain.to_ascii_lowercase();
    if BLOCKED_EMAIL_DOMAINS.contains(&domain.as_str()) {
        return Err(ValidationError::Blocked {
            field: "Email".to_string(),
            value: domain,
        });
    }

    Ok(())
}

/// Validates the customer identity fields.
///
/// Each field is checked on its own; a problem with one never hides or
/// produces an error on the other.
pub fn validate(customer: &CustomerInfo) -> ValidationErrorSet {
    let mut errors = ValidationErrorSet::new();
    errors.record(FIELD_NAME, validate_customer_name(&customer.name));
    errors.record(FIELD_EMAIL, validate_customer_email(&customer.email));
    errors
}

// =============================================================================
// Order Line Validators
// =============================================================================

/// Validates the cart against the limits the store API enforces on orders.
///
/// ## Rules
/// - At most 50 distinct items
/// - Each quantity at most 100
/// - Each item id is a UUID
///
/// Problems are reported under [`FIELD_ITEMS`]; the first one found wins.
/// Checks a quantity against the cart ceiling.
///
/// Non-positive quantities are not an error here: the cart treats them as
/// a removal.
pub fn validate_cart_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity > MAX_CART_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "Quantity".to_string(),
            min: 1,
            max: MAX_CART_QUANTITY,
        });
    }
    Ok(())
}

pub fn validate_lines(cart: &Cart) -> ValidationErrorSet {
    let mut errors = ValidationErrorSet::new();
    errors.record(FIELD_ITEMS, check_lines(cart));
    errors
}

fn check_lines(cart: &Cart) -> ValidationResult<()> {
    if cart.line_count() > MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "Number of different items".to_string(),
            min: 1,
            max: MAX_ORDER_LINES as i64,
        });
    }

    for line in cart.lines() {
        if line.quantity > MAX_LINE_QUANTITY {
            return Err(ValidationError::OutOfRange {
                field: format!("Quantity of {}", line.name),
                min: 1,
                max: MAX_LINE_QUANTITY,
            });
        }

        if uuid::Uuid::parse_str(&line.item_id).is_err() {
            return Err(ValidationError::InvalidFormat {
                field: line.name.clone(),
                reason: "has an invalid item id".to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::MenuItem;

    const ITEM_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn menu_item(id: &str) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: "Chicken Kabob".to_string(),
            description: String::new(),
            price: Money::from_cents(1299),
            category: "Kabobs".to_string(),
            image_url: None,
            available: true,
        }
    }

    #[test]
    fn test_valid_customer_has_no_errors() {
        let errors = validate(&CustomerInfo::new("Jo-Ann O'Neil", "user@example.com"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_digit_in_name_flags_name_only() {
        let errors = validate(&CustomerInfo::new("Bob3", "user@example.com"));
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(FIELD_NAME));
        assert!(!errors.contains(FIELD_EMAIL));
    }

    #[test]
    fn test_missing_tld_flags_email_only() {
        let errors = validate(&CustomerInfo::new("Bob", "user@domain"));
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(FIELD_EMAIL));
    }

    #[test]
    fn test_both_fields_reported_independently() {
        let errors = validate(&CustomerInfo::new("", ""));
        assert_eq!(errors.get(FIELD_NAME), Some("Name is required"));
        assert_eq!(errors.get(FIELD_EMAIL), Some("Email is required"));
    }

    #[test]
    fn test_validate_customer_name() {
        assert!(validate_customer_name("Ada Lovelace").is_ok());
        assert!(validate_customer_name("D'Angelo").is_ok());

        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name(" \t ").is_err());
        assert!(validate_customer_name("R2-D2").is_err());
        assert!(validate_customer_name("<script>").is_err());
        assert!(validate_customer_name(&"a".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_customer_email() {
        assert!(validate_customer_email("first.last@sub.example.co").is_ok());
        assert!(validate_customer_email("  user@example.com  ").is_ok());

        assert!(validate_customer_email("").is_err());
        assert!(validate_customer_email("userexample.com").is_err());
        assert!(validate_customer_email("@example.com").is_err());
        assert!(validate_customer_email("user@.com").is_err());
        assert!(validate_customer_email("user@example.").is_err());
        assert!(validate_customer_email("us er@example.com").is_err());
    }

    #[test]
    fn test_disposable_domain_blocked() {
        let err = validate_customer_email("someone@TempMail.com").unwrap_err();
        assert!(matches!(err, ValidationError::Blocked { .. }));
    }

    #[test]
    fn test_clear_field_leaves_other_errors() {
        let mut errors = validate(&CustomerInfo::new("", "nope"));
        assert_eq!(errors.len(), 2);

        errors.clear_field(FIELD_NAME);
        assert!(!errors.contains(FIELD_NAME));
        assert!(errors.contains(FIELD_EMAIL));
    }

    #[test]
    fn test_validate_lines_quantity_limit() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item(ITEM_ID)).unwrap();
        assert!(validate_lines(&cart).is_empty());

        cart.update_quantity(ITEM_ID, 101).unwrap();
        let errors = validate_lines(&cart);
        assert_eq!(
            errors.get(FIELD_ITEMS),
            Some("Quantity of Chicken Kabob must be between 1 and 100")
        );
    }

    #[test]
    fn test_validate_cart_quantity() {
        assert!(validate_cart_quantity(-3).is_ok());
        assert!(validate_cart_quantity(MAX_CART_QUANTITY).is_ok());
        assert_eq!(
            validate_cart_quantity(i64::MAX).unwrap_err().to_string(),
            "Quantity must be between 1 and 999"
        );
    }

    #[test]
    fn test_validate_lines_rejects_non_uuid_id() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item("not-a-uuid")).unwrap();
        assert!(validate_lines(&cart).contains(FIELD_ITEMS));
    }

    #[test]
    fn test_display_is_sorted_by_field() {
        let errors = validate(&CustomerInfo::new("", ""));
        assert_eq!(
            errors.to_string(),
            "email: Email is required; name: Name is required"
        );
    }
}
