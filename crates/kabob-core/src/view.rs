//! # Navigation / View State
//!
//! Which of the three screens is active. Switching is a plain assignment;
//! the session controller decides what to fetch or cancel on a switch.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// The three mutually exclusive screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Menu browsing. Catalog fetcher is active.
    #[default]
    Catalog,
    /// Cart and order form. Submission coordinator is active.
    Cart,
    /// Past orders. History reader is active.
    History,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Catalog => write!(f, "catalog"),
            View::Cart => write!(f, "cart"),
            View::History => write!(f, "history"),
        }
    }
}

impl std::str::FromStr for View {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "catalog" | "menu" => Ok(View::Catalog),
            "cart" | "order" => Ok(View::Cart),
            "history" | "orders" => Ok(View::History),
            other => Err(ValidationError::InvalidFormat {
                field: format!("View '{}'", other),
                reason: "is not one of: catalog, cart, history".to_string(),
            }),
        }
    }
}

/// Holds the current view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    current: View,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> View {
        self.current
    }

    pub fn is(&self, view: View) -> bool {
        self.current == view
    }

    /// Switches to `view` and returns the previous one.
    pub fn switch_to(&mut self, view: View) -> View {
        std::mem::replace(&mut self.current, view)
    }
}
