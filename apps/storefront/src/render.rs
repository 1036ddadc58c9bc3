//! # Text Rendering
//!
//! Turns session state into the text the shell prints. Every function
//! returns a `String` so output can be checked in tests.

use std::fmt::Write;

use kabob_api::Catalog;
use kabob_core::{NormalizedError, OrderRecord, ValidationErrorSet};
use kabob_session::{AppState, SubmitOutcome};

/// Numbered menu. Positions match `add <n>`.
pub fn menu(catalog: &Catalog) -> String {
    if catalog.is_empty() {
        return "The menu is empty.".to_string();
    }

    let mut out = String::from("Menu:\n");
    for (index, item) in catalog.items().iter().enumerate() {
        let _ = write!(out, "{:>3}. {:<28} {:>8}", index + 1, item.name, item.price.to_string());
        if !item.category.is_empty() {
            let _ = write!(out, "  [{}]", item.category);
        }
        if !item.available {
            out.push_str("  (unavailable)");
        }
        out.push('\n');
        if !item.description.is_empty() {
            let _ = writeln!(out, "     {}", item.description);
        }
    }
    out
}

/// Cart lines, total, order form, and the last order's outcome.
pub fn cart(state: &AppState) -> String {
    let mut out = String::new();

    if state.cart.is_empty() {
        out.push_str("Your cart is empty.\n");
    } else {
        out.push_str("Cart:\n");
        for line in state.cart.lines() {
            let _ = writeln!(
                out,
                "  {:>3} x {:<28} {:>8}   id: {}",
                line.quantity,
                line.name,
                line.line_total().to_string(),
                line.item_id
            );
        }
        let _ = writeln!(
            out,
            "  {} item(s), total {}",
            state.cart.item_count(),
            state.cart.total()
        );
    }

    let _ = writeln!(out, "Name:  {}", placeholder(&state.customer.name));
    let _ = writeln!(out, "Email: {}", placeholder(&state.customer.email));
    out.push_str(&field_errors(&state.field_errors));

    if state.is_submitting() {
        out.push_str("Placing order...\n");
    } else if let Some(notice) = &state.order_notice {
        let _ = writeln!(out, "{}", notice.message());
    }
    out
}

/// Past orders, newest first as stored.
pub fn history(state: &AppState) -> String {
    if state.history_loading {
        return "Loading order history...".to_string();
    }
    if let Some(error) = &state.history_error {
        return error_block(error);
    }
    if state.history.is_empty() {
        return "No orders yet.".to_string();
    }

    let mut out = String::from("Order history:\n");
    for order in &state.history {
        out.push_str(&history_entry(order));
    }
    out
}

fn history_entry(order: &OrderRecord) -> String {
    let placed = order
        .created_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown date".to_string());

    let mut out = format!(
        "  {}  {}  {}  {}  ({} item(s))\n",
        placed,
        order.id,
        order.status,
        order.total_amount,
        order.item_count()
    );
    for line in &order.items {
        let _ = writeln!(out, "      {} x {}", line.quantity, line.name);
    }
    out
}

/// One line (or block) describing how a submit settled.
pub fn outcome(outcome: &SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Rejected(reason) => reason.to_string(),
        SubmitOutcome::Invalid(errors) => {
            format!("Please fix the following:\n{}", field_errors(errors))
        }
        SubmitOutcome::Succeeded(result) => format!(
            "Order placed successfully! Order ID: {} ({})",
            result.id, result.status
        ),
        SubmitOutcome::Failed(error) => error_block(error),
    }
}

/// Banner followed by detail lines.
pub fn error_block(error: &NormalizedError) -> String {
    error.to_string()
}

fn field_errors(errors: &ValidationErrorSet) -> String {
    let mut out = String::new();
    for (field, message) in errors.iter() {
        let _ = writeln!(out, "  ! {}: {}", field, message);
    }
    out
}

fn placeholder(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}
