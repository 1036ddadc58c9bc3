//! # Kabob Storefront Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kabob Storefront                                 │
//! │                                                                         │
//! │  stdin ──► commands::parse ──► execute ──► SessionController           │
//! │                                                  │                      │
//! │  stdout ◄── render ◄── AppState ◄────────────────┘                      │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                                   store API (GET /menu, POST /orders)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `storefront [--config <path>]`

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The actual setup is in lib.rs for better testability
    storefront::run().await
}
