//! # Kabob Storefront Shell
//!
//! A line-oriented front end for the storefront session: read a command,
//! run it against the [`SessionController`], print the result.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Startup                               │
//! │                                                                         │
//! │  1. Initialize tracing ─────────► stderr, RUST_LOG or default filter   │
//! │  2. Load configuration ─────────► storefront.toml + KABOB_* env vars   │
//! │  3. Build SessionController ────► reqwest client for the store API     │
//! │  4. Health probe ───────────────► logged, never fatal                  │
//! │  5. Load catalog, print menu                                           │
//! │  6. Command loop until `quit` or end of input ──► select! over stdin   │
//! │     and finished background commands                                   │
//! │  7. Shutdown ───────────────────► abort tasks, cancel pending reset    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod render;
pub mod shell;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use kabob_api::ApiConfig;
use kabob_core::View;
use kabob_session::{SessionController, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use commands::{Command, ItemRef, HELP};
use shell::Shell;

/// Whether the loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs the storefront shell on stdin/stdout.
pub async fn run() -> Result<(), Box<dyn Error>> {
    init_tracing();

    info!("Starting Kabob Storefront");

    let config = ApiConfig::load_or_default(config_path_from_args(std::env::args().skip(1)));
    let controller = Arc::new(SessionController::from_config(&config)?);

    match controller.health().await {
        Ok(health) if health.is_healthy() => info!(status = %health.status, "Store API reachable"),
        Ok(health) => warn!(status = %health.status, "Store API reports degraded health"),
        Err(e) => warn!(error = %e, "Store API health probe failed"),
    }

    match controller.navigate(View::Catalog).await {
        Ok(()) => println!("{}", render::menu(&controller.snapshot().catalog)),
        Err(e) => println!("{}", e),
    }
    println!("Type 'help' for commands.");

    let mut shell = Shell::new(controller);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut quit = false;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match commands::parse(&line) {
                    Ok(command) => command,
                    Err(commands::ParseError::Empty) => continue,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };

                debug!(?command, "Running command");
                let (output, flow) = shell.dispatch(command).await;
                if let Some(output) = output {
                    println!("{}", output);
                }
                if flow == Flow::Quit {
                    quit = true;
                    break;
                }
            }

            Some(output) = shell.finished(), if shell.in_flight() > 0 => {
                println!("{}", output);
            }
        }
    }

    // End of input: let running commands report before exiting
    if !quit {
        while let Some(output) = shell.finished().await {
            println!("{}", output);
        }
    }

    shell.shutdown();
    info!("Storefront closed");
    Ok(())
}

/// Runs one command and returns the text to print.
pub async fn execute(controller: &SessionController, command: Command) -> (String, Flow) {
    let output = match command {
        Command::Menu => show(controller, View::Catalog).await,
        Command::Cart => show(controller, View::Cart).await,
        Command::History => show(controller, View::History).await,
        Command::View(view) => show(controller, view).await,

        Command::Add(target) => {
            let added = match &target {
                ItemRef::Position(position) => controller.add_at_position(*position),
                ItemRef::Id(item_id) => controller.add_to_cart(item_id),
            };
            match added {
                Ok(quantity) => {
                    let state = controller.snapshot();
                    format!(
                        "Added. Quantity now {}. Cart: {} item(s), {}",
                        quantity,
                        state.cart.item_count(),
                        state.cart.total()
                    )
                }
                Err(e) => e.to_string(),
            }
        }
        Command::Remove(item_id) => {
            if controller.remove_from_cart(&item_id) {
                format!("Removed. Cart total {}", controller.snapshot().cart.total())
            } else {
                format!("'{}' is not in your cart", item_id)
            }
        }
        Command::Quantity { item_id, quantity } => {
            match controller.update_quantity(&item_id, quantity) {
                Ok(true) => format!("Updated. Cart total {}", controller.snapshot().cart.total()),
                Ok(false) => format!("No change for '{}'", item_id),
                Err(e) => e.to_string(),
            }
        }
        Command::Clear => {
            controller.clear_cart();
            String::from("Cart cleared.")
        }
        Command::Name(name) => {
            controller.set_customer_name(name);
            String::from("Name set.")
        }
        Command::Email(email) => {
            controller.set_customer_email(email);
            String::from("Email set.")
        }
        Command::Submit => render::outcome(&controller.submit().await),
        Command::Help => HELP.to_string(),
        Command::Quit => return (String::from("Goodbye!"), Flow::Quit),
    };
    (output, Flow::Continue)
}

/// Switches view and renders it.
async fn show(controller: &SessionController, view: View) -> String {
    if let Err(e) = controller.navigate(view).await {
        return match e {
            SessionError::Remote(error) => render::error_block(&error),
            other => other.to_string(),
        };
    }

    let state = controller.snapshot();
    match view {
        View::Catalog => render::menu(&state.catalog),
        View::Cart => render::cart(&state),
        View::History => render::history(&state),
    }
}

/// `--config <path>` from the command line, if given.
fn config_path_from_args(mut args: impl Iterator<Item = String>) -> Option<PathBuf> {
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kabob_session=trace` - Trace the session crate
///
/// Logs go to stderr so they do not mix with shell output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kabob=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
