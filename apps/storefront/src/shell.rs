//! # Command Dispatch
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Shell Dispatch                                  │
//! │                                                                         │
//! │  Command ──► waits_on_network()? ──no──► execute() inline ──► output   │
//! │                      │                                                  │
//! │                     yes                                                 │
//! │                      ▼                                                  │
//! │              JoinSet task ──► execute() ──► finished() ──► output      │
//! │                                                                         │
//! │  submit, history and catalog loads run as tasks; cart and form edits   │
//! │  are answered while they are in flight.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use kabob_session::SessionController;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::commands::Command;
use crate::{execute, Flow};

/// Runs commands against one session, keeping network-bound ones off the
/// input path.
pub struct Shell {
    controller: Arc<SessionController>,
    in_flight: JoinSet<String>,
}

impl Shell {
    pub fn new(controller: Arc<SessionController>) -> Self {
        Shell {
            controller,
            in_flight: JoinSet::new(),
        }
    }

    /// Runs a command, or starts it as a task if it waits on the store API.
    ///
    /// Returns the text to print right away, if any. Output of a started
    /// task comes from [`Shell::finished`].
    pub async fn dispatch(&mut self, command: Command) -> (Option<String>, Flow) {
        if command.waits_on_network() {
            debug!(?command, running = self.in_flight.len(), "Starting background command");
            let controller = Arc::clone(&self.controller);
            self.in_flight
                .spawn(async move { execute(&controller, command).await.0 });
            return (None, Flow::Continue);
        }

        let (output, flow) = execute(&self.controller, command).await;
        ((!output.is_empty()).then_some(output), flow)
    }

    /// Number of commands still running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Waits for the next background command to finish.
    ///
    /// Returns `None` once nothing is running.
    pub async fn finished(&mut self) -> Option<String> {
        loop {
            match self.in_flight.join_next().await? {
                Ok(output) => return Some(output),
                Err(e) => warn!(error = %e, "Background command did not complete"),
            }
        }
    }

    /// Aborts running commands and cancels scheduled work.
    pub fn shutdown(&mut self) {
        if !self.in_flight.is_empty() {
            debug!(running = self.in_flight.len(), "Aborting background commands");
        }
        self.in_flight.abort_all();
        self.controller.shutdown();
    }
}
