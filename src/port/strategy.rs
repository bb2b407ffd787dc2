//! Strategy port.
//!
//! A strategy is started once against an exchange session and runs as a
//! set of background tasks until the shared shutdown signal fires.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use super::exchange::ExchangeSession;
use super::notifier::Notifier;
use crate::error::Result;

/// A long-running trading strategy.
pub trait Strategy: Send {
    /// Stable identifier used in configuration.
    fn id(&self) -> &'static str;

    /// Validate the session, spawn the strategy's tasks and return a handle
    /// to join them.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the session lacks a capability
    /// the strategy requires.
    fn start(
        self: Box<Self>,
        session: &ExchangeSession,
        notifier: Arc<dyn Notifier>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<StrategyHandle>;
}

/// Join handle for the tasks of one started strategy.
#[derive(Debug)]
pub struct StrategyHandle {
    id: &'static str,
    tasks: Vec<JoinHandle<()>>,
}

impl StrategyHandle {
    #[must_use]
    pub fn new(id: &'static str) -> Self {
        Self { id, tasks: vec![] }
    }

    /// Track a spawned task.
    pub fn push(&mut self, task: JoinHandle<()>) {
        self.tasks.push(task);
    }

    #[must_use]
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Number of tracked tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every task to finish.
    pub async fn join(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(strategy = self.id, error = %e, "Strategy task ended abnormally");
            }
        }
    }
}
