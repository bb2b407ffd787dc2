//! Strategy runtime lifecycle.
//!
//! Starts every configured strategy against one exchange session and owns
//! the shutdown signal they share.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::error::Result;
use crate::port::{ExchangeSession, Notifier, Strategy, StrategyHandle};

/// Running strategies plus the signal that stops them.
pub struct Runtime {
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<StrategyHandle>,
}

impl Runtime {
    /// Start `strategies` in order.
    ///
    /// If one fails to start, strategies already started are shut down
    /// before the error is returned.
    pub async fn start(
        strategies: Vec<Box<dyn Strategy>>,
        session: &ExchangeSession,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut runtime = Self {
            shutdown_tx,
            handles: Vec::with_capacity(strategies.len()),
        };

        for strategy in strategies {
            let id = strategy.id();
            match strategy.start(session, Arc::clone(&notifier), shutdown_rx.clone()) {
                Ok(handle) => {
                    info!(strategy = id, exchange = session.name(), "Strategy started");
                    runtime.handles.push(handle);
                }
                Err(e) => {
                    runtime.shutdown().await;
                    return Err(e);
                }
            }
        }

        Ok(runtime)
    }

    /// Number of running strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Signal shutdown and wait for every strategy task to exit.
    ///
    /// Borrow and repay requests already sent to the exchange are not
    /// cancelled.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles {
            let id = handle.id();
            handle.join().await;
            info!(strategy = id, "Strategy stopped");
        }
    }
}
