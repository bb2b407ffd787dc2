//! Repay-on-deposit trigger.
//!
//! While the account sits at or below the margin level floor, any inflow
//! to an asset with outstanding debt sweeps that asset's whole available
//! balance into repayment.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::config::AutoBorrowConfig;
use super::dispatch_failed;
use crate::application::feed::BalanceFeed;
use crate::domain::{BalanceChange, Decision, MarginAction};
use crate::port::{AccountProvider, BalanceUpdate, Event, MarginActionEvent, MarginBorrowRepay, Notifier};

/// Event-driven repay handler.
pub struct DepositRepayTrigger {
    config: Arc<AutoBorrowConfig>,
    account: Arc<dyn AccountProvider>,
    margin: Arc<dyn MarginBorrowRepay>,
    notifier: Arc<dyn Notifier>,
}

impl DepositRepayTrigger {
    pub fn new(
        config: Arc<AutoBorrowConfig>,
        account: Arc<dyn AccountProvider>,
        margin: Arc<dyn MarginBorrowRepay>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            account,
            margin,
            notifier,
        }
    }

    /// Handle one normalized balance change.
    ///
    /// Reads the latest snapshot without refreshing it. Returns the repay
    /// decision when one was dispatched; the repay itself is awaited and a
    /// failure is logged, not returned.
    pub async fn on_balance_change(&self, change: &BalanceChange) -> Option<Decision> {
        if !self.config.is_enabled() {
            return None;
        }

        let snapshot = self.account.snapshot();
        let min_margin_level = self.config.min_margin_level;
        if snapshot.margin_level > min_margin_level {
            return None;
        }

        if !change.is_inflow() {
            return None;
        }

        let balance = snapshot.balance(change.asset.as_str())?;
        if !balance.can_repay() {
            debug!(
                asset = %change.asset,
                available = %balance.available,
                borrowed = %balance.borrowed,
                "Nothing to repay"
            );
            return None;
        }

        let decision = Decision::new(
            MarginAction::Repay,
            balance.currency.clone(),
            balance.available,
            snapshot.margin_level,
            min_margin_level,
        )?;

        self.notifier
            .notify(Event::MarginAction(MarginActionEvent::from(&decision)));
        info!(
            asset = %decision.asset(),
            amount = %decision.amount(),
            deposit = %change.delta,
            "Sending repay request"
        );

        if let Err(e) = self.margin.repay(decision.asset(), decision.amount()).await {
            error!(asset = %decision.asset(), error = %e, "Margin repay error");
            self.notifier.notify(dispatch_failed(
                MarginAction::Repay,
                decision.asset().clone(),
                decision.amount(),
                &e,
            ));
        }

        Some(decision)
    }

    /// Spawn a listener that feeds exchange balance updates into
    /// [`on_balance_change`](Self::on_balance_change) until shutdown.
    pub fn spawn(
        self,
        mut updates: broadcast::Receiver<BalanceUpdate>,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut feed = BalanceFeed::new();

            loop {
                if *shutdown.borrow_and_update() {
                    break;
                }

                tokio::select! {
                    biased;

                    result = shutdown.changed() => {
                        if result.is_err() {
                            info!("Shutdown channel closed");
                            break;
                        }
                    }
                    update = updates.recv() => {
                        match update {
                            Ok(update) => {
                                for change in feed.normalize(update) {
                                    self.on_balance_change(&change).await;
                                }
                            }
                            Err(broadcast::error::RecvError::Lagged(n)) => {
                                warn!(skipped = n, "Balance update listener lagged, some updates missed");
                            }
                            Err(broadcast::error::RecvError::Closed) => {
                                info!("Balance update stream closed");
                                break;
                            }
                        }
                    }
                }
            }

            info!("Repay-on-deposit listener stopped");
        })
    }
}
