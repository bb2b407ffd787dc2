//! Scheduled margin monitor.
//!
//! Runs one evaluation pass immediately and then one per configured
//! interval. Each pass refreshes the account, gates on the margin level
//! floor and tops up every configured asset that dropped below its
//! low-balance threshold.
//!
//! ```text
//! interval tick
//!      |
//!      v
//! refresh account --(error)--> log, wait for next tick
//!      |
//!      v
//! margin level >= floor? --(no)--> skip pass
//!      |
//!      v
//! size_borrow() per asset --> notify + spawn borrow
//! ```

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::config::AutoBorrowConfig;
use super::dispatch_failed;
use crate::domain::{size_borrow, AccountSnapshot, BorrowPlan, Decision, MarginAction};
use crate::port::{AccountProvider, Event, MarginActionEvent, MarginBorrowRepay, Notifier};

/// Result of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// No margin level floor configured.
    Disabled,
    /// The account could not be refreshed.
    RefreshFailed,
    /// Margin level is below the configured floor.
    BelowMinMarginLevel {
        margin_level: Decimal,
        min_margin_level: Decimal,
    },
    /// The account reported no balances.
    EmptyBalances,
    /// Assets were evaluated; contains the dispatched decisions.
    Evaluated(Vec<Decision>),
}

impl PassOutcome {
    /// Decisions dispatched by the pass.
    #[must_use]
    pub fn decisions(&self) -> &[Decision] {
        match self {
            Self::Evaluated(decisions) => decisions,
            _ => &[],
        }
    }
}

/// Periodic borrow controller.
pub struct RiskMonitor {
    config: Arc<AutoBorrowConfig>,
    account: Arc<dyn AccountProvider>,
    margin: Arc<dyn MarginBorrowRepay>,
    notifier: Arc<dyn Notifier>,
}

impl RiskMonitor {
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

    /// Decide which borrows a snapshot calls for, without side effects.
    ///
    /// Applies the margin level gate and sizes every enabled asset in
    /// configured order. The refresh step and the disabled check are left
    /// to [`evaluate`](Self::evaluate).
    #[must_use]
    pub fn plan(&self, snapshot: &AccountSnapshot) -> PassOutcome {
        let min_margin_level = self.config.min_margin_level;
        if snapshot.margin_level < min_margin_level {
            info!(
                margin_level = %snapshot.margin_level,
                min_margin_level = %min_margin_level,
                "Margin level below minimum, skipping auto-borrow"
            );
            return PassOutcome::BelowMinMarginLevel {
                margin_level: snapshot.margin_level,
                min_margin_level,
            };
        }

        if snapshot.balances.is_empty() {
            warn!("Balance is empty, skipping auto-borrow");
            return PassOutcome::EmptyBalances;
        }

        let mut decisions = Vec::new();
        for asset in &self.config.assets {
            if !asset.is_enabled() {
                warn!(asset = %asset.asset, "Margin asset low balance is not set");
                continue;
            }

            match size_borrow(asset, snapshot.balance(asset.asset.as_str())) {
                BorrowPlan::Funded { total, low } => {
                    debug!(asset = %asset.asset, total = %total, low = %low, "No need to borrow");
                }
                BorrowPlan::AtCeiling {
                    borrowed,
                    max_total_borrow,
                } => {
                    warn!(
                        asset = %asset.asset,
                        borrowed = %borrowed,
                        max_total_borrow = %max_total_borrow,
                        "Margin asset is at its total borrow limit, skipping"
                    );
                }
                BorrowPlan::Borrow(amount) => {
                    decisions.extend(Decision::new(
                        MarginAction::Borrow,
                        asset.asset.clone(),
                        amount,
                        snapshot.margin_level,
                        min_margin_level,
                    ));
                }
            }
        }

        PassOutcome::Evaluated(decisions)
    }

    /// Run one evaluation pass: refresh, plan and dispatch.
    ///
    /// Borrow requests are spawned and not awaited; a failed borrow is
    /// logged and reported to the notifier but never reaches the loop.
    pub async fn evaluate(&self) -> PassOutcome {
        if !self.config.is_enabled() {
            return PassOutcome::Disabled;
        }

        if let Err(e) = self.account.refresh().await {
            error!(error = %e, "Can not update account");
            return PassOutcome::RefreshFailed;
        }

        let snapshot = self.account.snapshot();
        info!(
            margin_level = %snapshot.margin_level,
            margin_ratio = %snapshot.margin_ratio,
            margin_tolerance = %snapshot.margin_tolerance,
            "Current account margin"
        );

        let outcome = self.plan(&snapshot);
        for decision in outcome.decisions() {
            self.dispatch(decision);
        }
        outcome
    }

    fn dispatch(&self, decision: &Decision) {
        self.notifier
            .notify(Event::MarginAction(MarginActionEvent::from(decision)));

        info!(
            asset = %decision.asset(),
            amount = %decision.amount(),
            "Sending borrow request"
        );

        let margin = Arc::clone(&self.margin);
        let notifier = Arc::clone(&self.notifier);
        let asset = decision.asset().clone();
        let amount = decision.amount();
        tokio::spawn(async move {
            if let Err(e) = margin.borrow(&asset, amount).await {
                warn!(asset = %asset, amount = %amount, error = %e, "Margin borrow failed");
                notifier.notify(dispatch_failed(MarginAction::Borrow, asset, amount, &e));
            }
        });
    }

    /// Spawn the scheduler loop.
    ///
    /// The first pass runs immediately. Passes never overlap; ticks missed
    /// while a pass was running collapse into a single pass. The loop exits
    /// once `shutdown` turns true or its sender is dropped, without
    /// cancelling borrows that are still in flight.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

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
                    _ = ticker.tick() => {
                        self.evaluate().await;
                    }
                }
            }

            info!("Auto-borrow monitor stopped");
        })
    }
}
