//! Auto-borrow strategy.
//!
//! Keeps configured margin assets topped up by borrowing on a schedule and,
//! optionally, repays debt as soon as deposits arrive while the account is
//! under stress.
//!
//! # Example configuration
//!
//! ```toml
//! [[strategies]]
//! id = "autoborrow"
//! interval = "30m"
//! repay_when_deposit = true
//! min_margin_level = 1.5
//!
//! [[strategies.assets]]
//! asset = "ETH"
//! low = 3.0
//! max_quantity_per_borrow = 1.0
//! max_total_borrow = 10.0
//! ```

mod config;
mod monitor;
mod repay;

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{info, warn};

pub use config::AutoBorrowConfig;
pub use monitor::{PassOutcome, RiskMonitor};
pub use repay::DepositRepayTrigger;

use crate::domain::{Asset, MarginAction};
use crate::error::{ConfigError, ExchangeError, Result};
use crate::port::{ActionFailedEvent, Event, ExchangeSession, Notifier, Strategy, StrategyHandle};

/// Strategy identifier used in configuration.
pub const ID: &str = "autoborrow";

/// Auto-borrow strategy bound to one configuration.
#[derive(Debug)]
pub struct AutoBorrowStrategy {
    config: AutoBorrowConfig,
}

impl AutoBorrowStrategy {
    pub fn new(config: AutoBorrowConfig) -> Self {
        Self { config }
    }

    /// Build the strategy from its raw configuration table.
    pub fn from_value(value: toml::Value) -> Result<Box<dyn Strategy>> {
        let config: AutoBorrowConfig = value.try_into().map_err(|e: toml::de::Error| {
            ConfigError::InvalidValue {
                field: "strategies",
                reason: format!("{ID}: {e}"),
            }
        })?;
        config.validate()?;
        Ok(Box::new(Self::new(config)))
    }

    #[must_use]
    pub fn config(&self) -> &AutoBorrowConfig {
        &self.config
    }
}

impl Strategy for AutoBorrowStrategy {
    fn id(&self) -> &'static str {
        ID
    }

    fn start(
        self: Box<Self>,
        session: &ExchangeSession,
        notifier: Arc<dyn Notifier>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<StrategyHandle> {
        let margin = session.require_margin()?;

        if !self.config.is_enabled() {
            warn!(
                "min_margin_level is 0, configure a minimum margin level to control liquidation risk"
            );
        }

        let config = Arc::new(self.config);
        let account = session.account();
        let mut handle = StrategyHandle::new(ID);

        let monitor = RiskMonitor::new(
            Arc::clone(&config),
            Arc::clone(&account),
            Arc::clone(&margin),
            Arc::clone(&notifier),
        );
        handle.push(monitor.spawn(shutdown.clone()));

        if config.repay_when_deposit {
            match session.subscribe_balance_updates() {
                Some(updates) => {
                    let trigger = DepositRepayTrigger::new(
                        Arc::clone(&config),
                        account,
                        margin,
                        notifier,
                    );
                    handle.push(trigger.spawn(updates, shutdown));
                }
                None => {
                    warn!(
                        exchange = session.name(),
                        "Exchange does not stream balance updates, repay on deposit disabled"
                    );
                }
            }
        }

        info!(
            exchange = session.name(),
            interval = ?config.interval,
            assets = config.assets.len(),
            repay_when_deposit = config.repay_when_deposit,
            "Auto-borrow started"
        );

        Ok(handle)
    }
}

fn dispatch_failed(action: MarginAction, asset: Asset, amount: Decimal, error: &ExchangeError) -> Event {
    Event::ActionFailed(ActionFailedEvent {
        action,
        asset,
        amount,
        reason: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountSnapshot, Balance, MarginAssetConfig};
    use crate::error::Error;
    use crate::testkit::{RecordingMargin, RecordingNotifier, ScriptedAccount};
    use rust_decimal_macros::dec;
    use std::time::Duration;
    use tokio::sync::broadcast;

    fn config() -> AutoBorrowConfig {
        AutoBorrowConfig::new(Duration::from_secs(60), dec!(1.5))
            .with_asset(MarginAssetConfig::new("ETH", dec!(3)))
            .with_repay_when_deposit(true)
    }

    #[test]
    fn from_value_validates() {
        let value: toml::Value = toml::from_str("interval = 0\nmin_margin_level = 1.5").expect("toml");
        assert!(matches!(
            AutoBorrowStrategy::from_value(value),
            Err(Error::Config(ConfigError::InvalidValue { field: "interval", .. }))
        ));

        let value: toml::Value = toml::from_str("interval = \"5m\"").expect("toml");
        let strategy = AutoBorrowStrategy::from_value(value).expect("valid");
        assert_eq!(strategy.id(), ID);
    }

    #[tokio::test]
    async fn start_requires_margin_capability() {
        let account = Arc::new(ScriptedAccount::default());
        let session = ExchangeSession::new("spot-only", account);
        let (_tx, rx) = watch::channel(false);

        let result = Box::new(AutoBorrowStrategy::new(config())).start(
            &session,
            Arc::new(RecordingNotifier::new()),
            rx,
        );

        match result {
            Err(Error::Config(ConfigError::MissingCapability { exchange, .. })) => {
                assert_eq!(exchange, "spot-only");
            }
            other => panic!("expected missing capability, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn start_spawns_monitor_and_listener() {
        let account = Arc::new(ScriptedAccount::new(
            AccountSnapshot {
                margin_level: dec!(2),
                ..Default::default()
            }
            .with_balance(Balance::new("ETH", dec!(5), dec!(0))),
        ));
        let (updates, _) = broadcast::channel(8);
        let session = ExchangeSession::new("scripted", account)
            .with_margin(Arc::new(RecordingMargin::new()))
            .with_balance_updates(updates);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = Box::new(AutoBorrowStrategy::new(config()))
            .start(&session, Arc::new(RecordingNotifier::new()), shutdown_rx)
            .expect("strategy starts");
        assert_eq!(handle.len(), 2);

        shutdown_tx.send(true).expect("tasks alive");
        handle.join().await;
    }

    #[tokio::test]
    async fn listener_not_started_without_stream() {
        let session = ExchangeSession::new("scripted", Arc::new(ScriptedAccount::default()))
            .with_margin(Arc::new(RecordingMargin::new()));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = Box::new(AutoBorrowStrategy::new(config()))
            .start(&session, Arc::new(RecordingNotifier::new()), shutdown_rx)
            .expect("strategy starts");
        assert_eq!(handle.len(), 1);

        shutdown_tx.send(true).expect("monitor alive");
        handle.join().await;
    }
}
