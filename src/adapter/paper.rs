//! In-memory margin account.
//!
//! Simulates an exchange margin account for dry runs and integration tests.
//! Borrow, repay and deposit mutate the stored snapshot. Only deposits are
//! published on the balance update stream; borrow proceeds and repayments
//! are not inflows from outside the account.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tokio::sync::broadcast;
use tracing::debug;

use crate::config::PaperConfig;
use crate::domain::{AccountSnapshot, Asset, Balance};
use crate::error::ExchangeError;
use crate::port::{AccountProvider, BalanceUpdate, ExchangeSession, MarginBorrowRepay};

const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// Exchange name reported by paper sessions.
pub const PAPER_EXCHANGE: &str = "paper";

/// Simulated margin account.
pub struct PaperExchange {
    account: RwLock<AccountSnapshot>,
    updates: broadcast::Sender<BalanceUpdate>,
}

impl PaperExchange {
    pub fn new(snapshot: AccountSnapshot) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            account: RwLock::new(snapshot),
            updates,
        }
    }

    /// Seed the account from the `[exchange.paper]` section.
    pub fn from_config(config: &PaperConfig) -> Self {
        let mut snapshot = AccountSnapshot {
            margin_level: config.margin_level,
            margin_ratio: config.margin_ratio,
            margin_tolerance: config.margin_tolerance,
            ..Default::default()
        };
        for balance in &config.balances {
            snapshot.set_balance(balance.clone());
        }
        Self::new(snapshot)
    }

    /// Session exposing account data, the margin facility and balance updates.
    pub fn session(self: &Arc<Self>) -> ExchangeSession {
        ExchangeSession::new(PAPER_EXCHANGE, Arc::clone(self) as Arc<dyn AccountProvider>)
            .with_margin(Arc::clone(self) as Arc<dyn MarginBorrowRepay>)
            .with_balance_updates(self.updates.clone())
    }

    /// Credit `amount` of `asset` to the available balance.
    pub fn deposit(&self, asset: impl Into<Asset>, amount: Decimal) {
        let asset = asset.into();
        self.apply(&asset, |balance| balance.available += amount);
        self.publish(asset, amount);
    }

    pub fn set_margin_level(&self, margin_level: Decimal) {
        self.account.write().margin_level = margin_level;
    }

    fn apply(&self, asset: &Asset, update: impl FnOnce(&mut Balance)) {
        let mut account = self.account.write();
        let balance = account
            .balances
            .entry(asset.clone())
            .or_insert_with(|| Balance::new(asset.clone(), Decimal::ZERO, Decimal::ZERO));
        update(balance);
    }

    fn publish(&self, asset: Asset, delta: Decimal) {
        // No receivers just means nobody listens for deposits.
        if self.updates.send(BalanceUpdate::Delta { asset, delta }).is_err() {
            debug!("No balance update subscribers");
        }
    }
}

#[async_trait]
impl AccountProvider for PaperExchange {
    async fn refresh(&self) -> Result<(), ExchangeError> {
        Ok(())
    }

    fn snapshot(&self) -> AccountSnapshot {
        self.account.read().clone()
    }
}

#[async_trait]
impl MarginBorrowRepay for PaperExchange {
    async fn borrow(&self, asset: &Asset, amount: Decimal) -> Result<(), ExchangeError> {
        if amount <= Decimal::ZERO {
            return Err(ExchangeError::Borrow {
                asset: asset.to_string(),
                amount,
                reason: "amount must be positive".to_string(),
            });
        }

        self.apply(asset, |balance| {
            balance.available += amount;
            balance.borrowed += amount;
        });
        debug!(asset = %asset, amount = %amount, "Paper borrow filled");
        Ok(())
    }

    async fn repay(&self, asset: &Asset, amount: Decimal) -> Result<(), ExchangeError> {
        let repaid = {
            let mut account = self.account.write();
            let Some(balance) = account.balances.get_mut(asset) else {
                return Err(ExchangeError::Repay {
                    asset: asset.to_string(),
                    amount,
                    reason: "no balance".to_string(),
                });
            };
            if amount <= Decimal::ZERO || amount > balance.available {
                return Err(ExchangeError::Repay {
                    asset: asset.to_string(),
                    amount,
                    reason: format!("insufficient available balance {}", balance.available),
                });
            }

            let repaid = amount.min(balance.borrowed);
            balance.available -= repaid;
            balance.borrowed -= repaid;
            repaid
        };

        debug!(asset = %asset, amount = %repaid, "Paper repay filled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn exchange() -> Arc<PaperExchange> {
        let snapshot = AccountSnapshot {
            margin_level: dec!(2),
            ..Default::default()
        }
        .with_balance(Balance::new("ETH", dec!(0.5), dec!(9.5)));
        Arc::new(PaperExchange::new(snapshot))
    }

    #[tokio::test]
    async fn borrow_credits_available_and_debt() {
        let exchange = exchange();
        exchange.borrow(&"ETH".into(), dec!(1)).await.expect("borrow");

        let balance = exchange.snapshot().balance("ETH").cloned().expect("ETH");
        assert_eq!(balance.available, dec!(1.5));
        assert_eq!(balance.borrowed, dec!(10.5));
    }

    #[tokio::test]
    async fn borrow_creates_missing_balance() {
        let exchange = exchange();
        exchange.borrow(&"USDT".into(), dec!(100)).await.expect("borrow");

        let balance = exchange.snapshot().balance("USDT").cloned().expect("USDT");
        assert_eq!(balance.available, dec!(100));
        assert_eq!(balance.borrowed, dec!(100));
    }

    #[tokio::test]
    async fn repay_caps_at_outstanding_debt() {
        let exchange = exchange();
        exchange.deposit("ETH", dec!(20));
        exchange.repay(&"ETH".into(), dec!(20.5)).await.expect("repay");

        let balance = exchange.snapshot().balance("ETH").cloned().expect("ETH");
        assert_eq!(balance.borrowed, dec!(0));
        assert_eq!(balance.available, dec!(11));
    }

    #[tokio::test]
    async fn repay_more_than_available_is_rejected() {
        let exchange = exchange();
        let result = exchange.repay(&"ETH".into(), dec!(1)).await;
        assert!(matches!(result, Err(ExchangeError::Repay { .. })));
        assert_eq!(
            exchange.snapshot().balance("ETH").map(|b| b.borrowed),
            Some(dec!(9.5))
        );
    }

    #[tokio::test]
    async fn only_deposits_are_published() {
        let exchange = exchange();
        let mut updates = exchange
            .session()
            .subscribe_balance_updates()
            .expect("paper streams updates");

        exchange.borrow(&"ETH".into(), dec!(1)).await.expect("borrow");
        exchange.repay(&"ETH".into(), dec!(1)).await.expect("repay");
        exchange.deposit("ETH", dec!(2));

        match updates.recv().await.expect("deposit update") {
            BalanceUpdate::Delta { asset, delta } => {
                assert_eq!(asset.as_str(), "ETH");
                assert_eq!(delta, dec!(2));
            }
            other => panic!("unexpected update {other:?}"),
        }
        assert!(updates.try_recv().is_err());
    }

    #[test]
    fn from_config_seeds_snapshot() {
        let config = PaperConfig {
            margin_level: dec!(3),
            balances: vec![Balance::new("BTC", dec!(1), dec!(0))],
            ..Default::default()
        };
        let exchange = PaperExchange::from_config(&config);
        let snapshot = exchange.snapshot();
        assert_eq!(snapshot.margin_level, dec!(3));
        assert!(snapshot.balance("BTC").is_some());
    }

    #[test]
    fn session_has_margin_capability() {
        let session = exchange().session();
        assert_eq!(session.name(), PAPER_EXCHANGE);
        assert!(session.require_margin().is_ok());
    }
}
