//! Exchange port for account data and the margin facility.
//!
//! These traits are the integration points an exchange client has to
//! provide. Borrow/repay support is a separate capability: a session
//! without it can still be monitored but cannot run margin strategies.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::broadcast;

use crate::domain::{AccountSnapshot, Asset, BalanceMap};
use crate::error::{ConfigError, ExchangeError};

/// Source of margin account snapshots.
///
/// Implementations must tolerate `snapshot` being called concurrently with
/// an in-flight `refresh`.
#[async_trait]
pub trait AccountProvider: Send + Sync {
    /// Re-read the account from the exchange.
    async fn refresh(&self) -> Result<(), ExchangeError>;

    /// Latest known account state. Does not hit the network.
    fn snapshot(&self) -> AccountSnapshot;
}

/// Margin borrow/repay capability.
#[async_trait]
pub trait MarginBorrowRepay: Send + Sync {
    /// Borrow `amount` of `asset` through the margin facility.
    async fn borrow(&self, asset: &Asset, amount: Decimal) -> Result<(), ExchangeError>;

    /// Repay `amount` of outstanding `asset` debt.
    async fn repay(&self, asset: &Asset, amount: Decimal) -> Result<(), ExchangeError>;
}

/// Balance update as delivered by an exchange user-data stream.
///
/// Some exchanges push per-asset deltas, others only push the full balance
/// map. Consumers normalize both into [`BalanceChange`](crate::domain::BalanceChange).
#[derive(Debug, Clone)]
pub enum BalanceUpdate {
    /// Signed change of one asset's available balance.
    Delta { asset: Asset, delta: Decimal },
    /// Full balance map after the update.
    Snapshot(BalanceMap),
}

/// Capability name reported when a session cannot borrow or repay.
pub const MARGIN_BORROW_REPAY: &str = "margin borrow/repay";

/// Everything a strategy needs from one exchange connection.
#[derive(Clone)]
pub struct ExchangeSession {
    name: String,
    account: Arc<dyn AccountProvider>,
    margin: Option<Arc<dyn MarginBorrowRepay>>,
    balance_updates: Option<broadcast::Sender<BalanceUpdate>>,
}

impl ExchangeSession {
    /// Create a session exposing only account data.
    pub fn new(name: impl Into<String>, account: Arc<dyn AccountProvider>) -> Self {
        Self {
            name: name.into(),
            account,
            margin: None,
            balance_updates: None,
        }
    }

    /// Attach the margin borrow/repay capability.
    #[must_use]
    pub fn with_margin(mut self, margin: Arc<dyn MarginBorrowRepay>) -> Self {
        self.margin = Some(margin);
        self
    }

    /// Attach the user-data balance update stream.
    #[must_use]
    pub fn with_balance_updates(mut self, updates: broadcast::Sender<BalanceUpdate>) -> Self {
        self.balance_updates = Some(updates);
        self
    }

    /// Exchange name for logging.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn account(&self) -> Arc<dyn AccountProvider> {
        Arc::clone(&self.account)
    }

    /// The margin capability, or a configuration error naming the exchange.
    pub fn require_margin(&self) -> Result<Arc<dyn MarginBorrowRepay>, ConfigError> {
        self.margin
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| ConfigError::MissingCapability {
                exchange: self.name.clone(),
                capability: MARGIN_BORROW_REPAY,
            })
    }

    /// Subscribe to balance updates, if the exchange streams them.
    #[must_use]
    pub fn subscribe_balance_updates(&self) -> Option<broadcast::Receiver<BalanceUpdate>> {
        self.balance_updates.as_ref().map(broadcast::Sender::subscribe)
    }
}

impl fmt::Debug for ExchangeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeSession")
            .field("name", &self.name)
            .field("margin", &self.margin.is_some())
            .field("balance_updates", &self.balance_updates.is_some())
            .finish()
    }
}
