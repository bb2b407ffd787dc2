//! Read-only view of a margin account.

use rust_decimal::Decimal;

use super::balance::{Balance, BalanceMap};

/// Point-in-time view of a margin account as published by the
/// account provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountSnapshot {
    pub margin_level: Decimal,
    pub margin_ratio: Decimal,
    pub margin_tolerance: Decimal,
    pub balances: BalanceMap,
}

impl AccountSnapshot {
    /// Look up the balance of an asset.
    #[must_use]
    pub fn balance(&self, asset: &str) -> Option<&Balance> {
        self.balances.get(asset)
    }

    /// Insert or replace a balance, keyed by its currency.
    pub fn set_balance(&mut self, balance: Balance) {
        self.balances.insert(balance.currency.clone(), balance);
    }

    /// Builder-style variant of [`set_balance`](Self::set_balance).
    #[must_use]
    pub fn with_balance(mut self, balance: Balance) -> Self {
        self.set_balance(balance);
        self
    }
}
