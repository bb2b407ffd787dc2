//! Account balances and normalized balance changes.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::Asset;

/// Balances keyed by asset.
pub type BalanceMap = HashMap<Asset, Balance>;

/// Balance of a single asset in a margin account.
///
/// `available` already includes borrowed funds; `borrowed` is the
/// outstanding debt that has to be repaid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(alias = "asset")]
    pub currency: Asset,
    #[serde(default)]
    pub available: Decimal,
    #[serde(default)]
    pub locked: Decimal,
    #[serde(default)]
    pub borrowed: Decimal,
}

impl Balance {
    /// Create a balance with nothing locked in open orders.
    pub fn new(currency: impl Into<Asset>, available: Decimal, borrowed: Decimal) -> Self {
        Self {
            currency: currency.into(),
            available,
            locked: Decimal::ZERO,
            borrowed,
        }
    }

    /// Holdings of the asset: available plus locked.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.available + self.locked
    }

    /// True when there is outstanding debt and funds to repay it with.
    #[must_use]
    pub fn can_repay(&self) -> bool {
        !self.available.is_zero() && !self.borrowed.is_zero()
    }
}

/// Normalized "balance changed" event: asset plus signed change of the
/// available balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceChange {
    pub asset: Asset,
    pub delta: Decimal,
}

impl BalanceChange {
    pub fn new(asset: impl Into<Asset>, delta: Decimal) -> Self {
        Self {
            asset: asset.into(),
            delta,
        }
    }

    /// True when funds flowed into the account.
    #[must_use]
    pub fn is_inflow(&self) -> bool {
        self.delta > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn total_excludes_debt() {
        let mut balance = Balance::new("ETH", dec!(0.5), dec!(9.5));
        assert_eq!(balance.total(), dec!(0.5));
        balance.locked = dec!(1);
        assert_eq!(balance.total(), dec!(1.5));
    }

    #[test]
    fn can_repay_requires_funds_and_debt() {
        assert!(Balance::new("ETH", dec!(1), dec!(1)).can_repay());
        assert!(!Balance::new("ETH", dec!(0), dec!(1)).can_repay());
        assert!(!Balance::new("ETH", dec!(1), dec!(0)).can_repay());
    }

    #[test]
    fn zero_delta_is_not_inflow() {
        assert!(BalanceChange::new("ETH", dec!(0.1)).is_inflow());
        assert!(!BalanceChange::new("ETH", dec!(0)).is_inflow());
        assert!(!BalanceChange::new("ETH", dec!(-0.1)).is_inflow());
    }
}
