//! Borrow sizing.
//!
//! Pure computation of how much of an asset to borrow so its holdings get
//! back up to the configured low-balance threshold, clamped by the per-call
//! and total-debt ceilings.

use rust_decimal::Decimal;

use super::balance::Balance;
use super::margin_asset::MarginAssetConfig;

/// Outcome of sizing a single asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowPlan {
    /// Holdings already meet the low-balance threshold.
    Funded { total: Decimal, low: Decimal },
    /// Outstanding debt is already at or over `max_total_borrow`.
    AtCeiling {
        borrowed: Decimal,
        max_total_borrow: Decimal,
    },
    /// Borrow this (strictly positive) amount.
    Borrow(Decimal),
}

impl BorrowPlan {
    /// Amount to borrow; zero unless the plan is [`BorrowPlan::Borrow`].
    #[must_use]
    pub fn amount(&self) -> Decimal {
        match self {
            Self::Borrow(amount) => *amount,
            _ => Decimal::ZERO,
        }
    }
}

/// Size a borrow for `config` given the asset's current balance.
///
/// A missing balance record is treated as an empty balance: the whole low
/// threshold is requested, clamped to `max_quantity_per_borrow`. The
/// `max_total_borrow` ceiling is only applied when a balance record exists.
// TODO: confirm with product whether the total-borrow ceiling should also
// cover assets without a balance record.
#[must_use]
pub fn size_borrow(config: &MarginAssetConfig, balance: Option<&Balance>) -> BorrowPlan {
    let Some(balance) = balance else {
        let amount = clamp_per_borrow(config, config.low);
        return if amount > Decimal::ZERO {
            BorrowPlan::Borrow(amount)
        } else {
            BorrowPlan::Funded {
                total: Decimal::ZERO,
                low: config.low,
            }
        };
    };

    let total = balance.total();
    let deficit = config.low - total;
    if deficit <= Decimal::ZERO {
        return BorrowPlan::Funded {
            total,
            low: config.low,
        };
    }

    let mut amount = clamp_per_borrow(config, deficit);

    if !config.max_total_borrow.is_zero() {
        let projected = amount + balance.borrowed;
        if projected > config.max_total_borrow {
            amount -= projected - config.max_total_borrow;
        }
        if amount <= Decimal::ZERO {
            return BorrowPlan::AtCeiling {
                borrowed: balance.borrowed,
                max_total_borrow: config.max_total_borrow,
            };
        }
    }

    BorrowPlan::Borrow(amount)
}

fn clamp_per_borrow(config: &MarginAssetConfig, amount: Decimal) -> Decimal {
    if config.max_quantity_per_borrow.is_zero() {
        amount
    } else {
        amount.min(config.max_quantity_per_borrow)
    }
}
