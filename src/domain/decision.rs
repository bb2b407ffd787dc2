//! Borrow/repay decisions.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::id::Asset;

/// Margin facility action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MarginAction {
    Borrow,
    Repay,
}

impl fmt::Display for MarginAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Borrow => write!(f, "Borrow"),
            Self::Repay => write!(f, "Repay"),
        }
    }
}

/// A single borrow or repay the controller decided to dispatch.
///
/// Construction goes through [`Decision::new`], which refuses
/// non-positive amounts, so every value of this type is dispatchable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    action: MarginAction,
    asset: Asset,
    amount: Decimal,
    margin_level: Decimal,
    min_margin_level: Decimal,
}

impl Decision {
    /// Create a decision, or `None` when `amount` is zero or negative.
    #[must_use]
    pub fn new(
        action: MarginAction,
        asset: Asset,
        amount: Decimal,
        margin_level: Decimal,
        min_margin_level: Decimal,
    ) -> Option<Self> {
        if amount <= Decimal::ZERO {
            return None;
        }
        Some(Self {
            action,
            asset,
            amount,
            margin_level,
            min_margin_level,
        })
    }

    #[must_use]
    pub const fn action(&self) -> MarginAction {
        self.action
    }

    #[must_use]
    pub const fn asset(&self) -> &Asset {
        &self.asset
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Account margin level when the decision was made.
    #[must_use]
    pub const fn margin_level(&self) -> Decimal {
        self.margin_level
    }

    /// Configured margin level floor when the decision was made.
    #[must_use]
    pub const fn min_margin_level(&self) -> Decimal {
        self.min_margin_level
    }
}
