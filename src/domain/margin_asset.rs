//! Per-asset borrow limits.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::id::Asset;

/// Borrow thresholds and ceilings for one asset.
///
/// Every limit uses zero to mean "not configured".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarginAssetConfig {
    pub asset: Asset,
    /// Borrow when holdings drop below this amount. Zero disables the asset.
    #[serde(default)]
    pub low: Decimal,
    /// Ceiling on the asset's total outstanding debt.
    #[serde(default, alias = "maxTotalBorrow")]
    pub max_total_borrow: Decimal,
    /// Ceiling on a single borrow request.
    #[serde(default, alias = "maxQuantityPerBorrow")]
    pub max_quantity_per_borrow: Decimal,
    /// Accepted for compatibility, not used by sizing.
    #[serde(default, alias = "minQuantityPerBorrow")]
    pub min_quantity_per_borrow: Decimal,
}

impl MarginAssetConfig {
    /// Create a config with only the low-balance threshold set.
    pub fn new(asset: impl Into<Asset>, low: Decimal) -> Self {
        Self {
            asset: asset.into(),
            low,
            max_total_borrow: Decimal::ZERO,
            max_quantity_per_borrow: Decimal::ZERO,
            min_quantity_per_borrow: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn with_max_total_borrow(mut self, max: Decimal) -> Self {
        self.max_total_borrow = max;
        self
    }

    #[must_use]
    pub fn with_max_quantity_per_borrow(mut self, max: Decimal) -> Self {
        self.max_quantity_per_borrow = max;
        self
    }

    /// True when the low-balance threshold is set.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.low.is_zero()
    }
}
