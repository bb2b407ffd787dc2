//! Auto-borrow strategy configuration.

use std::collections::HashSet;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::duration;
use crate::domain::MarginAssetConfig;
use crate::error::ConfigError;

/// Configuration of one auto-borrow strategy instance.
///
/// Accepts both snake_case keys and the camelCase spellings used by
/// existing deployments (`minMarginLevel`, `repayWhenDeposit`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct AutoBorrowConfig {
    /// Time between evaluation passes, e.g. `"30m"`.
    #[serde(deserialize_with = "duration::deserialize")]
    pub interval: Duration,
    /// Margin level floor. Zero disables borrowing and repay-on-deposit.
    #[serde(default, alias = "minMarginLevel")]
    pub min_margin_level: Decimal,
    /// Accepted but not consulted by the borrow or repay logic.
    #[serde(default, alias = "maxMarginLevel")]
    pub max_margin_level: Decimal,
    /// Sweep available funds into debt repayment when deposits arrive.
    #[serde(
        default,
        alias = "repayWhenDeposit",
        alias = "autoRepayWhenDeposit"
    )]
    pub repay_when_deposit: bool,
    /// Assets to keep funded, evaluated in this order.
    #[serde(default)]
    pub assets: Vec<MarginAssetConfig>,
}

impl AutoBorrowConfig {
    /// Create a config with no assets and repay-on-deposit disabled.
    #[must_use]
    pub fn new(interval: Duration, min_margin_level: Decimal) -> Self {
        Self {
            interval,
            min_margin_level,
            max_margin_level: Decimal::ZERO,
            repay_when_deposit: false,
            assets: vec![],
        }
    }

    #[must_use]
    pub fn with_asset(mut self, asset: MarginAssetConfig) -> Self {
        self.assets.push(asset);
        self
    }

    #[must_use]
    pub fn with_repay_when_deposit(mut self, enabled: bool) -> Self {
        self.repay_when_deposit = enabled;
        self
    }

    /// True when a margin level floor is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.min_margin_level.is_zero()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "interval",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.min_margin_level < Decimal::ZERO {
            return Err(non_negative("min_margin_level"));
        }
        if self.max_margin_level < Decimal::ZERO {
            return Err(non_negative("max_margin_level"));
        }

        let mut seen = HashSet::new();
        for asset in &self.assets {
            if asset.asset.is_blank() {
                return Err(ConfigError::MissingField { field: "asset" });
            }
            if !seen.insert(asset.asset.clone()) {
                return Err(ConfigError::InvalidValue {
                    field: "assets",
                    reason: format!("duplicate asset {}", asset.asset),
                });
            }
            if asset.low < Decimal::ZERO {
                return Err(non_negative("low"));
            }
            if asset.max_total_borrow < Decimal::ZERO {
                return Err(non_negative("max_total_borrow"));
            }
            if asset.max_quantity_per_borrow < Decimal::ZERO {
                return Err(non_negative("max_quantity_per_borrow"));
            }
            if asset.min_quantity_per_borrow < Decimal::ZERO {
                return Err(non_negative("min_quantity_per_borrow"));
            }
        }
        Ok(())
    }
}

fn non_negative(field: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: "must be 0 or greater".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(content: &str) -> AutoBorrowConfig {
        toml::from_str(content).expect("valid auto-borrow config")
    }

    #[test]
    fn parses_camel_case_keys() {
        let config = parse(
            r#"
            interval = "30m"
            repayWhenDeposit = true
            minMarginLevel = 1.5

            [[assets]]
            asset = "ETH"
            low = 3.0
            maxQuantityPerBorrow = 1.0
            maxTotalBorrow = 10.0
            "#,
        );

        assert_eq!(config.interval, Duration::from_secs(1800));
        assert!(config.repay_when_deposit);
        assert_eq!(config.min_margin_level, dec!(1.5));
        assert_eq!(config.assets.len(), 1);
        assert_eq!(config.assets[0].asset.as_str(), "ETH");
        assert_eq!(config.assets[0].low, dec!(3.0));
        assert_eq!(config.assets[0].max_quantity_per_borrow, dec!(1.0));
        assert_eq!(config.assets[0].max_total_borrow, dec!(10.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_snake_case_and_legacy_repay_key() {
        let config = parse(
            r#"
            interval = "1h"
            autoRepayWhenDeposit = true
            min_margin_level = "1.25"
            max_margin_level = 3

            [[assets]]
            asset = "USDT"
            low = 1000
            max_quantity_per_borrow = 100
            min_quantity_per_borrow = 10
            "#,
        );

        assert_eq!(config.interval, Duration::from_secs(3600));
        assert!(config.repay_when_deposit);
        assert_eq!(config.min_margin_level, dec!(1.25));
        assert_eq!(config.max_margin_level, dec!(3));
        assert_eq!(config.assets[0].min_quantity_per_borrow, dec!(10));
        assert_eq!(config.assets[0].max_total_borrow, dec!(0));
    }

    #[test]
    fn rejects_zero_interval() {
        let config = parse("interval = 0\nmin_margin_level = 1.5");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "interval", .. })
        ));
    }

    #[test]
    fn rejects_duplicate_assets() {
        let config = AutoBorrowConfig::new(Duration::from_secs(60), dec!(1.5))
            .with_asset(MarginAssetConfig::new("ETH", dec!(1)))
            .with_asset(MarginAssetConfig::new("ETH", dec!(2)));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "assets", .. })
        ));
    }

    #[test]
    fn rejects_negative_limits() {
        let config = AutoBorrowConfig::new(Duration::from_secs(60), dec!(1.5))
            .with_asset(MarginAssetConfig::new("ETH", dec!(1)).with_max_total_borrow(dec!(-1)));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "max_total_borrow", .. })
        ));
    }

    #[test]
    fn zero_min_margin_level_disables() {
        let config = AutoBorrowConfig::new(Duration::from_secs(60), dec!(0));
        assert!(!config.is_enabled());
        assert!(config.validate().is_ok());
    }
}
