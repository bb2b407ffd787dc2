//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides for secrets such as `AUTOBORROW_WEBHOOK_URL`.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::registry::StrategyEntry;
use crate::domain::Balance;
use crate::error::{ConfigError, Result};

pub mod duration;
mod logging;

pub use logging::LoggingConfig;

/// Environment variable that overrides `notifier.webhook_url`.
pub const WEBHOOK_URL_ENV: &str = "AUTOBORROW_WEBHOOK_URL";

/// Supported exchange adapters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeKind {
    /// In-memory simulated margin account.
    #[default]
    Paper,
}

/// Exchange connection settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExchangeConfig {
    #[serde(default)]
    pub kind: ExchangeKind,
    /// Seed state for the paper exchange.
    #[serde(default)]
    pub paper: PaperConfig,
}

/// Initial state of the paper exchange account.
#[derive(Debug, Clone, Deserialize)]
pub struct PaperConfig {
    #[serde(default = "default_paper_margin_level")]
    pub margin_level: Decimal,
    #[serde(default)]
    pub margin_ratio: Decimal,
    #[serde(default)]
    pub margin_tolerance: Decimal,
    #[serde(default)]
    pub balances: Vec<Balance>,
}

fn default_paper_margin_level() -> Decimal {
    Decimal::from(999)
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            margin_level: default_paper_margin_level(),
            margin_ratio: Decimal::ZERO,
            margin_tolerance: Decimal::ZERO,
            balances: vec![],
        }
    }
}

/// Notification settings.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
    /// Log every notification through `tracing`.
    #[serde(default = "default_true")]
    pub log: bool,
    /// Incoming-webhook URL accepting Slack-style attachments.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

const fn default_true() -> bool {
    true
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            log: true,
            webhook_url: None,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Exchange to run strategies against.
    #[serde(default)]
    pub exchange: ExchangeConfig,

    /// Notification backends.
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Strategies to start, in order. Each entry is decoded by the factory
    /// registered under its `id`.
    #[serde(default)]
    pub strategies: Vec<StrategyEntry>,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Ok(url) = std::env::var(WEBHOOK_URL_ENV) {
            if !url.trim().is_empty() {
                config.notifier.webhook_url = Some(url);
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Initialize logging from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Validate configuration values.
    ///
    /// Strategy settings are validated by their factories when built.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if !self.logging.is_known_format() {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("expected pretty or json, got {}", self.logging.format),
            }
            .into());
        }

        let paper = &self.exchange.paper;
        if paper.margin_level < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "exchange.paper.margin_level",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }
        for balance in &paper.balances {
            if balance.currency.is_blank() {
                return Err(ConfigError::MissingField {
                    field: "exchange.paper.balances.currency",
                }
                .into());
            }
            if balance.available < Decimal::ZERO
                || balance.locked < Decimal::ZERO
                || balance.borrowed < Decimal::ZERO
            {
                return Err(ConfigError::InvalidValue {
                    field: "exchange.paper.balances",
                    reason: format!("{} amounts must be 0 or greater", balance.currency),
                }
                .into());
            }
        }

        if let Some(ref url) = self.notifier.webhook_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::InvalidValue {
                    field: "notifier.webhook_url",
                    reason: "must be an http(s) URL".to_string(),
                }
                .into());
            }
        }

        for entry in &self.strategies {
            if entry.id.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "strategies.id",
                }
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse_toml("").expect("defaults");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.exchange.kind, ExchangeKind::Paper);
        assert_eq!(config.exchange.paper.margin_level, dec!(999));
        assert!(config.notifier.log);
        assert!(config.strategies.is_empty());
    }

    #[test]
    fn parses_paper_balances_and_strategies() {
        let config = Config::parse_toml(
            r#"
            [exchange]
            kind = "paper"

            [exchange.paper]
            margin_level = 2.5

            [[exchange.paper.balances]]
            currency = "ETH"
            available = 0.5
            borrowed = 9.5

            [[strategies]]
            id = "autoborrow"
            interval = "30m"
            min_margin_level = 1.5

            [[strategies.assets]]
            asset = "ETH"
            low = 3.0
            "#,
        )
        .expect("valid config");

        assert_eq!(config.exchange.paper.margin_level, dec!(2.5));
        assert_eq!(config.exchange.paper.balances.len(), 1);
        assert_eq!(config.exchange.paper.balances[0].borrowed, dec!(9.5));
        assert_eq!(config.exchange.paper.balances[0].locked, dec!(0));
        assert_eq!(config.strategies.len(), 1);
        assert_eq!(config.strategies[0].id, "autoborrow");
        assert!(config.strategies[0].settings.contains_key("assets"));
    }

    #[test]
    fn rejects_unknown_log_format() {
        let result = Config::parse_toml("[logging]\nformat = \"xml\"");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { field: "logging.format", .. }))
        ));
    }

    #[test]
    fn rejects_negative_paper_balance() {
        let result = Config::parse_toml(
            r#"
            [[exchange.paper.balances]]
            currency = "ETH"
            available = -1
            "#,
        );
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { field: "exchange.paper.balances", .. }))
        ));
    }

    #[test]
    fn rejects_non_http_webhook() {
        let result = Config::parse_toml("[notifier]\nwebhook_url = \"ftp://example.com\"");
        assert!(result.is_err());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let result = Config::parse_toml("[logging");
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }
}
