use rust_decimal::Decimal;
use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("exchange {exchange} does not implement {capability}")]
    MissingCapability {
        exchange: String,
        capability: &'static str,
    },

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
}

/// Errors reported by exchange collaborators.
#[derive(Error, Debug, Clone)]
pub enum ExchangeError {
    #[error("account refresh failed: {0}")]
    Refresh(String),

    #[error("borrow {amount} {asset} failed: {reason}")]
    Borrow {
        asset: String,
        amount: Decimal,
        reason: String,
    },

    #[error("repay {amount} {asset} failed: {reason}")]
    Repay {
        asset: String,
        amount: Decimal,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[cfg(feature = "webhook")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
