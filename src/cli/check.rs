//! Configuration validation command.

use std::path::Path;

use rust_decimal::Decimal;
use tabled::{Table, Tabled};

use crate::application::autoborrow::{self, AutoBorrowConfig};
use crate::application::registry::{StrategyEntry, StrategyRegistry};
use crate::cli::output;
use crate::config::Config;
use crate::error::{ConfigError, Result};

#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Low")]
    low: String,
    #[tabled(rename = "Max / Borrow")]
    max_per_borrow: String,
    #[tabled(rename = "Max Total")]
    max_total: String,
}

fn limit(value: Decimal) -> String {
    if value > Decimal::ZERO {
        value.to_string()
    } else {
        "-".to_string()
    }
}

/// Validate configuration file without starting any strategy.
pub fn execute<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Config", path.display());

    let config = match Config::load(path) {
        Ok(config) => config,
        Err(e) => {
            output::error(&format!("Invalid configuration: {e}"));
            return Err(e);
        }
    };

    let registry = StrategyRegistry::with_defaults();
    if let Err(e) = registry.build_all(&config.strategies) {
        output::error(&format!("Invalid strategy configuration: {e}"));
        return Err(e);
    }
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Exchange", format!("{:?}", config.exchange.kind).to_lowercase());
    output::field(
        "Logging",
        format!("{} ({})", config.logging.level, config.logging.format),
    );
    output::field("Log notifier", config.notifier.log);
    output::field("Webhook", config.notifier.webhook_url.is_some());

    if config.strategies.is_empty() {
        output::warning("No strategies configured");
    }

    for entry in &config.strategies {
        if entry.id == autoborrow::ID {
            print_autoborrow(entry)?;
        }
    }

    println!();
    output::note(&format!(
        "Run {} to start",
        output::highlight(format!("autoborrow run --config {}", path.display()))
    ));

    Ok(())
}

fn print_autoborrow(entry: &StrategyEntry) -> Result<()> {
    let config: AutoBorrowConfig = toml::Value::Table(entry.settings.clone())
        .try_into()
        .map_err(ConfigError::Parse)?;

    output::section(autoborrow::ID);
    output::field("Interval", format!("{:?}", config.interval));
    output::field("Min margin level", config.min_margin_level);
    output::field("Repay on deposit", config.repay_when_deposit);

    if !config.is_enabled() {
        output::warning("min_margin_level is 0, auto-borrow will not run");
    }

    if config.assets.is_empty() {
        output::warning("No margin assets configured");
        return Ok(());
    }

    let rows: Vec<AssetRow> = config
        .assets
        .iter()
        .map(|asset| AssetRow {
            asset: asset.asset.to_string(),
            low: limit(asset.low),
            max_per_borrow: limit(asset.max_quantity_per_borrow),
            max_total: limit(asset.max_total_borrow),
        })
        .collect();

    println!();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}
