//! Handler for the `run` command.

use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};

#[cfg(feature = "webhook")]
use crate::adapter::notifier::WebhookNotifier;
use crate::adapter::notifier::{LogNotifier, NotifierRegistry};
use crate::adapter::paper::PaperExchange;
use crate::application::registry::StrategyRegistry;
use crate::application::runtime::Runtime;
use crate::cli::RunArgs;
use crate::config::{Config, ExchangeConfig, ExchangeKind, NotifierConfig};
use crate::error::Result;
use crate::port::{ExchangeSession, Notifier};

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;

    // Apply CLI overrides
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }

    config.init_logging();
    info!(
        exchange = ?config.exchange.kind,
        strategies = config.strategies.len(),
        "autoborrow starting"
    );

    let strategies = StrategyRegistry::with_defaults().build_all(&config.strategies)?;
    if strategies.is_empty() {
        warn!("No strategies configured, nothing to do until shutdown");
    }

    let session = build_session(&config.exchange);
    let notifier = build_notifier(&config.notifier)?;
    let runtime = Runtime::start(strategies, &session, notifier).await?;

    signal::ctrl_c().await?;
    info!("Shutdown signal received");

    runtime.shutdown().await;
    info!("autoborrow stopped");
    Ok(())
}

/// Connect to the configured exchange.
pub fn build_session(config: &ExchangeConfig) -> ExchangeSession {
    match config.kind {
        ExchangeKind::Paper => Arc::new(PaperExchange::from_config(&config.paper)).session(),
    }
}

/// Assemble the configured notification backends.
///
/// Must be called from within a tokio runtime when a webhook is configured.
pub fn build_notifier(config: &NotifierConfig) -> Result<Arc<dyn Notifier>> {
    let mut registry = NotifierRegistry::new();

    if config.log {
        registry.register(Box::new(LogNotifier));
    }

    #[cfg(feature = "webhook")]
    {
        if let Some(ref url) = config.webhook_url {
            registry.register(Box::new(WebhookNotifier::new(url.clone())?));
        }
    }

    #[cfg(not(feature = "webhook"))]
    {
        if config.webhook_url.is_some() {
            warn!("webhook_url is set but the webhook feature is disabled");
        }
    }

    info!(notifiers = registry.len(), "Notifiers configured");
    Ok(Arc::new(registry))
}
