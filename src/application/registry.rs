//! Strategy factory registry.
//!
//! The host builds the registry explicitly at startup and hands it to the
//! runtime; nothing registers itself globally.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::autoborrow::{self, AutoBorrowStrategy};
use crate::error::{ConfigError, Result};
use crate::port::Strategy;

/// Builds a strategy from its raw configuration table.
pub type StrategyFactory = fn(toml::Value) -> Result<Box<dyn Strategy>>;

/// One `[[strategies]]` entry: the strategy id plus its own settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyEntry {
    pub id: String,
    #[serde(flatten)]
    pub settings: toml::Table,
}

/// Map of strategy id to factory.
#[derive(Default)]
pub struct StrategyRegistry {
    factories: BTreeMap<&'static str, StrategyFactory>,
}

impl StrategyRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every bundled strategy.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(autoborrow::ID, AutoBorrowStrategy::from_value);
        registry
    }

    /// Register a factory, replacing any previous one for `id`.
    pub fn register(&mut self, id: &'static str, factory: StrategyFactory) {
        self.factories.insert(id, factory);
    }

    /// Registered ids in sorted order.
    #[must_use]
    pub fn ids(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Build the strategy described by `entry`.
    pub fn build(&self, entry: &StrategyEntry) -> Result<Box<dyn Strategy>> {
        let factory = self
            .factories
            .get(entry.id.as_str())
            .ok_or_else(|| ConfigError::UnknownStrategy(entry.id.clone()))?;
        factory(toml::Value::Table(entry.settings.clone()))
    }

    /// Build every configured strategy, failing on the first error.
    pub fn build_all(&self, entries: &[StrategyEntry]) -> Result<Vec<Box<dyn Strategy>>> {
        entries.iter().map(|entry| self.build(entry)).collect()
    }
}
