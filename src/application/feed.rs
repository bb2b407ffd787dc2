//! Balance update normalization.
//!
//! Exchanges either push per-asset deltas or the full balance map after
//! every change. [`BalanceFeed`] turns both shapes into the single
//! [`BalanceChange`] event the repay trigger consumes.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::domain::{Asset, BalanceChange};
use crate::port::BalanceUpdate;

/// Stateful normalizer for one balance update stream.
#[derive(Debug, Default)]
pub struct BalanceFeed {
    last_available: Option<HashMap<Asset, Decimal>>,
}

impl BalanceFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert an exchange update into zero or more balance changes.
    ///
    /// Deltas pass through. Snapshots are diffed against the previous
    /// snapshot by available balance; the first snapshot only establishes
    /// the baseline. Changes are ordered by asset.
    pub fn normalize(&mut self, update: BalanceUpdate) -> Vec<BalanceChange> {
        match update {
            BalanceUpdate::Delta { asset, delta } => vec![BalanceChange::new(asset, delta)],
            BalanceUpdate::Snapshot(balances) => {
                let current: HashMap<Asset, Decimal> = balances
                    .into_iter()
                    .map(|(asset, balance)| (asset, balance.available))
                    .collect();

                let Some(previous) = self.last_available.replace(current.clone()) else {
                    return vec![];
                };

                let mut changes: Vec<BalanceChange> = current
                    .iter()
                    .map(|(asset, available)| {
                        let before = previous.get(asset).copied().unwrap_or(Decimal::ZERO);
                        BalanceChange::new(asset.clone(), *available - before)
                    })
                    .chain(
                        previous
                            .iter()
                            .filter(|(asset, _)| !current.contains_key(*asset))
                            .map(|(asset, before)| BalanceChange::new(asset.clone(), -*before)),
                    )
                    .filter(|change| !change.delta.is_zero())
                    .collect();
                changes.sort_by(|a, b| a.asset.cmp(&b.asset));
                changes
            }
        }
    }
}
