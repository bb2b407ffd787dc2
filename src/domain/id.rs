//! Domain identifier types with proper encapsulation.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset (currency) identifier - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Asset(String);

impl Asset {
    /// Create a new `Asset` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the asset symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the symbol is empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Asset {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Asset {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Borrow<str> for Asset {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn asset_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Asset::from("ETH"), 1);
        assert_eq!(map.get("ETH"), Some(&1));
        assert_eq!(map.get("BTC"), None);
    }

    #[test]
    fn blank_asset() {
        assert!(Asset::from("  ").is_blank());
        assert!(!Asset::from("USDT").is_blank());
    }
}
