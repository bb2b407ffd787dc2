#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use autoborrow::adapter::paper::PaperExchange;
use autoborrow::domain::{AccountSnapshot, Balance};
use rust_decimal::Decimal;
use tempfile::NamedTempFile;

const EVENTUALLY_TIMEOUT: Duration = Duration::from_secs(5);

/// Write `contents` to a temporary `.toml` file that lives as long as the handle.
pub fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("autoborrow-config-test-")
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

/// Paper account at `margin_level` holding one balance.
pub fn paper(margin_level: Decimal, balance: Balance) -> Arc<PaperExchange> {
    let snapshot = AccountSnapshot {
        margin_level,
        ..Default::default()
    }
    .with_balance(balance);
    Arc::new(PaperExchange::new(snapshot))
}

/// Poll `condition` until it holds, failing the test after five seconds.
pub async fn eventually(what: &str, condition: impl Fn() -> bool) {
    let reached = tokio::time::timeout(EVENTUALLY_TIMEOUT, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(reached.is_ok(), "timed out waiting for {what}");
}
