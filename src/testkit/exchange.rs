//! Exchange doubles.
//!
//! - [`ScriptedAccount`] serves a fixed snapshot and can fail the next refresh.
//! - [`RecordingMargin`] records every borrow/repay request and optionally
//!   rejects them.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use tokio::sync::watch;

use crate::domain::{AccountSnapshot, Asset};
use crate::error::ExchangeError;
use crate::port::{AccountProvider, MarginBorrowRepay};

const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// ScriptedAccount
// ---------------------------------------------------------------------------

/// Account provider returning a settable snapshot.
#[derive(Default)]
pub struct ScriptedAccount {
    snapshot: RwLock<AccountSnapshot>,
    next_refresh_error: Mutex<Option<String>>,
    refresh_count: AtomicU32,
}

impl ScriptedAccount {
    pub fn new(snapshot: AccountSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
            ..Default::default()
        }
    }

    /// Make the next `refresh()` call fail with `reason`.
    pub fn fail_next_refresh(&self, reason: &str) {
        *self.next_refresh_error.lock() = Some(reason.to_string());
    }

    pub fn refresh_count(&self) -> u32 {
        self.refresh_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountProvider for ScriptedAccount {
    async fn refresh(&self) -> Result<(), ExchangeError> {
        self.refresh_count.fetch_add(1, Ordering::SeqCst);
        match self.next_refresh_error.lock().take() {
            Some(reason) => Err(ExchangeError::Refresh(reason)),
            None => Ok(()),
        }
    }

    fn snapshot(&self) -> AccountSnapshot {
        self.snapshot.read().clone()
    }
}

// ---------------------------------------------------------------------------
// RecordingMargin
// ---------------------------------------------------------------------------

/// Margin facility that records requests instead of executing them.
///
/// Rejected requests are recorded too.
pub struct RecordingMargin {
    borrows: Mutex<Vec<(Asset, Decimal)>>,
    repays: Mutex<Vec<(Asset, Decimal)>>,
    failure: Mutex<Option<String>>,
    requests: watch::Sender<usize>,
}

impl RecordingMargin {
    pub fn new() -> Self {
        let (requests, _) = watch::channel(0);
        Self {
            borrows: Mutex::new(Vec::new()),
            repays: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            requests,
        }
    }

    /// Reject every following request with `reason`.
    pub fn fail_with(&self, reason: &str) {
        *self.failure.lock() = Some(reason.to_string());
    }

    pub fn borrows(&self) -> Vec<(Asset, Decimal)> {
        self.borrows.lock().clone()
    }

    pub fn repays(&self) -> Vec<(Asset, Decimal)> {
        self.repays.lock().clone()
    }

    /// Wait until at least `n` borrow or repay requests were received.
    ///
    /// # Panics
    ///
    /// Panics if the requests do not arrive within five seconds.
    pub async fn wait_for_requests(&self, n: usize) {
        let mut requests = self.requests.subscribe();
        tokio::time::timeout(WAIT_TIMEOUT, requests.wait_for(|count| *count >= n))
            .await
            .expect("timed out waiting for margin requests")
            .expect("request counter alive");
    }

    fn record(&self) -> Option<String> {
        self.requests.send_modify(|count| *count += 1);
        self.failure.lock().clone()
    }
}

impl Default for RecordingMargin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarginBorrowRepay for RecordingMargin {
    async fn borrow(&self, asset: &Asset, amount: Decimal) -> Result<(), ExchangeError> {
        self.borrows.lock().push((asset.clone(), amount));
        match self.record() {
            Some(reason) => Err(ExchangeError::Borrow {
                asset: asset.to_string(),
                amount,
                reason,
            }),
            None => Ok(()),
        }
    }

    async fn repay(&self, asset: &Asset, amount: Decimal) -> Result<(), ExchangeError> {
        self.repays.lock().push((asset.clone(), amount));
        match self.record() {
            Some(reason) => Err(ExchangeError::Repay {
                asset: asset.to_string(),
                amount,
                reason,
            }),
            None => Ok(()),
        }
    }
}
