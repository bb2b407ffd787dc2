//! Notifier port for event notifications.
//!
//! This module defines the trait for sending notifications about
//! borrow/repay decisions and failed margin requests.

use rust_decimal::Decimal;

use crate::domain::{Asset, Decision, MarginAction};

/// Events that can trigger notifications.
#[derive(Debug, Clone)]
pub enum Event {
    /// A borrow or repay was decided and dispatched.
    MarginAction(MarginActionEvent),
    /// The exchange rejected a dispatched borrow or repay.
    ActionFailed(ActionFailedEvent),
}

/// Alert payload for a dispatched decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarginActionEvent {
    pub action: MarginAction,
    pub asset: Asset,
    pub amount: Decimal,
    /// Account margin level when the decision was made.
    pub margin_level: Decimal,
    /// Configured margin level floor.
    pub min_margin_level: Decimal,
}

impl MarginActionEvent {
    /// One-line summary, e.g. `Borrow 0.5 ETH`.
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} {} {}", self.action, self.amount, self.asset)
    }
}

impl From<&Decision> for MarginActionEvent {
    fn from(decision: &Decision) -> Self {
        Self {
            action: decision.action(),
            asset: decision.asset().clone(),
            amount: decision.amount(),
            margin_level: decision.margin_level(),
            min_margin_level: decision.min_margin_level(),
        }
    }
}

/// Failed borrow or repay request.
#[derive(Debug, Clone)]
pub struct ActionFailedEvent {
    pub action: MarginAction,
    pub asset: Asset,
    pub amount: Decimal,
    pub reason: String,
}

/// Trait for notification handlers.
///
/// Notifications are fire-and-forget and must never feed back into
/// borrow/repay control flow.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - The `notify` method should not block or perform slow I/O synchronously
/// - Consider spawning async tasks for slow operations
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}
