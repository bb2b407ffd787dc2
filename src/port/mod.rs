//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the extension points adapters implement to integrate with
//! external systems.
//!
//! # Available Ports
//!
//! - [`AccountProvider`], [`MarginBorrowRepay`], [`ExchangeSession`] - Exchange integration
//! - [`Notifier`] - Event notifications (webhooks, logging, etc.)
//! - [`Strategy`] - Strategies started by the runtime

mod exchange;
mod notifier;
mod strategy;

pub use exchange::{
    AccountProvider, BalanceUpdate, ExchangeSession, MarginBorrowRepay, MARGIN_BORROW_REPAY,
};
pub use notifier::{ActionFailedEvent, Event, MarginActionEvent, Notifier};
pub use strategy::{Strategy, StrategyHandle};
