//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`exchange`] - Scripted [`AccountProvider`](crate::port::AccountProvider) and
//!   recording [`MarginBorrowRepay`](crate::port::MarginBorrowRepay) doubles.
//! - [`notifier`] - Event-collecting [`Notifier`](crate::port::Notifier).

pub mod exchange;
pub mod notifier;

pub use exchange::{RecordingMargin, ScriptedAccount};
pub use notifier::RecordingNotifier;
