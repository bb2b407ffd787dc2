//! Autoborrow - automated margin borrow/repay controller.
//!
//! Keeps configured margin assets funded by borrowing on a schedule while
//! the account's margin level stays above a configured floor, and sweeps
//! deposits into debt repayment when it does not.
//!
//! # Architecture
//!
//! - **`domain`** - Account snapshots, balances and the pure borrow sizer
//! - **`port`** - Exchange, notifier and strategy traits
//! - **`application`** - The auto-borrow strategy, registry and runtime
//! - **`adapter`** - Paper exchange and notification backends
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`cli`] - Command-line interface
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `webhook` - Post notifications to an incoming-webhook URL (default)
//! - `testkit` - Expose test doubles to integration tests
//!
//! # Example
//!
//! ```no_run
//! use autoborrow::application::registry::StrategyRegistry;
//! use autoborrow::config::Config;
//!
//! let config = Config::load("config.toml").expect("config");
//! let strategies = StrategyRegistry::with_defaults()
//!     .build_all(&config.strategies)
//!     .expect("strategies");
//! ```

pub mod adapter;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
