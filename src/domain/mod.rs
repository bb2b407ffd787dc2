//! Exchange-agnostic domain logic.

mod account;
mod balance;
mod decision;
mod id;
mod margin_asset;
mod sizing;

pub use account::AccountSnapshot;
pub use balance::{Balance, BalanceChange, BalanceMap};
pub use decision::{Decision, MarginAction};
pub use id::Asset;
pub use margin_asset::MarginAssetConfig;
pub use sizing::{size_borrow, BorrowPlan};
