//! Core data models for Tally
//!
//! This module contains the data structures of the ledger domain:
//! transactions, categories, money amounts and the derived balance.

pub mod balance;
pub mod category;
pub mod ids;
pub mod money;
pub mod transaction;

pub use balance::{Balance, LedgerSnapshot};
pub use category::{Category, CategoryValidationError};
pub use ids::{CategoryId, TransactionId};
pub use money::{Money, MoneyParseError};
pub use transaction::{Transaction, TransactionKind, TransactionValidationError};
