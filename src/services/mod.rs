//! Service layer for Tally
//!
//! The service layer provides the ledger rules on top of the storage layer:
//! balance computation, category resolution, single-transaction validation
//! and bulk import.

pub mod balance;
pub mod category;
pub mod import;
pub mod transaction;

pub use balance::BalanceService;
pub use category::{CategoryService, CategoryUsage};
pub use import::{ImportPhase, ImportService, ParsedRecord};
pub use transaction::{CreateTransactionInput, TransactionService};
