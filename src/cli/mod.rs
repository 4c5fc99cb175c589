//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod category;
pub mod export;
pub mod import;
pub mod transaction;

pub use category::{handle_category_command, CategoryCommands};
pub use export::{handle_export_command, ExportFormat};
pub use import::handle_import_command;
pub use transaction::{handle_balance_command, handle_transaction_command, TransactionCommands};
