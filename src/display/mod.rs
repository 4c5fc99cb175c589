//! Display formatting for terminal output
//!
//! Plain-text tables for the register, balance, transaction details and
//! category usage.

pub mod category;
pub mod transaction;

pub use category::format_category_usage;
pub use transaction::{
    format_balance, format_transaction_details, format_transaction_register,
    format_transaction_row,
};
