//! Balance service
//!
//! Aggregates the whole transaction set into income, outcome and total.

use crate::error::TallyResult;
use crate::models::Balance;
use crate::storage::TransactionRepository;

/// Pure read over the stored transactions
pub struct BalanceService<'a> {
    transactions: &'a TransactionRepository,
}

impl<'a> BalanceService<'a> {
    pub fn new(transactions: &'a TransactionRepository) -> Self {
        Self { transactions }
    }

    /// Current income, outcome and total over every stored transaction
    pub fn get_balance(&self) -> TallyResult<Balance> {
        let transactions = self.transactions.get_all()?;
        Balance::from_transactions(&transactions)
    }
}
