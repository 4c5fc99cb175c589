//! Transaction service
//!
//! Provides the single-transaction operations of the ledger: listing with the
//! running balance, creation guarded by the insufficient-balance rule, lookup
//! and deletion.

use crate::error::{TallyError, TallyResult};
use crate::models::category::validate_title as validate_category_title;
use crate::models::transaction::{validate_title, validate_value};
use crate::models::{Balance, LedgerSnapshot, Money, Transaction, TransactionId, TransactionKind};
use crate::storage::Storage;

use super::balance::BalanceService;
use super::category::CategoryService;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub title: String,
    pub value: Money,
    pub kind: TransactionKind,
    /// Category title; created on first use
    pub category: String,
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn balances(&self) -> BalanceService<'a> {
        BalanceService::new(&self.storage.transactions)
    }

    /// List all transactions in creation order
    pub fn list(&self) -> TallyResult<Vec<Transaction>> {
        self.storage.transactions.get_all()
    }

    /// Current ledger balance
    pub fn get_balance(&self) -> TallyResult<Balance> {
        self.balances().get_balance()
    }

    /// Every transaction together with the balance over them
    pub fn snapshot(&self) -> TallyResult<LedgerSnapshot> {
        let transactions = self.list()?;
        let balance = Balance::from_transactions(&transactions)?;
        Ok(LedgerSnapshot {
            transactions,
            balance,
        })
    }

    /// Create a new transaction
    ///
    /// An outcome larger than the current total is rejected with
    /// `InsufficientBalance`, and a value that would take the totals out of
    /// range with `Validation`. Both checks run before any category is
    /// resolved, so a rejected call leaves the store exactly as it was.
    pub fn create(&self, input: CreateTransactionInput) -> TallyResult<Transaction> {
        let title = input.title.trim();
        let category = input.category.trim();

        validate_title(title).map_err(|e| TallyError::Validation(e.to_string()))?;
        validate_value(input.value).map_err(|e| TallyError::Validation(e.to_string()))?;
        validate_category_title(category).map_err(|e| TallyError::Validation(e.to_string()))?;

        let balance = self.get_balance()?;
        if input.kind == TransactionKind::Outcome && balance.cannot_cover(input.value) {
            tracing::info!(
                needed = input.value.cents(),
                available = balance.total.cents(),
                "outcome rejected"
            );
            return Err(TallyError::InsufficientBalance {
                needed: input.value,
                available: balance.total,
            });
        }
        if balance.checked_record(input.kind, input.value).is_none() {
            return Err(TallyError::Validation(format!(
                "{} would push the ledger totals out of range",
                input.value
            )));
        }

        let category = CategoryService::from_storage(self.storage).resolve_one(category)?;

        let txn = Transaction::new(title, input.value, input.kind, category.id);
        self.storage.transactions.insert(txn.clone())?;

        tracing::debug!(id = %txn.id, kind = %txn.kind, value = txn.value.cents(), "transaction created");
        Ok(txn)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> TallyResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full ID or short display form
    ///
    /// A prefix matching more than one transaction is a validation error.
    pub fn find(&self, identifier: &str) -> TallyResult<Option<Transaction>> {
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.get(id);
        }

        let mut matches = self.storage.transactions.find_matching(identifier)?;
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(TallyError::Validation(format!(
                "'{}' matches {} transactions; use a longer ID",
                identifier.trim(),
                n
            ))),
        }
    }

    /// Delete a transaction, leaving its category in place
    pub fn delete(&self, id: TransactionId) -> TallyResult<Transaction> {
        let removed = self
            .storage
            .transactions
            .delete(id)?
            .ok_or_else(|| TallyError::transaction_not_found(id.to_string()))?;

        tracing::debug!(id = %removed.id, "transaction deleted");
        Ok(removed)
    }
}
