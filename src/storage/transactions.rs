//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json. Writes go to
//! disk first and only become visible in memory once the file is replaced, so
//! a failed write leaves both the file and the in-memory view untouched.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::TallyError;
use crate::models::{CategoryId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// In-memory table with indexes
#[derive(Debug, Clone, Default)]
struct TransactionTable {
    data: HashMap<TransactionId, Transaction>,
    /// Insertion order, which is creation order
    order: Vec<TransactionId>,
    /// Index: category_id -> transaction_ids
    by_category: HashMap<CategoryId, Vec<TransactionId>>,
}

impl TransactionTable {
    fn insert(&mut self, txn: Transaction) {
        self.order.push(txn.id);
        self.by_category
            .entry(txn.category_id)
            .or_default()
            .push(txn.id);
        self.data.insert(txn.id, txn);
    }

    fn remove(&mut self, id: TransactionId) -> Option<Transaction> {
        let txn = self.data.remove(&id)?;
        self.order.retain(|&tid| tid != id);
        if let Some(ids) = self.by_category.get_mut(&txn.category_id) {
            ids.retain(|&tid| tid != id);
        }
        Some(txn)
    }

    fn ordered(&self) -> Vec<Transaction> {
        self.order
            .iter()
            .filter_map(|id| self.data.get(id).cloned())
            .collect()
    }

    fn to_data(&self) -> TransactionData {
        TransactionData {
            transactions: self.ordered(),
        }
    }
}

/// Repository for transaction persistence with indexing
pub struct TransactionRepository {
    path: PathBuf,
    table: RwLock<TransactionTable>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            table: RwLock::new(TransactionTable::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, TransactionTable>, TallyError> {
        self.table
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, TransactionTable>, TallyError> {
        self.table
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load transactions from disk and build indexes
    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut loaded = TransactionTable::default();
        for txn in file_data.transactions {
            if loaded.data.contains_key(&txn.id) {
                return Err(TallyError::Storage(format!(
                    "Duplicate transaction id {} in {}",
                    txn.id,
                    self.path.display()
                )));
            }
            loaded.insert(txn);
        }

        *self.write()? = loaded;
        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), TallyError> {
        let table = self.read()?;
        write_json_atomic(&self.path, &table.to_data())
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, TallyError> {
        Ok(self.read()?.data.get(&id).cloned())
    }

    /// Get all transactions in creation order
    pub fn get_all(&self) -> Result<Vec<Transaction>, TallyError> {
        Ok(self.read()?.ordered())
    }

    /// Get transactions filed under a category, in creation order
    pub fn get_by_category(&self, category_id: CategoryId) -> Result<Vec<Transaction>, TallyError> {
        let table = self.read()?;
        let ids = table
            .by_category
            .get(&category_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        Ok(ids
            .iter()
            .filter_map(|id| table.data.get(id).cloned())
            .collect())
    }

    /// Find transactions whose ID matches a user-typed identifier
    pub fn find_matching(&self, identifier: &str) -> Result<Vec<Transaction>, TallyError> {
        let table = self.read()?;
        Ok(table
            .order
            .iter()
            .filter(|id| id.matches(identifier))
            .filter_map(|id| table.data.get(id).cloned())
            .collect())
    }

    /// Insert and persist a single transaction
    pub fn insert(&self, txn: Transaction) -> Result<(), TallyError> {
        self.insert_batch(vec![txn])
    }

    /// Insert and persist a batch of transactions as one unit
    ///
    /// Either every transaction is written and becomes visible, or none is.
    pub fn insert_batch(&self, txns: Vec<Transaction>) -> Result<(), TallyError> {
        if txns.is_empty() {
            return Ok(());
        }

        let mut table = self.write()?;
        let mut candidate = table.clone();
        for txn in txns {
            if candidate.data.contains_key(&txn.id) {
                return Err(TallyError::Duplicate {
                    entity_type: "Transaction",
                    identifier: txn.id.to_string(),
                });
            }
            candidate.insert(txn);
        }

        write_json_atomic(&self.path, &candidate.to_data())?;
        *table = candidate;
        Ok(())
    }

    /// Delete and persist; returns the removed transaction, if it existed
    pub fn delete(&self, id: TransactionId) -> Result<Option<Transaction>, TallyError> {
        let mut table = self.write()?;
        let mut candidate = table.clone();
        let Some(removed) = candidate.remove(id) else {
            return Ok(None);
        };

        write_json_atomic(&self.path, &candidate.to_data())?;
        *table = candidate;
        Ok(Some(removed))
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, TallyError> {
        Ok(self.read()?.data.len())
    }
}
