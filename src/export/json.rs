//! JSON export
//!
//! Writes the ledger read model with schema versioning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{TallyError, TallyResult};
use crate::models::{Category, LedgerSnapshot};
use crate::services::TransactionService;
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Ledger export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Transactions and balance
    #[serde(flatten)]
    pub ledger: LedgerSnapshot,

    /// All categories, including ones with no transactions
    pub categories: Vec<Category>,
}

impl LedgerExport {
    /// Build an export from the current contents of storage
    pub fn from_storage(storage: &Storage) -> TallyResult<Self> {
        let ledger = TransactionService::new(storage).snapshot()?;
        let categories = storage.categories.get_all()?;

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            ledger,
            categories,
        })
    }
}

/// Export the ledger to JSON
pub fn export_ledger_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> TallyResult<()> {
    let export = LedgerExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| TallyError::Export(e.to_string()))?;

    Ok(())
}
