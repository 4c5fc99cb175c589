//! Storage initialization
//!
//! Handles first-run setup: directories plus empty data files, so a fresh
//! ledger is distinguishable from a missing one.

use crate::config::paths::TallyPaths;
use crate::error::TallyError;

use super::Storage;

/// Initialize storage for a fresh installation
///
/// Existing data files are left untouched.
pub fn initialize_storage(paths: &TallyPaths) -> Result<(), TallyError> {
    paths.ensure_directories()?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    if !paths.transactions_file().exists() {
        storage.transactions.save()?;
    }
    if !paths.categories_file().exists() {
        storage.categories.save()?;
    }

    tracing::info!(data_dir = %paths.data_dir().display(), "storage initialized");
    Ok(())
}
