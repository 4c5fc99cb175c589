//! CLI command handler for bulk import

use std::fs::File;
use std::path::Path;

use crate::config::Settings;
use crate::display::format_balance;
use crate::error::{TallyError, TallyResult};
use crate::services::{ImportService, TransactionService};
use crate::storage::Storage;

/// Handle the import command
///
/// With `remove_source` the file is treated as a spooled upload and deleted
/// once it has been read, whether or not the import succeeds.
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    file: &Path,
    remove_source: bool,
) -> TallyResult<()> {
    let service = ImportService::new(storage);

    let imported = if remove_source {
        service.execute_file(file)?
    } else {
        let reader = File::open(file).map_err(|e| {
            TallyError::Io(format!("Failed to open {}: {}", file.display(), e))
        })?;
        service.execute_reader(reader)?
    };

    if imported.is_empty() {
        println!("No transactions found in {}.", file.display());
        return Ok(());
    }

    println!("Imported {} transaction(s).", imported.len());
    println!();
    let balance = TransactionService::new(storage).get_balance()?;
    print!("{}", format_balance(&balance, settings));

    Ok(())
}
