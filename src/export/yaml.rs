//! YAML export
//!
//! Writes the ledger read model to YAML for human-readable backup.

use std::io::Write;

use crate::error::{TallyError, TallyResult};
use crate::export::json::LedgerExport;
use crate::storage::Storage;

/// Export the ledger to YAML
pub fn export_ledger_yaml<W: Write>(storage: &Storage, writer: &mut W) -> TallyResult<()> {
    let export = LedgerExport::from_storage(storage)?;
    let export_err = |e: std::io::Error| TallyError::Export(e.to_string());

    writeln!(writer, "# Tally ledger export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer, "# Amounts are in cents.").map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| TallyError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::services::ImportService;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_export() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let source = "title, kind, value, category\nrent, outcome, 500, Housing\nsalary, income, 2000, Job\n";
        ImportService::new(&storage)
            .execute_reader(source.as_bytes())
            .unwrap();

        let mut buffer = Vec::new();
        export_ledger_yaml(&storage, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with("# Tally ledger export"));
        assert!(text.contains("schema_version"));
        assert!(text.contains("title: rent"));
        assert!(text.contains("total: 150000"));
        assert!(text.contains("title: Housing"));
    }
}
