//! CLI command for ledger export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::ValueEnum;

use crate::error::{TallyError, TallyResult};
use crate::export::{export_ledger_json, export_ledger_yaml};
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ExportFormat {
    /// JSON format
    #[default]
    Json,
    /// YAML format (human-readable)
    Yaml,
}

/// Handle the export command, writing to `output` or stdout
pub fn handle_export_command(
    storage: &Storage,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> TallyResult<()> {
    match output {
        Some(path) => {
            let file = File::create(&path).map_err(|e| {
                TallyError::Export(format!("Failed to create {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write_export(storage, format, &mut writer)?;
            writer
                .flush()
                .map_err(|e| TallyError::Export(e.to_string()))?;
            println!("Exported ledger to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_export(storage, format, &mut writer)?;
            writeln!(writer).map_err(|e| TallyError::Export(e.to_string()))?;
        }
    }

    Ok(())
}

fn write_export<W: Write>(storage: &Storage, format: ExportFormat, writer: &mut W) -> TallyResult<()> {
    match format {
        ExportFormat::Json => export_ledger_json(storage, writer, true),
        ExportFormat::Yaml => export_ledger_yaml(storage, writer),
    }
}
