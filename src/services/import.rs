//! Bulk import service
//!
//! Imports a batch of transactions from comma-separated text. The whole
//! source is parsed before anything is written; categories for every row are
//! then resolved in a single pass and the transactions are persisted as one
//! unit, so a bad line or a failed write leaves no part of the batch behind.
//!
//! Fields are separated by a comma followed by a space, so a bare comma
//! stays part of its field ("Coffee,tea"). Expected layout, header row first:
//!
//! ```text
//! title, kind, value, category
//! rent, outcome, 500, Housing
//! salary, income, 2000, Job
//! ```

use std::cell::Cell;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{TallyError, TallyResult};
use crate::models::{Money, Transaction, TransactionKind};
use crate::storage::Storage;

use super::balance::BalanceService;
use super::category::CategoryService;

/// Number of fields every data line carries
const FIELDS_PER_LINE: usize = 4;

/// Where an import currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPhase {
    Idle,
    Reading,
    Parsing,
    ResolvingCategories,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Reading => "reading",
            Self::Parsing => "parsing",
            Self::ResolvingCategories => "resolving categories",
            Self::Persisting => "persisting",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// One data line of the source, validated but not yet stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    /// 1-based line number in the source, header included
    pub line: u64,
    pub title: String,
    pub kind: TransactionKind,
    pub value: Money,
    pub category: String,
}

impl ParsedRecord {
    fn from_fields(fields: &[String], line: u64) -> TallyResult<Self> {
        if fields.len() != FIELDS_PER_LINE {
            return Err(TallyError::import_parse(
                line,
                format!(
                    "expected {} fields (title, kind, value, category), found {}",
                    FIELDS_PER_LINE,
                    fields.len()
                ),
            ));
        }

        let title = &fields[0];
        if title.is_empty() {
            return Err(TallyError::import_parse(line, "title is empty"));
        }

        let kind: TransactionKind = fields[1]
            .parse()
            .map_err(|e| TallyError::import_parse(line, format!("{}", e)))?;

        let value = Money::parse(&fields[2])
            .map_err(|e| TallyError::import_parse(line, format!("{}", e)))?;
        if value.is_negative() {
            return Err(TallyError::import_parse(
                line,
                format!("value cannot be negative: '{}'", fields[2]),
            ));
        }

        let category = &fields[3];
        if category.is_empty() {
            return Err(TallyError::import_parse(line, "category is empty"));
        }

        Ok(Self {
            line,
            title: title.clone(),
            kind,
            value,
            category: category.clone(),
        })
    }
}

/// Split a raw comma-delimited record into ", "-separated fields
///
/// The reader splits on every comma; a piece that does not start with a
/// space was cut at a bare comma and is glued back onto the field before it.
fn split_fields(record: &StringRecord) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for (i, raw) in record.iter().enumerate() {
        match raw.strip_prefix(' ') {
            Some(rest) if i > 0 => fields.push(rest.to_string()),
            _ => match fields.last_mut() {
                Some(last) => {
                    last.push(',');
                    last.push_str(raw);
                }
                None => fields.push(raw.to_string()),
            },
        }
    }

    fields.iter().map(|f| f.trim().to_string()).collect()
}

/// A source file that must be deleted once it has been read
///
/// `release` deletes it explicitly; if an early return skips that, the file
/// is deleted on drop instead. Either way it is removed at most once.
struct SourceFile {
    path: PathBuf,
    released: bool,
}

impl SourceFile {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            released: false,
        }
    }

    fn release(&mut self) -> io::Result<()> {
        self.released = true;
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl Drop for SourceFile {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.release() {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove import source");
            }
        }
    }
}

/// Service for bulk import
pub struct ImportService<'a> {
    storage: &'a Storage,
    phase: Cell<ImportPhase>,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            phase: Cell::new(ImportPhase::Idle),
        }
    }

    /// Phase reached by the most recent import
    pub fn phase(&self) -> ImportPhase {
        self.phase.get()
    }

    fn set_phase(&self, phase: ImportPhase) {
        tracing::debug!(from = %self.phase.get(), to = %phase, "import phase");
        self.phase.set(phase);
    }

    fn finish<T>(&self, result: TallyResult<T>) -> TallyResult<T> {
        match &result {
            Ok(_) => self.set_phase(ImportPhase::Done),
            Err(e) => {
                tracing::warn!(phase = %self.phase.get(), error = %e, "import failed");
                self.set_phase(ImportPhase::Failed);
            }
        }
        result
    }

    /// Import every line of `reader`
    ///
    /// Returns the stored transactions in input order.
    pub fn execute_reader<R: Read>(&self, reader: R) -> TallyResult<Vec<Transaction>> {
        self.set_phase(ImportPhase::Reading);
        let result = self.parse(reader).and_then(|records| self.commit(records));
        self.finish(result)
    }

    /// Import from a temporary source file, deleting it afterwards
    ///
    /// The file is removed once it has been read and closed, whether parsing
    /// succeeded or not. A parse error takes precedence over a failure to
    /// remove the file.
    pub fn execute_file(&self, path: &Path) -> TallyResult<Vec<Transaction>> {
        let mut source = SourceFile::new(path);
        self.set_phase(ImportPhase::Reading);

        let parsed = File::open(path)
            .map_err(|e| TallyError::Io(format!("Failed to open {}: {}", path.display(), e)))
            .and_then(|file| self.parse(file));

        let result = match (parsed, source.release()) {
            (Ok(records), Ok(())) => self.commit(records),
            (Ok(_), Err(e)) => Err(TallyError::Io(format!(
                "Failed to remove import source {}: {}",
                path.display(),
                e
            ))),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(e)) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove import source");
                Err(err)
            }
        };

        self.finish(result)
    }

    /// Parse the whole source; the reader is consumed and dropped on return
    fn parse<R: Read>(&self, reader: R) -> TallyResult<Vec<ParsedRecord>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b',')
            .trim(Trim::None)
            .quoting(false)
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        self.set_phase(ImportPhase::Parsing);

        let mut records = Vec::new();
        let mut last_line = 1;
        for result in reader.records() {
            let record = result.map_err(|e| {
                let line = e.position().map(|p| p.line()).unwrap_or(last_line + 1);
                TallyError::import_parse(line, format!("unreadable line: {}", e))
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(last_line + 1);
            last_line = line;

            let fields = split_fields(&record);

            // Whitespace-only lines
            if fields.len() == 1 && fields[0].is_empty() {
                continue;
            }

            records.push(ParsedRecord::from_fields(&fields, line)?);
        }

        tracing::debug!(records = records.len(), "import source parsed");
        Ok(records)
    }

    fn commit(&self, records: Vec<ParsedRecord>) -> TallyResult<Vec<Transaction>> {
        if records.is_empty() {
            tracing::info!("import source had no data lines");
            return Ok(Vec::new());
        }

        let mut projected = BalanceService::new(&self.storage.transactions).get_balance()?;
        for record in &records {
            projected = projected
                .checked_record(record.kind, record.value)
                .ok_or_else(|| {
                    TallyError::import_parse(
                        record.line,
                        "value would push the ledger totals out of range",
                    )
                })?;
        }

        self.set_phase(ImportPhase::ResolvingCategories);
        let categories = CategoryService::from_storage(self.storage)
            .resolve_or_create(records.iter().map(|r| r.category.as_str()))?;

        self.set_phase(ImportPhase::Persisting);
        let transactions = records
            .into_iter()
            .map(|r| -> TallyResult<Transaction> {
                let category = categories
                    .get(&r.category)
                    .ok_or_else(|| TallyError::category_not_found(r.category.as_str()))?;
                Ok(Transaction::new(r.title, r.value, r.kind, category.id))
            })
            .collect::<TallyResult<Vec<_>>>()?;

        self.storage.transactions.insert_batch(transactions.clone())?;

        tracing::info!(
            transactions = transactions.len(),
            categories = categories.len(),
            "import persisted"
        );
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::storage::file_io::temp_path_for;
    use tempfile::TempDir;

    const HEADER: &str = "title, kind, value, category\n";

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn source(lines: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    fn write_source(dir: &TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("upload.csv");
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_import_rent_and_salary() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let text = source(&["rent, outcome, 500, Housing", "salary, income, 2000, Job"]);
        let imported = service.execute_reader(text.as_bytes()).unwrap();

        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].title, "rent");
        assert_eq!(imported[1].title, "salary");
        assert_eq!(storage.categories.count().unwrap(), 2);

        let balance = BalanceService::new(&storage.transactions).get_balance().unwrap();
        assert_eq!(balance.income.cents(), 200000);
        assert_eq!(balance.outcome.cents(), 50000);
        assert_eq!(balance.total.cents(), 150000);
        assert_eq!(service.phase(), ImportPhase::Done);
    }

    #[test]
    fn test_header_only_source() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let imported = service.execute_reader(HEADER.as_bytes()).unwrap();

        assert!(imported.is_empty());
        assert_eq!(storage.categories.count().unwrap(), 0);
        assert!(!storage.paths().transactions_file().exists());
        assert!(!storage.paths().categories_file().exists());
    }

    #[test]
    fn test_repeated_categories_created_once() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let text = source(&[
            "lunch, outcome, 12.50, Food",
            "dinner, outcome, 30, Food",
            "bus, outcome, 2.75, Transport",
        ]);
        let imported = service.execute_reader(text.as_bytes()).unwrap();

        assert_eq!(storage.categories.count().unwrap(), 2);
        assert_eq!(imported[0].category_id, imported[1].category_id);
        assert_ne!(imported[0].category_id, imported[2].category_id);
    }

    #[test]
    fn test_existing_category_reused() {
        let (_temp_dir, storage) = create_test_storage();
        let food = CategoryService::from_storage(&storage)
            .resolve_one("Food")
            .unwrap();
        let service = ImportService::new(&storage);

        let text = source(&[
            "lunch, outcome, 12.50, Food",
            "dinner, outcome, 30, Food",
            "bus, outcome, 2.75, Transport",
        ]);
        let imported = service.execute_reader(text.as_bytes()).unwrap();

        assert_eq!(storage.categories.count().unwrap(), 2);
        assert_eq!(imported[0].category_id, food.id);
        assert!(storage.categories.get_by_title("Transport").unwrap().is_some());
    }

    #[test]
    fn test_no_balance_check_on_import() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let text = source(&["car, outcome, 9000, Vehicles"]);
        service.execute_reader(text.as_bytes()).unwrap();

        let balance = BalanceService::new(&storage.transactions).get_balance().unwrap();
        assert_eq!(balance.total.cents(), -900000);
    }

    #[test]
    fn test_malformed_row_persists_nothing() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let text = source(&[
            "rent, outcome, 500, Housing",
            "salary, income, lots, Job",
            "gift, income, 50, Gifts",
        ]);
        let err = service.execute_reader(text.as_bytes()).unwrap_err();

        match err {
            TallyError::ImportParse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(storage.transactions.count().unwrap(), 0);
        assert_eq!(storage.categories.count().unwrap(), 0);
        assert_eq!(service.phase(), ImportPhase::Failed);
    }

    #[test]
    fn test_rejected_lines() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let bad_lines = [
            "rent, outcome, 500",
            "rent, outcome, 500, Housing, extra",
            "rent, transfer, 500, Housing",
            "rent, outcome, -500, Housing",
            "rent, outcome, 5.001, Housing",
            ", outcome, 500, Housing",
            "rent, outcome, 500, ",
        ];
        for line in bad_lines {
            let text = source(&[line]);
            let err = service.execute_reader(text.as_bytes()).unwrap_err();
            assert!(err.is_import_parse(), "accepted: {}", line);
        }
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_kind_must_be_lowercase() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        for line in ["x, INCOME, 5, Food", "x, Outcome, 5, Food"] {
            let text = source(&[line]);
            let err = service.execute_reader(text.as_bytes()).unwrap_err();
            assert!(
                matches!(err, TallyError::ImportParse { line: 2, .. }),
                "accepted: {}",
                line
            );
        }
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_blank_lines_and_padding() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let text = format!(
            "{}salary, income, 100, Job\n\n   \nrent ,  outcome , 40.5,   Housing \n",
            HEADER
        );
        let imported = service.execute_reader(text.as_bytes()).unwrap();

        assert_eq!(imported.len(), 2);
        assert_eq!(imported[1].kind, TransactionKind::Outcome);
        assert_eq!(imported[1].value.cents(), 4050);
        assert_eq!(imported[1].title, "rent");
    }

    #[test]
    fn test_bare_comma_stays_in_field() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let text = source(&["Coffee,tea, outcome, 5, Food,Drink"]);
        let imported = service.execute_reader(text.as_bytes()).unwrap();

        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].title, "Coffee,tea");
        assert!(storage.categories.get_by_title("Food,Drink").unwrap().is_some());
    }

    #[test]
    fn test_fields_need_comma_and_space() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let text = source(&["salary,income,100,Job"]);
        let err = service.execute_reader(text.as_bytes()).unwrap_err();
        assert!(matches!(err, TallyError::ImportParse { line: 2, .. }));
    }

    #[test]
    fn test_overflowing_batch_persists_nothing() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let text = source(&[
            "a, income, 92233720368547758, Big",
            "b, income, 92233720368547758, Big",
        ]);
        let err = service.execute_reader(text.as_bytes()).unwrap_err();

        assert!(matches!(err, TallyError::ImportParse { line: 3, .. }));
        assert_eq!(storage.transactions.count().unwrap(), 0);
        assert_eq!(storage.categories.count().unwrap(), 0);
        assert!(BalanceService::new(&storage.transactions)
            .get_balance()
            .unwrap()
            .total
            .is_zero());
    }

    #[test]
    fn test_source_file_removed_after_success() {
        let (temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        let path = write_source(&temp_dir, &source(&["salary, income, 2000, Job"]));

        let imported = service.execute_file(&path).unwrap();

        assert_eq!(imported.len(), 1);
        assert!(!path.exists());
    }

    #[test]
    fn test_source_file_removed_after_failure() {
        let (temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        let path = write_source(&temp_dir, &source(&["salary, income"]));

        let err = service.execute_file(&path).unwrap_err();

        assert!(err.is_import_parse());
        assert!(!path.exists());
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_missing_source_file() {
        let (temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let err = service
            .execute_file(&temp_dir.path().join("missing.csv"))
            .unwrap_err();
        assert!(matches!(err, TallyError::Io(_)));
        assert_eq!(service.phase(), ImportPhase::Failed);
    }

    #[test]
    fn test_storage_failure_persists_no_transaction() {
        let (temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        let path = write_source(
            &temp_dir,
            &source(&["rent, outcome, 500, Housing", "salary, income, 2000, Job"]),
        );

        fs::create_dir(temp_path_for(&storage.paths().transactions_file())).unwrap();

        let err = service.execute_file(&path).unwrap_err();
        assert!(matches!(err, TallyError::Storage(_)));
        assert_eq!(storage.transactions.count().unwrap(), 0);
        assert!(!storage.paths().transactions_file().exists());
        assert!(!path.exists());
        assert_eq!(service.phase(), ImportPhase::Failed);
    }

    #[test]
    fn test_phase_starts_idle() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);
        assert_eq!(service.phase(), ImportPhase::Idle);
    }

    #[test]
    fn test_source_guard_removes_on_drop() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_source(&temp_dir, HEADER);

        {
            let _guard = SourceFile::new(&path);
        }
        assert!(!path.exists());
    }
}
