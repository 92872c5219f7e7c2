// Where records live between runs
//
// The app picks one backend at startup instead of asking "can I write?"
// at every call site.
use crate::export::{ExportReport, Exporter};
use crate::{models::InventoryRecord, Error, Result};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Persistence and export capability
pub trait Storage {
    /// Read every record. A missing file is an empty inventory; unreadable
    /// content is `Error::Parse`.
    fn load(&self) -> Result<Vec<InventoryRecord>>;

    /// Replace the persisted inventory with `records`
    fn save(&self, records: &[InventoryRecord]) -> Result<()>;

    /// Produce the spreadsheet and CSV outputs
    fn export(&self, records: &[InventoryRecord]) -> Result<ExportReport>;

    /// Write one file, format picked from its extension
    fn export_to(&self, records: &[InventoryRecord], path: &Path) -> Result<()>;

    fn is_read_only(&self) -> bool {
        false
    }

    /// Human readable location, for logs and the status bar
    fn describe(&self) -> String;
}

/// JSON file on disk plus exports into a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_file: PathBuf,
    export_dir: PathBuf,
}

impl FileStorage {
    pub fn new(data_file: impl Into<PathBuf>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            export_dir: export_dir.into(),
        }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Vec<InventoryRecord>> {
        read_records(&self.data_file)
    }

    fn save(&self, records: &[InventoryRecord]) -> Result<()> {
        if let Some(parent) = self.data_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Whole-buffer overwrite; a crash mid-write can leave a torn file
        let contents = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.data_file, contents)?;

        tracing::debug!(
            "Saved {} records to {}",
            records.len(),
            self.data_file.display()
        );
        Ok(())
    }

    fn export(&self, records: &[InventoryRecord]) -> Result<ExportReport> {
        Exporter::export_all(records, &self.export_dir)
    }

    fn export_to(&self, records: &[InventoryRecord], path: &Path) -> Result<()> {
        Exporter::export_to_file(records, path)
    }

    fn describe(&self) -> String {
        self.data_file.display().to_string()
    }
}

/// Read-only view of an inventory file, for inspecting data without
/// touching it
#[derive(Debug, Clone)]
pub struct PreviewStorage {
    data_file: PathBuf,
}

impl PreviewStorage {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
        }
    }
}

impl Storage for PreviewStorage {
    fn load(&self) -> Result<Vec<InventoryRecord>> {
        read_records(&self.data_file)
    }

    fn save(&self, records: &[InventoryRecord]) -> Result<()> {
        tracing::debug!("Preview mode: not writing {} records", records.len());
        Ok(())
    }

    fn export(&self, _records: &[InventoryRecord]) -> Result<ExportReport> {
        Err(export_unsupported())
    }

    fn export_to(&self, _records: &[InventoryRecord], path: &Path) -> Result<()> {
        tracing::debug!("Preview mode: not writing {}", path.display());
        Err(export_unsupported())
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn describe(&self) -> String {
        format!("{} (read-only)", self.data_file.display())
    }
}

/// In-process storage holding the JSON text, handy for tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    contents: RefCell<Option<String>>,
    last_export: RefCell<Option<String>>,
    saves: RefCell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw file contents, valid or not
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: RefCell::new(Some(contents.into())),
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    /// CSV text of the most recent export
    pub fn last_export(&self) -> Option<String> {
        self.last_export.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Vec<InventoryRecord>> {
        match self.contents.borrow().as_deref() {
            None => Ok(Vec::new()),
            Some(text) => parse_records(text),
        }
    }

    fn save(&self, records: &[InventoryRecord]) -> Result<()> {
        *self.contents.borrow_mut() = Some(serde_json::to_string_pretty(records)?);
        *self.saves.borrow_mut() += 1;
        Ok(())
    }

    fn export(&self, records: &[InventoryRecord]) -> Result<ExportReport> {
        *self.last_export.borrow_mut() = Some(Exporter::to_csv(records));
        Ok(ExportReport {
            files: Vec::new(),
            rows: records.len(),
        })
    }

    fn export_to(&self, records: &[InventoryRecord], _path: &Path) -> Result<()> {
        *self.last_export.borrow_mut() = Some(Exporter::to_csv(records));
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

fn export_unsupported() -> Error {
    Error::Unsupported("CSV/XLSX export is available only in the full app".to_string())
}

fn read_records(path: &Path) -> Result<Vec<InventoryRecord>> {
    if !path.exists() {
        tracing::debug!("{} does not exist yet, starting empty", path.display());
        return Ok(Vec::new());
    }

    let contents = std::fs::read_to_string(path)?;
    parse_records(&contents)
}

fn parse_records(contents: &str) -> Result<Vec<InventoryRecord>> {
    serde_json::from_str(contents).map_err(|e| Error::Parse(e.to_string()))
}
