// The inventory controller: owns the collection and its storage backend
use crate::collection::InventoryCollection;
use crate::export::ExportReport;
use crate::models::{InventoryRecord, RecordDraft, RecordId};
use crate::notify::{self, Notice};
use crate::query::{self, Dashboard, Query, Row};
use crate::status::Thresholds;
use crate::store::Storage;
use crate::{demo, Error, Result};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Everything the screen needs after a change, recomputed from scratch
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub dashboard: Dashboard,
    pub notices: Vec<Notice>,
}

pub struct Inventory {
    collection: InventoryCollection,
    storage: Box<dyn Storage>,
    thresholds: Thresholds,
}

impl Inventory {
    /// Load the persisted inventory. Corrupt data is logged and replaced
    /// with an empty inventory rather than failing startup.
    pub fn open(storage: Box<dyn Storage>, thresholds: Thresholds) -> Self {
        let records = load_or_empty(storage.as_ref());
        tracing::info!(
            "Loaded {} records from {}",
            records.len(),
            storage.describe()
        );

        Self {
            collection: InventoryCollection::from_records(records),
            storage,
            thresholds,
        }
    }

    pub fn collection(&self) -> &InventoryCollection {
        &self.collection
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn is_read_only(&self) -> bool {
        self.storage.is_read_only()
    }

    pub fn get(&self, id: RecordId) -> Option<&InventoryRecord> {
        self.collection.get(id)
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// Validate a form and append it. Invalid input leaves everything as is.
    pub fn add(&mut self, draft: &RecordDraft, now: DateTime<Utc>) -> Result<(RecordId, Snapshot)> {
        let record = draft.validate()?;
        let name = record.name.clone();

        let id = self.collection.push(record);
        if let Err(e) = self.persist() {
            self.collection.remove(id);
            return Err(e);
        }

        tracing::info!("Added {} as #{}", name, id);
        Ok((id, self.snapshot(now)))
    }

    /// Replace a record wholesale.
    ///
    /// Unlike `add`, the name is not checked here; an empty name is stored
    /// as given. Unknown ids return `Ok(None)` and write nothing.
    pub fn update(
        &mut self,
        id: RecordId,
        record: InventoryRecord,
        now: DateTime<Utc>,
    ) -> Result<Option<Snapshot>> {
        let Some(previous) = self.collection.replace(id, record) else {
            tracing::debug!("Update for unknown record #{} ignored", id);
            return Ok(None);
        };

        if let Err(e) = self.persist() {
            self.collection.replace(id, previous);
            return Err(e);
        }

        tracing::info!("Updated #{}", id);
        Ok(Some(self.snapshot(now)))
    }

    /// Remove a record. Unknown ids return `Ok(None)` and write nothing.
    pub fn delete(&mut self, id: RecordId, now: DateTime<Utc>) -> Result<Option<Snapshot>> {
        let Some(position) = self.collection.position(id) else {
            tracing::debug!("Delete for unknown record #{} ignored", id);
            return Ok(None);
        };
        let before = self.collection.clone();
        let removed = self.collection.remove(id);

        if let Err(e) = self.persist() {
            self.collection = before;
            return Err(e);
        }

        if let Some(record) = removed {
            tracing::info!("Deleted {} (#{}, row {})", record.name, id, position + 1);
        }
        Ok(Some(self.snapshot(now)))
    }

    /// Matching rows in storage order
    pub fn view(&self, query: &Query, now: DateTime<Utc>) -> Vec<Row<'_>> {
        query::view(&self.collection, query, &self.thresholds, now)
    }

    pub fn dashboard(&self, now: DateTime<Utc>) -> Dashboard {
        query::aggregate(&self.collection, &self.thresholds, now)
    }

    pub fn notices(&self, now: DateTime<Utc>) -> Vec<Notice> {
        notify::scan(&self.collection, &self.thresholds, now)
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> Snapshot {
        Snapshot {
            dashboard: self.dashboard(now),
            notices: self.notices(now),
        }
    }

    /// Write the spreadsheet and CSV outputs for the current records
    pub fn export(&self) -> Result<ExportReport> {
        self.storage
            .export(&self.collection.to_records())
            .map_err(|e| {
                tracing::error!("Export failed: {}", e);
                e
            })
    }

    /// Write the current records to one file, format picked from its extension.
    /// Returns the number of rows written.
    pub fn export_to(&self, path: &Path) -> Result<usize> {
        let records = self.collection.to_records();
        self.storage.export_to(&records, path).map_err(|e| {
            tracing::error!("Export to {} failed: {}", path.display(), e);
            e
        })?;

        tracing::info!("Exported {} rows to {}", records.len(), path.display());
        Ok(records.len())
    }

    /// Overwrite the inventory with the demo dataset, export it, and reload.
    /// On failure the in-memory records stay as they were.
    pub fn seed_demo(&mut self, now: DateTime<Utc>) -> Result<Snapshot> {
        if self.storage.is_read_only() {
            return Err(Error::Unsupported(
                "Generator is available only in the full app".to_string(),
            ));
        }

        let records = demo::generate();
        let seeded = self
            .storage
            .save(&records)
            .and_then(|_| self.storage.export(&records))
            .and_then(|_| self.storage.load());

        match seeded {
            Ok(loaded) => {
                tracing::info!("Generated {} demo records", loaded.len());
                self.collection = InventoryCollection::from_records(loaded);
                Ok(self.snapshot(now))
            }
            Err(e) => {
                tracing::error!("Failed to generate demo data: {}", e);
                Err(e)
            }
        }
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(&self.collection.to_records())
    }
}

fn load_or_empty(storage: &dyn Storage) -> Vec<InventoryRecord> {
    match storage.load() {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(
                "Failed to load inventory from {}: {}; starting empty",
                storage.describe(),
                e
            );
            Vec::new()
        }
    }
}
