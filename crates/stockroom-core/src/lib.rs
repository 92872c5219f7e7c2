// Inventory domain: records, status rules, queries, storage and export
pub mod collection;
pub mod config;
pub mod demo;
pub mod display;
pub mod error;
pub mod export;
pub mod inventory;
pub mod models;
pub mod notify;
pub mod query;
pub mod status;
pub mod store;

pub use collection::InventoryCollection;
pub use config::Config;
pub use error::Error;
pub use export::{ExportFormat, ExportReport, Exporter};
pub use inventory::{Inventory, Snapshot};
pub use models::{Entry, InventoryRecord, RecordDraft, RecordId};
pub use notify::{Notice, NoticeCategory, Severity};
pub use query::{Dashboard, Query, Row, StatusFilter};
pub use status::{classify, Status, Thresholds};
pub use store::{FileStorage, MemoryStorage, PreviewStorage, Storage};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
