// Search, status filtering and dashboard counters over the collection
use crate::collection::InventoryCollection;
use crate::models::{Entry, InventoryRecord, RecordId};
use crate::status::{Status, Thresholds};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which statuses a view should show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    /// Every choice in menu order, "all" first
    pub fn options() -> Vec<StatusFilter> {
        std::iter::once(StatusFilter::All)
            .chain(Status::all().into_iter().map(StatusFilter::Only))
            .collect()
    }

    pub fn key(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.key(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(status) => status.label(),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        if key.trim().eq_ignore_ascii_case("all") {
            Some(StatusFilter::All)
        } else {
            Status::from_key(key).map(StatusFilter::Only)
        }
    }

    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    /// Next option, wrapping around
    pub fn cycle(&self) -> Self {
        let options = Self::options();
        let current = options.iter().position(|o| o == self).unwrap_or(0);
        options[(current + 1) % options.len()]
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| {
            let keys: Vec<_> = Self::options().iter().map(|o| o.key()).collect();
            format!("unknown status '{}', expected one of: {}", s, keys.join(", "))
        })
    }
}

/// Free-text search plus status filter, combined with AND
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub text: String,
    pub status: StatusFilter,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }
}

/// One visible table row with its derived columns
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    pub id: RecordId,
    pub record: &'a InventoryRecord,
    pub status: Status,
    pub profit: f64,
}

/// Dashboard counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total: usize,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub expired_count: usize,
    pub total_profit: f64,
}

/// Case-insensitive substring match on the name
pub fn name_matches(record: &InventoryRecord, text: &str) -> bool {
    record.name.to_lowercase().contains(&text.to_lowercase())
}

pub fn search<'a>(collection: &'a InventoryCollection, text: &str) -> Vec<&'a Entry> {
    collection
        .entries()
        .iter()
        .filter(|e| name_matches(&e.record, text))
        .collect()
}

pub fn filter<'a>(
    collection: &'a InventoryCollection,
    status: StatusFilter,
    thresholds: &Thresholds,
    now: DateTime<Utc>,
) -> Vec<&'a Entry> {
    collection
        .entries()
        .iter()
        .filter(|e| status.matches(thresholds.classify(&e.record, now)))
        .collect()
}

/// Rows matching both the text and the status filter, in storage order
pub fn view<'a>(
    collection: &'a InventoryCollection,
    query: &Query,
    thresholds: &Thresholds,
    now: DateTime<Utc>,
) -> Vec<Row<'a>> {
    collection
        .entries()
        .iter()
        .filter(|e| name_matches(&e.record, &query.text))
        .map(|e| Row {
            id: e.id,
            record: &e.record,
            status: thresholds.classify(&e.record, now),
            profit: e.record.profit(),
        })
        .filter(|row| query.status.matches(row.status))
        .collect()
}

/// Counters use raw quantity and date checks rather than the classifier,
/// so an expired item that is also low on stock shows up in both.
pub fn aggregate(
    collection: &InventoryCollection,
    thresholds: &Thresholds,
    now: DateTime<Utc>,
) -> Dashboard {
    collection
        .records()
        .fold(Dashboard::default(), |mut dash, record| {
            dash.total += 1;
            if thresholds.is_low_stock(record) {
                dash.low_stock_count += 1;
            }
            if record.quantity == 0 {
                dash.out_of_stock_count += 1;
            }
            if thresholds.is_expired(record, now) {
                dash.expired_count += 1;
            }
            dash.total_profit += record.profit();
            dash
        })
}
