use crate::models::InventoryRecord;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Derived urgency of a record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Good,
    LowStock,
    OutOfStock,
    NearExpiry,
    Expired,
}

impl Status {
    pub fn all() -> [Status; 5] {
        [
            Status::Good,
            Status::LowStock,
            Status::OutOfStock,
            Status::NearExpiry,
            Status::Expired,
        ]
    }

    /// Filter key, also used as a CSS-ish class name
    pub fn key(&self) -> &'static str {
        match self {
            Status::Good => "good",
            Status::LowStock => "low-stock",
            Status::OutOfStock => "out-of-stock",
            Status::NearExpiry => "near-expiry",
            Status::Expired => "expired",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Status::all()
            .into_iter()
            .find(|s| s.key() == key.trim().to_lowercase())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Good => "Good",
            Status::LowStock => "Low Stock",
            Status::OutOfStock => "Out of Stock",
            Status::NearExpiry => "Near Expiry",
            Status::Expired => "Expired",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Cut-off points shared by the classifier, the dashboard and the warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Days of lookahead before an expiry date counts as "near"
    #[serde(default = "default_near_expiry_days")]
    pub near_expiry_days: i64,
    /// Quantities strictly below this (and above zero) are low stock
    #[serde(default = "default_low_stock_below")]
    pub low_stock_below: u32,
}

fn default_near_expiry_days() -> i64 {
    7
}

fn default_low_stock_below() -> u32 {
    5
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            near_expiry_days: default_near_expiry_days(),
            low_stock_below: default_low_stock_below(),
        }
    }
}

impl Thresholds {
    /// Stock status first looks at expiry, then lets stock level override it.
    /// An empty shelf is out of stock no matter how fresh the product is.
    pub fn classify(&self, record: &InventoryRecord, now: DateTime<Utc>) -> Status {
        let mut status = Status::Good;

        if let Some(expiry) = record.expiry {
            let until = expires_at(expiry) - now;
            if until < Duration::zero() {
                status = Status::Expired;
            } else if until <= Duration::days(self.near_expiry_days) {
                status = Status::NearExpiry;
            }
        }

        if record.quantity == 0 {
            status = Status::OutOfStock;
        } else if self.is_low_stock(record) {
            status = Status::LowStock;
        }

        status
    }

    pub fn is_low_stock(&self, record: &InventoryRecord) -> bool {
        record.quantity > 0 && record.quantity < self.low_stock_below
    }

    /// Raw date check, independent of the near-expiry window
    pub fn is_expired(&self, record: &InventoryRecord, now: DateTime<Utc>) -> bool {
        record.expiry.is_some_and(|d| expires_at(d) < now)
    }

    /// True when the expiry lies within the lookahead window but hasn't passed
    pub fn is_near_expiry(&self, record: &InventoryRecord, now: DateTime<Utc>) -> bool {
        record.expiry.is_some_and(|d| {
            let until = expires_at(d) - now;
            until >= Duration::zero() && until <= Duration::days(self.near_expiry_days)
        })
    }
}

/// Classify with the stock thresholds (7-day window, fewer than 5 units)
pub fn classify(record: &InventoryRecord, now: DateTime<Utc>) -> Status {
    Thresholds::default().classify(record, now)
}

/// A bare date expires at midnight UTC at the start of that day
pub fn expires_at(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::default()).and_utc()
}
