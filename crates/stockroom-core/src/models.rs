use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One product's inventory entry, exactly as it is persisted
///
/// Field order matters: exports use it for column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub name: String,
    pub quantity: u32,
    pub buy_price: f64,
    pub sell_price: f64,
    /// `None` means the product does not expire
    #[serde(default, with = "expiry_format")]
    pub expiry: Option<NaiveDate>,
}

impl InventoryRecord {
    pub fn new(
        name: impl Into<String>,
        quantity: u32,
        buy_price: f64,
        sell_price: f64,
        expiry: Option<NaiveDate>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity,
            buy_price,
            sell_price,
            expiry,
        }
    }

    /// Margin on everything currently in stock. Can be negative.
    pub fn profit(&self) -> f64 {
        (self.sell_price - self.buy_price) * f64::from(self.quantity)
    }

    /// Expiry as stored on disk: `YYYY-MM-DD`, or empty
    pub fn expiry_text(&self) -> String {
        self.expiry
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

/// Session-local handle for a record
///
/// Assigned when a record enters the collection and never reused, so a
/// filtered or re-sorted view can't point an edit at the wrong row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub(crate) u64);

impl RecordId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(RecordId)
    }
}

/// A record plus its handle
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: RecordId,
    pub record: InventoryRecord,
}

/// Raw form input for a record, before any parsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub name: String,
    pub quantity: String,
    pub buy_price: String,
    pub sell_price: String,
    pub expiry: String,
}

impl RecordDraft {
    /// Prefill a form from an existing record
    pub fn from_record(record: &InventoryRecord) -> Self {
        Self {
            name: record.name.clone(),
            quantity: record.quantity.to_string(),
            buy_price: record.buy_price.to_string(),
            sell_price: record.sell_price.to_string(),
            expiry: record.expiry_text(),
        }
    }

    /// Full validation used when adding a product
    pub fn validate(&self) -> Result<InventoryRecord> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "must not be empty"));
        }
        self.to_record()
    }

    /// Parse the fields into a typed record without checking the name
    pub fn to_record(&self) -> Result<InventoryRecord> {
        let quantity = self
            .quantity
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::validation("quantity", "must be a whole number of units"))?;
        let buy_price = parse_price("buyPrice", &self.buy_price)?;
        let sell_price = parse_price("sellPrice", &self.sell_price)?;

        let expiry = match self.expiry.trim() {
            "" => None,
            text => Some(
                parse_date(text)
                    .ok_or_else(|| Error::validation("expiry", "must be a YYYY-MM-DD date"))?,
            ),
        };

        Ok(InventoryRecord {
            name: self.name.trim().to_string(),
            quantity,
            buy_price,
            sell_price,
            expiry,
        })
    }
}

fn parse_price(field: &'static str, text: &str) -> Result<f64> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::validation(field, "must be a number")),
    }
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepts `YYYY-MM-DD` and full RFC 3339 timestamps
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.date_naive())
    })
}

/// `""`, `null` and a missing key all mean "does not expire"
mod expiry_format {
    use super::{parse_date, DATE_FORMAT};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(expiry: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match expiry {
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(text) = raw.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let parsed = parse_date(text);
        if parsed.is_none() {
            tracing::warn!("Ignoring unreadable expiry date {:?}", text);
        }
        Ok(parsed)
    }
}
