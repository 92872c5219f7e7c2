// Expiry and stock warnings, one batched message per category
use crate::collection::InventoryCollection;
use crate::display::format_date;
use crate::status::Thresholds;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What a warning is about. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoticeCategory {
    Expired,
    NearExpiry,
    LowStock,
    OutOfStock,
}

impl NoticeCategory {
    pub fn label(&self) -> &'static str {
        match self {
            NoticeCategory::Expired => "Expired",
            NoticeCategory::NearExpiry => "Near Expiry",
            NoticeCategory::LowStock => "Low Stock",
            NoticeCategory::OutOfStock => "Out of Stock",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            NoticeCategory::Expired => Severity::Error,
            NoticeCategory::NearExpiry => Severity::Warning,
            NoticeCategory::LowStock | NoticeCategory::OutOfStock => Severity::Info,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            NoticeCategory::Expired => "❌",
            NoticeCategory::NearExpiry => "⏳",
            NoticeCategory::LowStock => "📉",
            NoticeCategory::OutOfStock => "📦",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One toast-sized warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub category: NoticeCategory,
    pub severity: Severity,
    pub message: String,
}

/// Scan every record and batch names per category.
///
/// Stock and expiry are judged separately, so one record can land in a
/// stock bucket and an expiry bucket at once. Nothing is remembered between
/// scans; calling this twice yields the same notices twice.
pub fn scan(
    collection: &InventoryCollection,
    thresholds: &Thresholds,
    now: DateTime<Utc>,
) -> Vec<Notice> {
    let mut expired = Vec::new();
    let mut near_expiry = Vec::new();
    let mut low_stock = Vec::new();
    let mut out_of_stock = Vec::new();

    for record in collection.records() {
        if record.quantity == 0 {
            out_of_stock.push(record.name.clone());
        } else if thresholds.is_low_stock(record) {
            low_stock.push(record.name.clone());
        }

        if thresholds.is_expired(record, now) {
            expired.push(format!(
                "{} (expired on {})",
                record.name,
                format_date(record.expiry)
            ));
        } else if thresholds.is_near_expiry(record, now) {
            near_expiry.push(format!(
                "{} (expires on {})",
                record.name,
                format_date(record.expiry)
            ));
        }
    }

    [
        (NoticeCategory::Expired, expired),
        (NoticeCategory::NearExpiry, near_expiry),
        (NoticeCategory::LowStock, low_stock),
        (NoticeCategory::OutOfStock, out_of_stock),
    ]
    .into_iter()
    .filter(|(_, names)| !names.is_empty())
    .map(|(category, names)| Notice {
        category,
        severity: category.severity(),
        message: format!("{}: {}", category.label(), names.join(", ")),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InventoryRecord;
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 15, 8, 0, 0).unwrap()
    }

    fn rec(name: &str, quantity: u32, expiry: Option<(i32, u32, u32)>) -> InventoryRecord {
        InventoryRecord::new(
            name,
            quantity,
            1.0,
            2.0,
            expiry.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        )
    }

    #[test]
    fn test_nothing_to_report() {
        let collection = InventoryCollection::from_records(vec![rec("Fine", 50, None)]);
        assert!(scan(&collection, &Thresholds::default(), now()).is_empty());
    }

    #[test]
    fn test_batches_in_fixed_order() {
        let collection = InventoryCollection::from_records(vec![
            rec("Pepsi", 0, Some((2025, 10, 20))),
            rec("Sprite", 2, Some((2025, 10, 1))),
            rec("Royal", 9, Some((2025, 10, 1))),
            rec("Fanta", 1, None),
        ]);

        let notices = scan(&collection, &Thresholds::default(), now());
        let categories: Vec<_> = notices.iter().map(|n| n.category).collect();
        assert_eq!(
            categories,
            vec![
                NoticeCategory::Expired,
                NoticeCategory::NearExpiry,
                NoticeCategory::LowStock,
                NoticeCategory::OutOfStock,
            ]
        );

        assert_eq!(
            notices[0].message,
            "Expired: Sprite (expired on 01/10/2025), Royal (expired on 01/10/2025)"
        );
        assert_eq!(notices[1].message, "Near Expiry: Pepsi (expires on 20/10/2025)");
        assert_eq!(notices[2].message, "Low Stock: Sprite, Fanta");
        assert_eq!(notices[3].message, "Out of Stock: Pepsi");
        assert_eq!(notices[0].severity, Severity::Error);
        assert_eq!(notices[1].severity, Severity::Warning);
    }

    #[test]
    fn test_repeated_scans_repeat_notices() {
        let collection = InventoryCollection::from_records(vec![rec("Soju", 0, None)]);
        let first = scan(&collection, &Thresholds::default(), now());
        let second = scan(&collection, &Thresholds::default(), now());
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }
}
