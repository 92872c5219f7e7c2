// Deterministic sample data for seeding a fresh install
use crate::models::InventoryRecord;
use chrono::NaiveDate;

pub const PRODUCT_NAMES: [&str; 20] = [
    "Coke",
    "Pepsi",
    "Sprite",
    "Royal",
    "Mountain Dew",
    "7 Up",
    "Dr Pepper",
    "Fanta",
    "Sarsi",
    "Root Beer",
    "Tanduay",
    "San Miguel",
    "Red Horse",
    "Emperador",
    "Ginebra",
    "Fundador",
    "The Bar",
    "Smirnoff",
    "Vodka Cruiser",
    "Soju",
];

/// One record per product name. Everything is keyed off the 1-based
/// position `n`, so the same call always yields the same inventory.
pub fn generate() -> Vec<InventoryRecord> {
    PRODUCT_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| demo_record(i + 1, name))
        .collect()
}

fn demo_record(n: usize, name: &str) -> InventoryRecord {
    let n = n as u32;
    let quantity = if n % 10 == 0 { 0 } else { n % 12 + 1 };
    let buy_price = f64::from(5 + n);
    let sell_price = buy_price + f64::from(2 + n % 3);

    let (year, month, day) = if n % 8 == 0 {
        (2025, 10, 1)
    } else if n % 5 == 0 {
        (2025, 10, 20)
    } else if n % 4 == 0 {
        (2025, 10, 31)
    } else {
        (2026, 12, 14)
    };

    InventoryRecord::new(
        name,
        quantity,
        buy_price,
        sell_price,
        NaiveDate::from_ymd_opt(year, month, day),
    )
}
