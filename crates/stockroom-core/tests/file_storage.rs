use chrono::{NaiveDate, TimeZone, Utc};
use stockroom_core::{
    Error, FileStorage, Inventory, InventoryRecord, PreviewStorage, Query, RecordDraft, Status,
    StatusFilter, Storage, Thresholds,
};
use tempfile::TempDir;

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

fn draft(name: &str, quantity: &str, buy: &str, sell: &str, expiry: &str) -> RecordDraft {
    RecordDraft {
        name: name.to_string(),
        quantity: quantity.to_string(),
        buy_price: buy.to_string(),
        sell_price: sell.to_string(),
        expiry: expiry.to_string(),
    }
}

fn file_storage(dir: &TempDir) -> FileStorage {
    FileStorage::new(dir.path().join("inventory.json"), dir.path().join("exports"))
}

#[test]
fn test_missing_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    assert!(file_storage(&dir).load().unwrap().is_empty());
}

#[test]
fn test_add_then_reload_round_trips() {
    let dir = TempDir::new().unwrap();

    let mut inventory = Inventory::open(Box::new(file_storage(&dir)), Thresholds::default());
    inventory
        .add(&draft("Coke", "0", "6", "9", "2026-12-14"), now())
        .unwrap();
    inventory.add(&draft("Pepsi", "12", "7.5", "10", ""), now()).unwrap();
    let in_memory = inventory.collection().to_records();

    let reopened = Inventory::open(Box::new(file_storage(&dir)), Thresholds::default());
    assert_eq!(reopened.collection().to_records(), in_memory);
}

#[test]
fn test_file_format_is_plain_json_array() {
    let dir = TempDir::new().unwrap();
    let storage = file_storage(&dir);
    storage
        .save(&[InventoryRecord::new(
            "Coke",
            0,
            6.0,
            9.0,
            NaiveDate::from_ymd_opt(2026, 12, 14),
        )])
        .unwrap();

    let text = std::fs::read_to_string(dir.path().join("inventory.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(value.is_array());
    assert_eq!(value[0]["buyPrice"], 6.0);
    assert_eq!(value[0]["expiry"], "2026-12-14");
    assert!(text.contains("\n  {"), "expected two-space indentation");
}

#[test]
fn test_reads_files_written_by_hand() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("inventory.json"),
        r#"[
  {"name":"Coke","quantity":0,"buyPrice":6,"sellPrice":9,"expiry":"2026-12-14"},
  {"name":"Tubig","quantity":40,"buyPrice":10,"sellPrice":15,"expiry":""}
]"#,
    )
    .unwrap();

    let inventory = Inventory::open(Box::new(file_storage(&dir)), Thresholds::default());
    let rows = inventory.view(&Query::new().text("cok"), now());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, Status::OutOfStock);

    let dash = inventory.dashboard(now());
    assert_eq!(dash.total, 2);
    assert_eq!(dash.out_of_stock_count, 1);
    assert_eq!(dash.total_profit, 200.0);
}

#[test]
fn test_corrupt_file_is_parse_error_and_opens_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("inventory.json"), "not json at all").unwrap();

    assert!(matches!(file_storage(&dir).load(), Err(Error::Parse(_))));

    let inventory = Inventory::open(Box::new(file_storage(&dir)), Thresholds::default());
    assert!(inventory.is_empty());
}

#[test]
fn test_export_writes_both_files() {
    let dir = TempDir::new().unwrap();
    let mut inventory = Inventory::open(Box::new(file_storage(&dir)), Thresholds::default());
    inventory.add(&draft("Soju", "6", "25", "28", ""), now()).unwrap();

    let report = inventory.export().unwrap();
    assert_eq!(report.rows, 1);
    assert_eq!(report.files.len(), 2);

    let csv = std::fs::read_to_string(dir.path().join("exports/inventory_export.csv")).unwrap();
    assert_eq!(csv, "name,quantity,buyPrice,sellPrice,expiry\nSoju,6,25,28,\n");
    let xlsx = std::fs::read(dir.path().join("exports/inventory_export.xlsx")).unwrap();
    assert!(xlsx.starts_with(b"PK"));
}

#[test]
fn test_demo_seed_overwrites_file() {
    let dir = TempDir::new().unwrap();
    let mut inventory = Inventory::open(Box::new(file_storage(&dir)), Thresholds::default());
    inventory.add(&draft("Old", "1", "1", "1", ""), now()).unwrap();

    inventory.seed_demo(now()).unwrap();

    let on_disk = file_storage(&dir).load().unwrap();
    assert_eq!(on_disk.len(), 20);
    assert_eq!(on_disk[8].name, "Sarsi");
    assert_eq!(on_disk[8].quantity, 10);
    assert!(dir.path().join("exports/inventory_export.csv").exists());

    let out_of_stock = inventory.view(
        &Query::new().status(StatusFilter::Only(Status::OutOfStock)),
        now(),
    );
    let names: Vec<_> = out_of_stock.iter().map(|r| r.record.name.as_str()).collect();
    assert_eq!(names, vec!["Root Beer", "Soju"]);
}

#[test]
fn test_preview_mode_leaves_file_alone() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventory.json");
    std::fs::write(&path, "[]").unwrap();

    let mut inventory = Inventory::open(Box::new(PreviewStorage::new(&path)), Thresholds::default());
    assert!(inventory.is_read_only());
    inventory.add(&draft("Coke", "3", "6", "9", ""), now()).unwrap();
    assert_eq!(inventory.len(), 1);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    assert!(matches!(inventory.export(), Err(Error::Unsupported(_))));
    assert!(matches!(inventory.seed_demo(now()), Err(Error::Unsupported(_))));
}

#[test]
fn test_preview_mode_refuses_single_file_export() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventory.json");
    std::fs::write(
        &path,
        r#"[{"name":"Coke","quantity":0,"buyPrice":6,"sellPrice":9,"expiry":"2026-12-14"}]"#,
    )
    .unwrap();
    let target = dir.path().join("leaked.csv");

    let inventory = Inventory::open(Box::new(PreviewStorage::new(&path)), Thresholds::default());
    assert!(matches!(
        inventory.export_to(&target),
        Err(Error::Unsupported(_))
    ));
    assert!(!target.exists());
}

#[test]
fn test_single_file_export_writes_requested_format() {
    let dir = TempDir::new().unwrap();
    let mut inventory = Inventory::open(Box::new(file_storage(&dir)), Thresholds::default());
    inventory
        .add(&draft("Coke", "0", "6", "9", "2026-12-14"), now())
        .unwrap();

    let target = dir.path().join("stock.csv");
    assert_eq!(inventory.export_to(&target).unwrap(), 1);
    assert_eq!(
        std::fs::read_to_string(&target).unwrap(),
        "name,quantity,buyPrice,sellPrice,expiry\nCoke,0,6,9,2026-12-14\n"
    );

    let unknown = dir.path().join("stock.txt");
    assert!(matches!(inventory.export_to(&unknown), Err(Error::Export(_))));
}

#[test]
fn test_delete_out_of_range_leaves_file_unchanged() {
    let dir = TempDir::new().unwrap();
    let mut inventory = Inventory::open(Box::new(file_storage(&dir)), Thresholds::default());
    let (id, _) = inventory.add(&draft("Coke", "3", "6", "9", ""), now()).unwrap();
    inventory.delete(id, now()).unwrap();
    let before = std::fs::read_to_string(dir.path().join("inventory.json")).unwrap();

    assert!(inventory.delete(id, now()).unwrap().is_none());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("inventory.json")).unwrap(),
        before
    );
    assert!(inventory.is_empty());
}
