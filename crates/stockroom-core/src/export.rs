use crate::{models::InventoryRecord, Error, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sheet name inside the workbook
pub const SHEET_NAME: &str = "Inventory";
pub const XLSX_FILE: &str = "inventory_export.xlsx";
pub const CSV_FILE: &str = "inventory_export.csv";

/// Raw record fields in declaration order
pub const COLUMNS: [&str; 5] = ["name", "quantity", "buyPrice", "sellPrice", "expiry"];

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "xlsx" => Some(ExportFormat::Xlsx),
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

/// What an export run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub files: Vec<PathBuf>,
    pub rows: usize,
}

/// Tabular exporter for inventory records
pub struct Exporter;

impl Exporter {
    /// Write the workbook and the CSV side by side under their fixed names,
    /// replacing whatever was there.
    pub fn export_all<P: AsRef<Path>>(records: &[InventoryRecord], dir: P) -> Result<ExportReport> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let xlsx_path = dir.join(XLSX_FILE);
        let csv_path = dir.join(CSV_FILE);
        Self::export_to_file_with_format(records, &xlsx_path, ExportFormat::Xlsx)?;
        Self::export_to_file_with_format(records, &csv_path, ExportFormat::Csv)?;

        tracing::info!(
            "Exported {} rows to {} and {}",
            records.len(),
            xlsx_path.display(),
            csv_path.display()
        );

        Ok(ExportReport {
            files: vec![xlsx_path, csv_path],
            rows: records.len(),
        })
    }

    /// Export to a file with automatic format detection
    pub fn export_to_file<P: AsRef<Path>>(records: &[InventoryRecord], path: P) -> Result<()> {
        let path = path.as_ref();

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ExportFormat::from_extension)
            .ok_or_else(|| {
                Error::Export(
                    "Could not determine export format from extension. Use .xlsx, .csv, or .json"
                        .to_string(),
                )
            })?;

        Self::export_to_file_with_format(records, path, format)
    }

    pub fn export_to_file_with_format<P: AsRef<Path>>(
        records: &[InventoryRecord],
        path: P,
        format: ExportFormat,
    ) -> Result<()> {
        let content = match format {
            ExportFormat::Xlsx => Self::to_xlsx(records)?,
            ExportFormat::Csv => Self::to_csv(records).into_bytes(),
            ExportFormat::Json => Self::to_json(records)?.into_bytes(),
        };

        let mut file = File::create(path.as_ref())
            .map_err(|e| Error::Export(format!("Failed to create file: {}", e)))?;

        file.write_all(&content)
            .map_err(|e| Error::Export(format!("Failed to write file: {}", e)))?;

        Ok(())
    }

    /// Single "Inventory" sheet, header row then one row per record
    pub fn to_xlsx(records: &[InventoryRecord]) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let mut worksheet = Worksheet::new();
        worksheet.set_name(SHEET_NAME)?;

        for (col, header) in COLUMNS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header)?;
        }

        for (i, record) in records.iter().enumerate() {
            let row = (i + 1) as u32;
            worksheet.write_string(row, 0, &record.name)?;
            worksheet.write_number(row, 1, f64::from(record.quantity))?;
            worksheet.write_number(row, 2, record.buy_price)?;
            worksheet.write_number(row, 3, record.sell_price)?;
            worksheet.write_string(row, 4, record.expiry_text())?;
        }

        workbook.push_worksheet(worksheet);
        Ok(workbook.save_to_buffer()?)
    }

    /// Same table as the workbook, as CSV
    pub fn to_csv(records: &[InventoryRecord]) -> String {
        let mut output = COLUMNS.join(",");
        output.push('\n');

        for record in records {
            output.push_str(&format!(
                "{},{},{},{},{}\n",
                Self::escape_csv(&record.name),
                record.quantity,
                record.buy_price,
                record.sell_price,
                record.expiry_text(),
            ));
        }

        output
    }

    pub fn to_json(records: &[InventoryRecord]) -> Result<String> {
        Ok(serde_json::to_string_pretty(records)?)
    }

    /// Escape CSV special characters
    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn records() -> Vec<InventoryRecord> {
        vec![
            InventoryRecord::new("Coke", 0, 6.0, 9.0, NaiveDate::from_ymd_opt(2026, 12, 14)),
            InventoryRecord::new("Dr Pepper, Diet", 7, 12.5, 15.0, None),
        ]
    }

    #[test]
    fn test_export_format_detection() {
        assert_eq!(ExportFormat::from_extension("XLSX"), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::from_extension("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_extension("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_extension("md"), None);
    }

    #[test]
    fn test_csv_export() {
        let csv = Exporter::to_csv(&records());
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "name,quantity,buyPrice,sellPrice,expiry");
        assert_eq!(lines[1], "Coke,0,6,9,2026-12-14");
        assert_eq!(lines[2], "\"Dr Pepper, Diet\",7,12.5,15,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(Exporter::escape_csv("simple"), "simple");
        assert_eq!(Exporter::escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(Exporter::escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(Exporter::escape_csv("carriage\rreturn"), "\"carriage\rreturn\"");
    }

    #[test]
    fn test_xlsx_is_a_zip_container() {
        let bytes = Exporter::to_xlsx(&records()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_json_export_matches_storage_shape() {
        let json = Exporter::to_json(&records()).unwrap();
        let back: Vec<InventoryRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, records());
    }
}
