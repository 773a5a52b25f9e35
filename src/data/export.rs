use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rust_xlsxwriter::Workbook;
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::model::{CellValue, DamDataset};

/// Sheet name of the Excel export.
const SHEET_NAME: &str = "Dados";

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Xlsx, ExportFormat::Csv, ExportFormat::Json];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "Excel (.xlsx)",
            ExportFormat::Csv => "CSV (.csv)",
            ExportFormat::Json => "JSON (.json)",
        }
    }
}

/// Suggested file name for a download, e.g. `dados_filtrados_20250131_154502.csv`.
pub fn default_file_name(filtered: bool, now: NaiveDateTime, format: ExportFormat) -> String {
    let prefix = if filtered {
        "dados_filtrados"
    } else {
        "dados_completos"
    };
    format!(
        "{prefix}_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

// ---------------------------------------------------------------------------
// Writers – all three serialize the same rows in the same order
// ---------------------------------------------------------------------------

/// Write the given (filtered) rows to `path` in `format`.
pub fn export_to_path(
    path: &Path,
    format: ExportFormat,
    dataset: &DamDataset,
    rows: &[usize],
) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    match format {
        ExportFormat::Xlsx => write_xlsx(&mut writer, dataset, rows)?,
        ExportFormat::Csv => write_csv(&mut writer, dataset, rows)?,
        ExportFormat::Json => write_json(&mut writer, dataset, rows)?,
    }
    writer.flush().context("flushing export file")?;
    Ok(())
}

/// Excel: a single sheet with the header row and one row per record.
pub fn write_xlsx<W: Write>(writer: &mut W, dataset: &DamDataset, rows: &[usize]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in dataset.columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }
    for (out_row, &row) in rows.iter().enumerate() {
        let out_row = (out_row + 1) as u32;
        for (col, cell) in dataset.rows[row].cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                CellValue::Int(i) => worksheet.write_number(out_row, col, *i as f64)?,
                CellValue::Float(f) => worksheet.write_number(out_row, col, *f)?,
                CellValue::Bool(b) => worksheet.write_boolean(out_row, col, *b)?,
                CellValue::Empty => continue,
                other => worksheet.write_string(out_row, col, other.export_str())?,
            };
        }
    }

    let buffer = workbook.save_to_buffer().context("serializing xlsx")?;
    writer.write_all(&buffer).context("writing xlsx")?;
    Ok(())
}

/// CSV: UTF-8 with a byte-order mark so spreadsheet programs pick up the
/// encoding, `;` delimited, one header row.
pub fn write_csv<W: Write>(writer: &mut W, dataset: &DamDataset, rows: &[usize]) -> Result<()> {
    writer.write_all(b"\xEF\xBB\xBF").context("writing BOM")?;

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(writer);

    csv_writer
        .write_record(&dataset.columns)
        .context("writing CSV header")?;
    for &row in rows {
        csv_writer
            .write_record(dataset.rows[row].cells.iter().map(|c| c.export_str()))
            .context("writing CSV row")?;
    }
    csv_writer.flush().context("flushing CSV")?;
    Ok(())
}

/// JSON: records-oriented array, 2-space indent, ISO-8601 dates, UTF-8
/// without ASCII escaping.
pub fn write_json<W: Write>(writer: &mut W, dataset: &DamDataset, rows: &[usize]) -> Result<()> {
    let records: Vec<JsonValue> = rows
        .iter()
        .map(|&row| {
            let map: JsonMap<String, JsonValue> = dataset
                .columns
                .iter()
                .zip(dataset.rows[row].cells.iter())
                .map(|(name, cell)| (name.clone(), cell_to_json(cell)))
                .collect();
            JsonValue::Object(map)
        })
        .collect();

    serde_json::to_writer_pretty(writer, &records).context("writing JSON")?;
    Ok(())
}

fn cell_to_json(cell: &CellValue) -> JsonValue {
    match cell {
        CellValue::Text(s) => JsonValue::String(s.clone()),
        CellValue::Int(i) => JsonValue::from(*i),
        CellValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        CellValue::Bool(b) => JsonValue::Bool(*b),
        CellValue::Date(d) => JsonValue::String(d.format("%Y-%m-%d").to_string()),
        CellValue::Empty => JsonValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Record, COL_CODE, COL_DATE};

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn sample_dataset() -> DamDataset {
        let columns = vec![COL_CODE.to_string(), COL_DATE.to_string(), "ALTURA".into()];
        let rows = vec![
            Record::new(vec![text("1001"), text("2021-03-05"), CellValue::Float(12.5)]),
            Record::new(vec![text("1002"), text("sem data"), CellValue::Empty]),
            Record::new(vec![text("1003"), text("2019-12-01"), CellValue::Int(7)]),
        ];
        DamDataset::from_rows(columns, rows)
    }

    #[test]
    fn csv_starts_with_bom_and_uses_semicolons() {
        let ds = sample_dataset();
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &ds, &[0, 1, 2]).unwrap();

        assert_eq!(&buffer[..3], b"\xEF\xBB\xBF");
        let body = String::from_utf8(buffer[3..].to_vec()).unwrap();
        let mut lines = body.lines();
        assert_eq!(lines.next(), Some("CÓDIGO SNISB;DATA DO CADASTRO;ALTURA"));
        assert_eq!(lines.next(), Some("1001;2021-03-05;12.5"));
        assert_eq!(lines.next(), Some("1002;sem data;"));
        assert_eq!(lines.next(), Some("1003;2019-12-01;7"));
    }

    #[test]
    fn json_is_records_oriented_with_iso_dates() {
        let ds = sample_dataset();
        let mut buffer = Vec::new();
        write_json(&mut buffer, &ds, &[0, 2]).unwrap();

        let parsed: JsonValue = serde_json::from_slice(&buffer).unwrap();
        let records = parsed.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0][COL_CODE], "1001");
        assert_eq!(records[0][COL_DATE], "2021-03-05");
        assert_eq!(records[0]["ALTURA"], 12.5);
        assert_eq!(records[1][COL_CODE], "1003");

        // No ASCII escaping: the accented column name appears verbatim
        let body = String::from_utf8(buffer).unwrap();
        assert!(body.contains("CÓDIGO SNISB"));
        assert!(!body.contains("\\u"));
    }

    #[test]
    fn json_row_order_follows_the_index_list() {
        let ds = sample_dataset();
        let mut buffer = Vec::new();
        write_json(&mut buffer, &ds, &[2, 0]).unwrap();
        let parsed: JsonValue = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed[0][COL_CODE], "1003");
        assert_eq!(parsed[1][COL_CODE], "1001");
    }

    #[test]
    fn unparsable_date_cells_export_their_original_text() {
        let ds = sample_dataset();
        let mut buffer = Vec::new();
        write_json(&mut buffer, &ds, &[1]).unwrap();
        let parsed: JsonValue = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed[0][COL_DATE], "sem data");
    }

    #[test]
    fn formats_serialize_identical_row_content() {
        let ds = sample_dataset();
        let rows = [0usize, 2];

        let mut csv_buf = Vec::new();
        write_csv(&mut csv_buf, &ds, &rows).unwrap();
        let csv_body = String::from_utf8(csv_buf[3..].to_vec()).unwrap();
        let csv_codes: Vec<&str> = csv_body
            .lines()
            .skip(1)
            .map(|l| l.split(';').next().unwrap())
            .collect();

        let mut json_buf = Vec::new();
        write_json(&mut json_buf, &ds, &rows).unwrap();
        let parsed: JsonValue = serde_json::from_slice(&json_buf).unwrap();
        let json_codes: Vec<String> = parsed
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r[COL_CODE].as_str().unwrap().to_string())
            .collect();

        assert_eq!(csv_codes, json_codes);
    }

    #[test]
    fn xlsx_export_produces_a_workbook() {
        let ds = sample_dataset();
        let mut buffer = Vec::new();
        write_xlsx(&mut buffer, &ds, &[0, 1, 2]).unwrap();
        // xlsx is a zip container
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn default_file_name_reflects_filter_state() {
        let now = chrono::NaiveDate::from_ymd_opt(2025, 1, 31)
            .unwrap()
            .and_hms_opt(15, 45, 2)
            .unwrap();
        assert_eq!(
            default_file_name(true, now, ExportFormat::Csv),
            "dados_filtrados_20250131_154502.csv"
        );
        assert_eq!(
            default_file_name(false, now, ExportFormat::Xlsx),
            "dados_completos_20250131_154502.xlsx"
        );
    }
}
