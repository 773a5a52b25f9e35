use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use serde_json::Value as JsonValue;

use super::model::{parse_date_str, CellValue, DamDataset, Record};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the registration table from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xls` – the source spreadsheet (first sheet, header row first)
/// * `.csv`           – `;` or `,` delimited, header row first
/// * `.json`          – records-oriented array, the shape of the JSON export
pub fn load_file(path: &Path) -> Result<DamDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "xlsx" | "xls" | "xlsm" => load_xlsx(path),
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    if dataset.is_empty() {
        bail!("{} contains no data rows", path.display());
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

fn load_xlsx(path: &Path) -> Result<DamDataset> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("opening workbook {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no sheets")?
        .context("reading first sheet")?;

    let mut rows = range.rows();
    let header = rows.next().context("sheet has no header row")?;
    let columns: Vec<String> = header.iter().map(header_cell_to_string).collect();

    let records: Vec<Record> = rows
        .map(|row| Record::new(row.iter().map(xlsx_cell_to_value).collect()))
        .collect();

    Ok(DamDataset::from_rows(columns, records))
}

fn header_cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn xlsx_cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|ndt| CellValue::Date(ndt.date()))
            .unwrap_or(CellValue::Empty),
        Data::DateTimeIso(s) => parse_date_str(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => {
            log::warn!("cell error in spreadsheet: {e:?}");
            CellValue::Empty
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row defines the schema. The delimiter is sniffed from the header
/// line (`;` beats `,`), so the app re-opens its own semicolon exports as
/// well as plain CSVs; a leading UTF-8 BOM is tolerated.
fn load_csv(path: &Path) -> Result<DamDataset> {
    let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let raw = raw.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&raw);

    let first_line = raw.split(|&b| b == b'\n').next().unwrap_or_default();
    let delimiter = if first_line.contains(&b';') { b';' } else { b',' };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(raw);

    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells = record.iter().map(guess_cell_type).collect();
        records.push(Record::new(cells));
    }

    Ok(DamDataset::from_rows(columns, records))
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Int(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected shape (records-oriented, what the JSON export writes):
///
/// ```json
/// [
///   { "CÓDIGO SNISB": "12345", "DATA DO CADASTRO": "2021-03-05", ... },
///   ...
/// ]
/// ```
///
/// The first record defines the column order; later records are matched by
/// key, with missing keys becoming empty cells.
fn load_json(path: &Path) -> Result<DamDataset> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("expected top-level JSON array")?;
    let first = match records.first() {
        Some(JsonValue::Object(obj)) => obj,
        Some(_) => bail!("row 0 is not a JSON object"),
        None => bail!("JSON array is empty"),
    };
    let columns: Vec<String> = first.keys().cloned().collect();

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("row {i} is not a JSON object"))?;
        let cells = columns
            .iter()
            .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Empty))
            .collect();
        rows.push(Record::new(cells));
    }

    Ok(DamDataset::from_rows(columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::Null => CellValue::Empty,
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::String(s) if s.is_empty() => CellValue::Empty,
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        other => CellValue::Text(other.to_string()),
    }
}
