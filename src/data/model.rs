use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Schema constants
// ---------------------------------------------------------------------------

// Column names are fixed by the source table and matched exactly,
// accents included.
pub const COL_CODE: &str = "CÓDIGO SNISB";
pub const COL_DATE: &str = "DATA DO CADASTRO";
pub const COL_STATUS_CADASTRO: &str = "SITUACAO_CADASTRO_SNISB";
pub const COL_STATUS_MASSA: &str = "SITUACAO_MASSA_DAGUA";
pub const COL_STATUS_COMPARACAO: &str = "SITUACAO_COMPARACAO_SIOUT";
pub const COL_GEOMETRY: &str = "PONTO_GEO";

/// Columns that get a dropdown filter in the UI (in display order).
pub const FILTER_COLUMNS: [&str; 4] = [
    COL_STATUS_CADASTRO,
    COL_STATUS_MASSA,
    COL_STATUS_COMPARACAO,
    COL_CODE,
];

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring what the source spreadsheet holds.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%d/%m/%Y")),
            CellValue::Empty => Ok(()),
        }
    }
}

impl CellValue {
    /// Canonical serialized form shared by every export format
    /// (ISO-8601 dates, plain numbers).
    pub fn export_str(&self) -> String {
        match self {
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            other => other.to_string(),
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// A single dam registration (one row of the source table). Cells are
/// positionally aligned with [`DamDataset::columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub cells: Vec<CellValue>,
}

impl Record {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Record { cells }
    }
}

// ---------------------------------------------------------------------------
// DamDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with indices computed once at load time.
#[derive(Debug, Clone)]
pub struct DamDataset {
    /// Ordered column names (the header row).
    pub columns: Vec<String>,
    /// All registrations, in file order.
    pub rows: Vec<Record>,
    /// column name → position in `columns`.
    index: BTreeMap<String, usize>,
    /// Sorted unique non-empty values per filterable column (dropdown options).
    pub unique_values: BTreeMap<String, Vec<String>>,
    /// Observed [min, max] of the cadastral date column, if any cell parsed.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
}

impl DamDataset {
    /// Build a dataset from a header and raw rows. Rows are padded or
    /// truncated to the header width so every record shares the schema,
    /// then the cadastral date column is normalized in place.
    pub fn from_rows(columns: Vec<String>, mut rows: Vec<Record>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.cells.resize(width, CellValue::Empty);
        }

        let index: BTreeMap<String, usize> = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        if let Some(&date_idx) = index.get(COL_DATE) {
            for row in &mut rows {
                normalize_date_cell(&mut row.cells[date_idx]);
            }
        }

        let mut dataset = DamDataset {
            columns,
            rows,
            index,
            unique_values: BTreeMap::new(),
            date_bounds: None,
        };
        dataset.rebuild_caches();
        dataset
    }

    fn rebuild_caches(&mut self) {
        let unique_values: BTreeMap<String, Vec<String>> = FILTER_COLUMNS
            .iter()
            .filter_map(|&col| {
                let idx = self.column_index(col)?;
                let mut values: Vec<String> = self
                    .rows
                    .iter()
                    .map(|r| &r.cells[idx])
                    .filter(|c| !c.is_empty())
                    .map(|c| c.to_string())
                    .collect();
                values.sort();
                values.dedup();
                Some((col.to_string(), values))
            })
            .collect();
        self.unique_values = unique_values;

        let date_bounds = self.column_index(COL_DATE).and_then(|idx| {
            let mut dates = self.rows.iter().filter_map(|r| r.cells[idx].as_date());
            let first = dates.next()?;
            let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
            Some((min, max))
        });
        self.date_bounds = date_bounds;
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Cell at (row, column name); `None` when the column does not exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r.cells[idx])
    }

    /// Stringified cell, empty string for missing column or empty cell.
    pub fn display_value(&self, row: usize, column: &str) -> String {
        self.value(row, column)
            .map(|c| c.to_string())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Date normalization
// ---------------------------------------------------------------------------

/// Coerce a cadastral-date cell to [`CellValue::Date`] where it parses.
/// Cells that do not parse keep their original value; running this twice
/// changes nothing.
fn normalize_date_cell(cell: &mut CellValue) {
    if let CellValue::Text(s) = cell {
        if let Some(date) = parse_date_str(s) {
            *cell = CellValue::Date(date);
        }
    }
}

/// Parse the date spellings seen in the source table.
pub fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for format in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Some(d);
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn dataset_with_dates(dates: &[&str]) -> DamDataset {
        let columns = vec![COL_CODE.to_string(), COL_DATE.to_string()];
        let rows = dates
            .iter()
            .enumerate()
            .map(|(i, d)| Record::new(vec![text(&format!("C{i}")), text(d)]))
            .collect();
        DamDataset::from_rows(columns, rows)
    }

    #[test]
    fn date_column_is_normalized_at_load() {
        let ds = dataset_with_dates(&["2021-03-05", "07/11/2020", "sem data"]);
        assert_eq!(
            ds.value(0, COL_DATE).unwrap().as_date(),
            NaiveDate::from_ymd_opt(2021, 3, 5)
        );
        assert_eq!(
            ds.value(1, COL_DATE).unwrap().as_date(),
            NaiveDate::from_ymd_opt(2020, 11, 7)
        );
        // Unparsable cell keeps its original value
        assert_eq!(ds.value(2, COL_DATE), Some(&text("sem data")));
    }

    #[test]
    fn normalization_is_idempotent() {
        let ds = dataset_with_dates(&["2021-03-05", "oops"]);
        let again = DamDataset::from_rows(ds.columns.clone(), ds.rows.clone());
        assert_eq!(again.rows, ds.rows);
        assert_eq!(again.date_bounds, ds.date_bounds);
    }

    #[test]
    fn date_bounds_span_parsed_cells_only() {
        let ds = dataset_with_dates(&["2022-06-01", "lixo", "2019-01-15", "2020-12-31"]);
        assert_eq!(
            ds.date_bounds,
            Some((
                NaiveDate::from_ymd_opt(2019, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2022, 6, 1).unwrap(),
            ))
        );
    }

    #[test]
    fn short_rows_are_padded_to_schema_width() {
        let columns = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let rows = vec![Record::new(vec![text("1")])];
        let ds = DamDataset::from_rows(columns, rows);
        assert_eq!(ds.rows[0].cells.len(), 3);
        assert_eq!(ds.rows[0].cells[2], CellValue::Empty);
    }

    #[test]
    fn unique_values_are_sorted_and_deduped() {
        let columns = vec![COL_STATUS_CADASTRO.to_string()];
        let rows = vec![
            Record::new(vec![text("b")]),
            Record::new(vec![text("a")]),
            Record::new(vec![text("b")]),
            Record::new(vec![CellValue::Empty]),
        ];
        let ds = DamDataset::from_rows(columns, rows);
        assert_eq!(
            ds.unique_values.get(COL_STATUS_CADASTRO).unwrap(),
            &vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn export_str_uses_iso_dates() {
        let cell = CellValue::Date(NaiveDate::from_ymd_opt(2021, 3, 5).unwrap());
        assert_eq!(cell.export_str(), "2021-03-05");
        assert_eq!(cell.to_string(), "05/03/2021");
    }
}
