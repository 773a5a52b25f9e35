use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::model::{DamDataset, COL_CODE, COL_DATE};
use super::ConfigError;

// ---------------------------------------------------------------------------
// FilterSpec – the combined set of predicates applied conjunctively
// ---------------------------------------------------------------------------

/// Active/inactive predicates over the dataset. Every active predicate must
/// hold for a record to pass (logical AND); the default spec matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    /// Inclusive bounds over the cadastral date column. A range equal to the
    /// dataset's own [min, max] counts as inactive, so the untouched date
    /// pickers (which start at the full span) apply no filter.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// column name → required value, exact string match. Absent column means
    /// "Todos" (no constraint).
    pub categorical: BTreeMap<String, String>,
    /// Identifier equality on the code column.
    pub code: Option<String>,
}

impl FilterSpec {
    /// Whether any predicate would actually constrain the given dataset.
    pub fn is_active(&self, dataset: &DamDataset) -> bool {
        self.date_range_active(dataset) || !self.categorical.is_empty() || self.code.is_some()
    }

    fn date_range_active(&self, dataset: &DamDataset) -> bool {
        match (self.date_range, dataset.date_bounds) {
            (Some((start, end)), Some((min, max))) => start > min || end < max,
            // No parsed date anywhere: any requested range excludes every row.
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Apply `spec` to `dataset`, returning the indices of passing rows in their
/// original order. The dataset itself is never touched.
///
/// A predicate naming a column the dataset does not have is a caller bug and
/// fails with [`ConfigError::UnknownColumn`].
pub fn apply(dataset: &DamDataset, spec: &FilterSpec) -> Result<Vec<usize>, ConfigError> {
    let date_idx = match spec.date_range {
        Some(_) => Some(resolve_column(dataset, COL_DATE)?),
        None => None,
    };
    let code_idx = match spec.code {
        Some(_) => Some(resolve_column(dataset, COL_CODE)?),
        None => None,
    };
    let categorical: Vec<(usize, &str)> = spec
        .categorical
        .iter()
        .map(|(col, value)| Ok((resolve_column(dataset, col)?, value.as_str())))
        .collect::<Result<_, ConfigError>>()?;

    let date_filter = match (spec.date_range_active(dataset), date_idx, spec.date_range) {
        (true, Some(idx), Some((start, end))) => Some((idx, start, end)),
        _ => None,
    };

    let indices = dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            if let Some((idx, start, end)) = date_filter {
                // A cell that never parsed to a date has nothing to compare
                match record.cells[idx].as_date() {
                    Some(d) if start <= d && d <= end => {}
                    _ => return false,
                }
            }
            if let (Some(idx), Some(code)) = (code_idx, spec.code.as_deref()) {
                if record.cells[idx].to_string() != code {
                    return false;
                }
            }
            for &(idx, value) in &categorical {
                if record.cells[idx].to_string() != value {
                    return false;
                }
            }
            true
        })
        .map(|(i, _)| i)
        .collect();

    Ok(indices)
}

fn resolve_column(dataset: &DamDataset, name: &str) -> Result<usize, ConfigError> {
    dataset
        .column_index(name)
        .ok_or_else(|| ConfigError::UnknownColumn(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Record, COL_STATUS_CADASTRO, COL_STATUS_COMPARACAO};

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn sample_dataset() -> DamDataset {
        let columns = vec![
            COL_CODE.to_string(),
            COL_DATE.to_string(),
            COL_STATUS_CADASTRO.to_string(),
            COL_STATUS_COMPARACAO.to_string(),
        ];
        let rows = vec![
            Record::new(vec![
                text("1001"),
                text("2020-01-10"),
                text("Selecionado para validação"),
                text("Totalmente compatível"),
            ]),
            Record::new(vec![
                text("1002"),
                text("2021-06-15"),
                text("Descartado por duplicidade"),
                text("Não aplicado"),
            ]),
            Record::new(vec![
                text("1003"),
                text("data inválida"),
                text("Selecionado para validação"),
                text("Incompatível"),
            ]),
            Record::new(vec![
                text("1004"),
                text("2022-11-30"),
                text("Selecionado para validação"),
                text("Compatível parcialmente"),
            ]),
        ];
        DamDataset::from_rows(columns, rows)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_spec_is_identity() {
        let ds = sample_dataset();
        let result = apply(&ds, &FilterSpec::default()).unwrap();
        assert_eq!(result, vec![0, 1, 2, 3]);
    }

    #[test]
    fn full_span_date_range_is_treated_as_inactive() {
        let ds = sample_dataset();
        let spec = FilterSpec {
            date_range: ds.date_bounds,
            ..FilterSpec::default()
        };
        // The row with the unparsable date still passes: the predicate is
        // inactive even though a range was supplied.
        assert_eq!(apply(&ds, &spec).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn active_date_range_keeps_rows_inside_bounds_only() {
        let ds = sample_dataset();
        let spec = FilterSpec {
            date_range: Some((date(2020, 1, 1), date(2021, 12, 31))),
            ..FilterSpec::default()
        };
        // Row 2 has no valid date and is excluded once the predicate is active
        assert_eq!(apply(&ds, &spec).unwrap(), vec![0, 1]);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let ds = sample_dataset();
        let spec = FilterSpec {
            date_range: Some((date(2020, 1, 10), date(2021, 6, 15))),
            ..FilterSpec::default()
        };
        assert_eq!(apply(&ds, &spec).unwrap(), vec![0, 1]);
    }

    #[test]
    fn categorical_match_is_exact_and_case_sensitive() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::default();
        spec.categorical.insert(
            COL_STATUS_CADASTRO.to_string(),
            "Selecionado para validação".to_string(),
        );
        assert_eq!(apply(&ds, &spec).unwrap(), vec![0, 2, 3]);

        spec.categorical.insert(
            COL_STATUS_CADASTRO.to_string(),
            "selecionado para validação".to_string(),
        );
        assert_eq!(apply(&ds, &spec).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn predicates_compose_conjunctively() {
        let ds = sample_dataset();
        let mut spec = FilterSpec {
            date_range: Some((date(2020, 1, 1), date(2022, 12, 31))),
            ..FilterSpec::default()
        };
        spec.categorical.insert(
            COL_STATUS_CADASTRO.to_string(),
            "Selecionado para validação".to_string(),
        );
        spec.categorical.insert(
            COL_STATUS_COMPARACAO.to_string(),
            "Compatível parcialmente".to_string(),
        );
        assert_eq!(apply(&ds, &spec).unwrap(), vec![3]);
    }

    #[test]
    fn code_filter_matches_a_single_record() {
        let ds = sample_dataset();
        let spec = FilterSpec {
            code: Some("1003".to_string()),
            ..FilterSpec::default()
        };
        assert_eq!(apply(&ds, &spec).unwrap(), vec![2]);
    }

    #[test]
    fn unknown_column_is_a_configuration_error() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::default();
        spec.categorical
            .insert("COLUNA_INEXISTENTE".to_string(), "x".to_string());
        let err = apply(&ds, &spec).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownColumn(col) if col == "COLUNA_INEXISTENTE"));
    }

    #[test]
    fn result_preserves_input_order() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::default();
        spec.categorical.insert(
            COL_STATUS_CADASTRO.to_string(),
            "Selecionado para validação".to_string(),
        );
        let result = apply(&ds, &spec).unwrap();
        assert!(result.windows(2).all(|w| w[0] < w[1]));
    }
}
