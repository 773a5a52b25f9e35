use serde::Serialize;

use super::model::{
    CellValue, DamDataset, COL_CODE, COL_GEOMETRY, COL_STATUS_CADASTRO, COL_STATUS_COMPARACAO,
    COL_STATUS_MASSA,
};
use crate::color::{classify, StatusCategory};

// ---------------------------------------------------------------------------
// GeoPoint – a validated coordinate pair
// ---------------------------------------------------------------------------

/// Decimal-degree coordinates parsed from the `PONTO_GEO` column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Parse a `POINT(<lon> <lat>)` text into a [`GeoPoint`].
///
/// The token order is longitude first (the WKT convention); the result stores
/// them by name so callers cannot transpose. Anything that does not match the
/// pattern, has the wrong token count, or yields a non-finite number is
/// `None` rather than an error.
pub fn parse_point(text: &str) -> Option<GeoPoint> {
    let inner = text.trim().strip_prefix("POINT(")?.strip_suffix(')')?;
    let mut tokens = inner.split_whitespace();
    let lon: f64 = tokens.next()?.parse().ok()?;
    let lat: f64 = tokens.next()?.parse().ok()?;
    if tokens.next().is_some() {
        return None;
    }
    (lon.is_finite() && lat.is_finite()).then_some(GeoPoint { lat, lon })
}

/// Point for one record, or `None` when the geometry column is missing, the
/// cell is empty, or the text does not parse.
pub fn extract(dataset: &DamDataset, row: usize) -> Option<GeoPoint> {
    match dataset.value(row, COL_GEOMETRY)? {
        CellValue::Text(s) => parse_point(s),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Map markers – what the map renderer consumes
// ---------------------------------------------------------------------------

/// One renderable marker: identifier, coordinates, the color category and the
/// status fields shown in the popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub code: String,
    pub point: GeoPoint,
    pub category: StatusCategory,
    pub status_cadastro: String,
    pub status_massa: String,
    pub status_comparacao: String,
}

/// Markers for the given (filtered) row indices, in the same order. Records
/// without a valid point contribute nothing; one bad cell never aborts the
/// rest.
pub fn extract_all(dataset: &DamDataset, rows: &[usize]) -> Vec<MapMarker> {
    rows.iter()
        .filter_map(|&row| {
            let point = extract(dataset, row)?;
            let status_cadastro = dataset.display_value(row, COL_STATUS_CADASTRO);
            let status_comparacao = dataset.display_value(row, COL_STATUS_COMPARACAO);
            Some(MapMarker {
                code: dataset.display_value(row, COL_CODE),
                point,
                category: classify(&status_cadastro, &status_comparacao),
                status_cadastro,
                status_massa: dataset.display_value(row, COL_STATUS_MASSA),
                status_comparacao,
            })
        })
        .collect()
}
