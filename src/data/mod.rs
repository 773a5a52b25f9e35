//! Data layer: core types, loading, filtering, pagination, geometry, export.
//!
//! Pipeline:
//! ```text
//!  .xlsx / .csv / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → DamDataset (dates normalized once here)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ DamDataset  │  rows + schema + per-column indices
//!   └────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  apply predicates → row indices
//!   └──────────┘
//!        │
//!        ├────────────► page      → table slice
//!        ├────────────► geometry  → map markers
//!        └────────────► export    → xlsx / csv / json
//! ```
//!
//! Each stage is a pure function over the in-memory dataset; bad cells drop
//! out of the derived views, they never abort a stage.

use thiserror::Error;

pub mod export;
pub mod filter;
pub mod geometry;
pub mod loader;
pub mod model;
pub mod page;

/// Caller misuse, as opposed to bad data in the table. Propagated unchanged;
/// data-quality problems never surface here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("page size must be positive, got {0}")]
    InvalidPageSize(usize),
}
