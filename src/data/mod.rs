//! Data layer: records, loading, lift partitions and filtering.
//!
//! Architecture:
//! ```text
//!  .parquet / .csv(.gz) / .json   (file or URL)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  fetch + decode → Vec<LiftRecord>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────────┐
//!   │ LiftDataset │  rows, FilterCatalog, LiftIndex (built once)
//!   └─────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter  │  FilterSelection over one partition → Vec<f64>
//!   └──────────┘
//! ```

pub mod error;
pub mod filter;
pub mod index;
pub mod loader;
pub mod model;

pub use error::{ErrorKind, LoadError};
pub use filter::{filter_values, FilterCatalog, FilterSelection};
pub use index::LiftIndex;
pub use loader::{load, load_file, DatasetSource};
pub use model::{CellValue, Column, FilterColumn, LiftRecord, LiftType};

/// Everything derived from one load. Read-only once constructed.
#[derive(Debug, Clone, Default)]
pub struct LiftDataset {
    rows: Vec<LiftRecord>,
    catalog: FilterCatalog,
    index: LiftIndex,
}

impl LiftDataset {
    /// Build the catalog and lift partitions for `rows`.
    pub fn from_rows(rows: Vec<LiftRecord>) -> Self {
        let catalog = FilterCatalog::from_rows(&rows);
        let index = LiftIndex::build(&rows);
        LiftDataset {
            rows,
            catalog,
            index,
        }
    }

    pub fn rows(&self) -> &[LiftRecord] {
        &self.rows
    }

    pub fn catalog(&self) -> &FilterCatalog {
        &self.catalog
    }

    pub fn index(&self) -> &LiftIndex {
        &self.index
    }

    /// Rows of one lift partition, in load order.
    pub fn partition(&self, lift: LiftType) -> impl Iterator<Item = &LiftRecord> {
        self.index
            .partition(lift)
            .iter()
            .map(move |&i| &self.rows[i])
    }

    /// Best results for `lift` among partition rows matching `selection`.
    pub fn values(&self, lift: LiftType, selection: &FilterSelection) -> Vec<f64> {
        filter_values(self.partition(lift), lift, selection)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
