//! Analytics core of the lift-stats viewer.
//!
//! ```text
//!  loader ──► LiftDataset (catalog + lift partitions)
//!                 │  FilterSelection, LiftType
//!                 ▼
//!            filter_values ──► stats::summarize ──► chart::build
//! ```

pub mod chart;
pub mod data;
pub mod stats;

pub use chart::{ChartDescriptor, format_kg};
pub use data::{FilterColumn, FilterSelection, LiftDataset, LiftType, LoadError};
pub use stats::{HistogramConfig, Summary};
