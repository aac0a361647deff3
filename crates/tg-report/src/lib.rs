//! # tg-report
//!
//! Pure transformation of aggregated search results into forms suitable
//! for inspection: sorting, column projection, structural-prefix
//! stripping, and the two-parameter pivot. No training or scoring
//! happens here.

pub mod pivot;
pub mod table;

pub use pivot::PivotTable;
pub use table::ResultsTable;
