//! # tg-search
//!
//! The TuneGrid search engine: parameter grid expansion, seeded k-fold
//! planning, cross-validated scoring of every combination through a
//! bounded worker pool, aggregation and ranking, and the final refit of
//! the winning combination on the full dataset.

pub mod baseline;
pub mod driver;
pub mod folds;
pub mod grid;
pub mod run;

pub use baseline::{KNearest, MajorityClass, Namespaced};
pub use driver::{GridSearchDriver, SearchConfig, SearchOutcome};
pub use folds::FoldPlan;
pub use grid::ParamGrid;
pub use run::{RunState, SearchRun};
