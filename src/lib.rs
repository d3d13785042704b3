//! Period-over-period loading analytics for rake movements.
//!
//! Operation records (one per rake) are grouped by commodity or station
//! and compared between a current window and a comparison window,
//! usually the same calendar days one year earlier. The comparison core
//! ([`stats`], [`grouping`], [`compare`], [`window`], [`share`]) is pure
//! and holds no state between calls; [`loader`], [`store`], [`reports`]
//! and [`output`] cover CSV ingest and report export around it.

pub mod compare;
pub mod config;
pub mod error;
pub mod grouping;
pub mod loader;
pub mod output;
pub mod reports;
pub mod share;
pub mod stats;
pub mod store;
pub mod types;
pub mod util;
pub mod window;

pub use compare::{compare_periods, compute_comparison, rollup_totals};
pub use error::ReportError;
pub use share::percentage_of_total;
pub use types::{Comparison, ComparisonRow, Dimension, OperationRecord, TotalsRow};
pub use window::resolve_reporting_window;
