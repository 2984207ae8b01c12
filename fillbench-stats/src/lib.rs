#![warn(missing_docs)]
//! FillBench Statistics
//!
//! Summary statistics over per-iteration timings:
//! - Mean exactly as accumulated total / iteration count
//! - Median and percentiles by linear interpolation
//! - Sample standard deviation and extremes

mod percentiles;
mod summary;

pub use percentiles::compute_percentile;
pub use summary::{SummaryStatistics, compute_summary, mean};
