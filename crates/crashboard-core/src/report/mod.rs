//! Report transforms (rows -> trend points / week-over-week entries).
//!
//! Both reports query the same metric set; they differ in the metric, the
//! windows, and how rows are reduced.

pub mod comparison;
pub mod trend;

pub use comparison::{ComparisonEntry, Week};
pub use trend::TrendPoint;

/// Metric set queried by both reports.
pub const CRASH_RATE_METRIC_SET: &str = "crashRateMetricSet";
/// Daily raw crash rate, plotted by the trend report.
pub const CRASH_RATE: &str = "crashRate";
/// Trailing-7-day user-weighted crash rate, compared week over week.
pub const CRASH_RATE_7D_USER_WEIGHTED: &str = "crashRate7dUserWeighted";
