//! Report builders: query the reporting API and shape the result.
//!
//! Each builder takes "today" explicitly so callers own the timezone choice.

pub mod chart;
pub mod comparison;
pub mod trend;

pub use chart::ChartRenderer;
