//! Query time windows.
//!
//! Dates are naive calendar dates: the caller decides which timezone "today"
//! belongs to, nothing here consults the process-local zone.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::error::{CrashboardError, Result};

/// Aggregation period of a timeline query. Only daily buckets are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
    Daily,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Daily => "DAILY",
        }
    }
}

/// Inclusive date range plus aggregation period. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveDate,
    end: NaiveDate,
    granularity: Granularity,
}

impl TimeWindow {
    pub fn new(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> Result<Self> {
        if start > end {
            return Err(CrashboardError::Internal(format!(
                "time window start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end, granularity })
    }

    /// Daily window `[today - start_offset, today - end_offset]`.
    pub fn trailing(today: NaiveDate, start_offset: u64, end_offset: u64) -> Result<Self> {
        let back = |days: u64| {
            today.checked_sub_days(Days::new(days)).ok_or_else(|| {
                CrashboardError::Internal(format!("{today} minus {days} days is out of range"))
            })
        };
        Self::new(back(start_offset)?, back(end_offset)?, Granularity::Daily)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={} ({})", self.start, self.end, self.granularity.as_str())
    }
}
