//! Week-over-week comparison: the last row of two adjacent windows.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::metric::{sort_by_period, MetricRow};
use crate::window::TimeWindow;

/// Which of the two compared windows an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Week {
    /// `[today - 15, today - 8]`
    Previous,
    /// `[today - 8, today - 1]`
    Current,
}

impl Week {
    pub const ALL: [Week; 2] = [Week::Previous, Week::Current];

    pub fn index(self) -> u32 {
        match self {
            Week::Previous => 0,
            Week::Current => 1,
        }
    }

    pub fn window(self, today: NaiveDate) -> Result<TimeWindow> {
        match self {
            Week::Previous => TimeWindow::trailing(today, 15, 8),
            Week::Current => TimeWindow::trailing(today, 8, 1),
        }
    }
}

/// Serialized as `{"week": 0|1, "value": <percent>}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub week: u32,
    #[serde(serialize_with = "compact_f64")]
    pub value: f64,
}

/// Reduce one window's rows to its entry: the latest row's `metric` as a
/// percentage. `None` when there are no rows or the latest row lacks the metric.
pub fn entry(week: Week, mut rows: Vec<MetricRow>, metric: &str) -> Result<Option<ComparisonEntry>> {
    sort_by_period(&mut rows);
    let Some(last) = rows.last() else {
        return Ok(None);
    };
    Ok(last
        .percent(metric)?
        .map(|value| ComparisonEntry { week: week.index(), value }))
}

/// Whole floats go out as integers (`5`, not `5.0`).
fn compact_f64<S: Serializer>(v: &f64, s: S) -> std::result::Result<S::Ok, S::Error> {
    const EXACT_INT: f64 = 9_007_199_254_740_992.0; // 2^53
    if v.is_finite() && v.fract() == 0.0 && v.abs() < EXACT_INT {
        s.serialize_i64(*v as i64)
    } else {
        s.serialize_f64(*v)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn last_row_by_date_wins() {
        let rows = vec![
            MetricRow::new(date(2024, 3, 9)).with("m", "0.03"),
            MetricRow::new(date(2024, 3, 2)).with("m", "0.01"),
        ];
        let e = entry(Week::Current, rows, "m").unwrap().unwrap();
        assert_eq!(e, ComparisonEntry { week: 1, value: 3.0 });
    }

    #[test]
    fn empty_window_yields_nothing() {
        assert_eq!(entry(Week::Previous, vec![], "m").unwrap(), None);
    }

    #[test]
    fn windows_overlap_on_boundary_day() {
        let today = date(2024, 3, 20);
        let prev = Week::Previous.window(today).unwrap();
        let cur = Week::Current.window(today).unwrap();
        assert_eq!(prev.start(), date(2024, 3, 5));
        assert_eq!(prev.end(), cur.start());
        assert_eq!(cur.end(), date(2024, 3, 19));
    }

    #[test]
    fn fractional_values_keep_decimals() {
        let s = serde_json::to_string(&ComparisonEntry { week: 0, value: 1.5 }).unwrap();
        assert_eq!(s, r#"{"week":0,"value":1.5}"#);
    }
}
