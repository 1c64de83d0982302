//! Trend report: one (date, percentage) point per daily row.

use chrono::{NaiveDate, NaiveTime};

use crate::error::{CrashboardError, Result};
use crate::metric::{round2, sort_by_period, MetricRow};
use crate::window::TimeWindow;

/// Days back from today: `[today - 8, today - 1]`.
pub const WINDOW_OFFSETS: (u64, u64) = (8, 1);

pub fn window(today: NaiveDate) -> Result<TimeWindow> {
    TimeWindow::trailing(today, WINDOW_OFFSETS.0, WINDOW_OFFSETS.1)
}

/// A plotted point. `value` is already rounded to the two decimals shown in
/// [`TrendPoint::percent_label`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl TrendPoint {
    /// Unix seconds at midnight of `date`, the chart's x coordinate.
    pub fn timestamp(&self) -> i64 {
        self.date.and_time(NaiveTime::MIN).and_utc().timestamp()
    }

    /// `DD/MM/YYYY`.
    pub fn date_label(&self) -> String {
        format_date(self.date)
    }

    /// e.g. `1.23%`.
    pub fn percent_label(&self) -> String {
        format!("{:.2}%", self.value)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Convert rows into points ordered by period start. Every row must carry
/// `metric` with a numeric value; otherwise the whole report fails.
pub fn points(mut rows: Vec<MetricRow>, metric: &str) -> Result<Vec<TrendPoint>> {
    sort_by_period(&mut rows);
    rows.iter()
        .map(|row| {
            let pct = row.percent(metric)?.ok_or_else(|| CrashboardError::MissingMetric {
                metric: metric.to_string(),
                period: row.period_start.to_string(),
            })?;
            Ok(TrendPoint { date: row.period_start, value: round2(pct) })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn labels_match_display_format() {
        let p = TrendPoint { date: date(2024, 3, 5), value: 1.23 };
        assert_eq!(p.date_label(), "05/03/2024");
        assert_eq!(p.percent_label(), "1.23%");
    }

    #[test]
    fn timestamp_is_utc_midnight() {
        let p = TrendPoint { date: date(1970, 1, 2), value: 0.0 };
        assert_eq!(p.timestamp(), 86_400);
    }

    #[test]
    fn rows_are_reordered_by_date() {
        let rows = vec![
            MetricRow::new(date(2024, 3, 6)).with("crashRate", "0.02"),
            MetricRow::new(date(2024, 3, 5)).with("crashRate", "0.01"),
        ];
        let pts = points(rows, "crashRate").unwrap();
        assert_eq!(pts[0].date, date(2024, 3, 5));
        assert_eq!(pts[1].value, 2.0);
    }

    #[test]
    fn missing_metric_fails() {
        let rows = vec![MetricRow::new(date(2024, 3, 5)).with("other", "0.02")];
        let err = points(rows, "crashRate").unwrap_err();
        assert_eq!(err.client_code().as_str(), "MISSING_METRIC");
    }

    #[test]
    fn window_is_previous_seven_days() {
        let w = window(date(2024, 3, 10)).unwrap();
        assert_eq!(w.start(), date(2024, 3, 2));
        assert_eq!(w.end(), date(2024, 3, 9));
    }
}
