//! Time-bucketed metric rows as returned by the reporting API.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{CrashboardError, Result};

/// One time bucket: its start date plus named decimal values, kept as the
/// decimal strings the API sends.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub period_start: NaiveDate,
    pub metrics: BTreeMap<String, String>,
}

impl MetricRow {
    pub fn new(period_start: NaiveDate) -> Self {
        Self { period_start, metrics: BTreeMap::new() }
    }

    /// Builder-style insert, mostly for fixtures.
    pub fn with(mut self, metric: impl Into<String>, value: impl Into<String>) -> Self {
        self.metrics.insert(metric.into(), value.into());
        self
    }

    pub fn decimal(&self, metric: &str) -> Option<&str> {
        self.metrics.get(metric).map(String::as_str)
    }

    /// Value of `metric` as a percentage (decimal × 100), unrounded.
    /// `Ok(None)` when the row does not carry the metric.
    pub fn percent(&self, metric: &str) -> Result<Option<f64>> {
        self.decimal(metric).map(|raw| parse_percent(metric, raw)).transpose()
    }
}

/// Sort rows by period start. Stable, so equal dates keep API order.
pub fn sort_by_period(rows: &mut [MetricRow]) {
    rows.sort_by_key(|r| r.period_start);
}

/// Parse a decimal string ("0.0123") into a percentage (1.23).
pub fn parse_percent(metric: &str, raw: &str) -> Result<f64> {
    let invalid = || CrashboardError::InvalidMetric {
        metric: metric.to_string(),
        value: raw.to_string(),
    };
    let v: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !v.is_finite() {
        return Err(invalid());
    }
    Ok(v * 100.0)
}

/// Round to the value shown by a `{:.2}` label, so plotted points and their
/// labels never disagree (ties go to even on the exact binary value).
pub fn round2(v: f64) -> f64 {
    format!("{v:.2}").parse().unwrap_or(v)
}
