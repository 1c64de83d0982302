//! Request/response bodies of the `:query` endpoint (camelCase JSON).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crashboard_core::error::{CrashboardError, Result};
use crashboard_core::{MetricRow, TimeWindow};

/// Calendar date without time or zone (`google.type.DateTime` subset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl From<NaiveDate> for DateTime {
    fn from(d: NaiveDate) -> Self {
        Self { year: d.year(), month: d.month(), day: d.day() }
    }
}

impl DateTime {
    pub fn to_date(self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or_else(|| {
            CrashboardError::MalformedResponse(format!(
                "invalid date {}-{}-{}",
                self.year, self.month, self.day
            ))
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSpec {
    pub aggregation_period: &'static str,
    pub start_time: DateTime,
    pub end_time: DateTime,
}

impl From<&TimeWindow> for TimelineSpec {
    fn from(w: &TimeWindow) -> Self {
        Self {
            aggregation_period: w.granularity().as_str(),
            start_time: w.start().into(),
            end_time: w.end().into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest<'a> {
    pub timeline_spec: TimelineSpec,
    pub metrics: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub start_time: DateTime,
    #[serde(default)]
    pub metrics: Vec<MetricValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
    pub metric: String,
    #[serde(default)]
    pub decimal_value: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct Decimal {
    pub value: String,
}

impl Row {
    /// Metrics without a decimal value (e.g. confidence intervals only) are dropped.
    pub fn into_metric_row(self) -> Result<MetricRow> {
        let mut row = MetricRow::new(self.start_time.to_date()?);
        for m in self.metrics {
            if let Some(d) = m.decimal_value {
                row.metrics.insert(m.metric, d.value);
            }
        }
        Ok(row)
    }
}

/// `{"error": {"code": 403, "message": "...", "status": "PERMISSION_DENIED"}}`
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crashboard_core::Granularity;

    #[test]
    fn request_body_shape() {
        let w = TimeWindow::new(
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            Granularity::Daily,
        )
        .unwrap();
        let body = QueryRequest { timeline_spec: (&w).into(), metrics: vec!["crashRate"], page_token: None };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "timelineSpec": {
                    "aggregationPeriod": "DAILY",
                    "startTime": {"year": 2024, "month": 3, "day": 2},
                    "endTime": {"year": 2024, "month": 3, "day": 9}
                },
                "metrics": ["crashRate"]
            })
        );
    }

    #[test]
    fn row_conversion_keeps_decimal_metrics() {
        let resp: QueryResponse = serde_json::from_value(serde_json::json!({
            "rows": [{
                "aggregationPeriod": "DAILY",
                "startTime": {"year": 2024, "month": 3, "day": 5, "timeZone": {"id": "America/Los_Angeles"}},
                "metrics": [
                    {"metric": "crashRate", "decimalValue": {"value": "0.0123"}},
                    {"metric": "crashRate7dUserWeighted"}
                ]
            }]
        }))
        .unwrap();
        let row = resp.rows.into_iter().next().unwrap().into_metric_row().unwrap();
        assert_eq!(row.period_start, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(row.decimal("crashRate"), Some("0.0123"));
        assert_eq!(row.metrics.len(), 1);
    }

    #[test]
    fn impossible_date_is_malformed() {
        let err = DateTime { year: 2024, month: 2, day: 30 }.to_date().unwrap_err();
        assert_eq!(err.client_code().as_str(), "BAD_UPSTREAM_RESPONSE");
    }
}
