use chrono::NaiveDate;

use crashboard_core::error::Result;
use crashboard_core::report::{trend, TrendPoint, CRASH_RATE, CRASH_RATE_METRIC_SET};
use crashboard_core::TimeWindow;

use crate::reporting::ReportingApi;

/// Daily crash rate over the previous week, one point per day.
pub async fn build(api: &dyn ReportingApi, today: NaiveDate) -> Result<(TimeWindow, Vec<TrendPoint>)> {
    let window = trend::window(today)?;
    let rows = api.query(CRASH_RATE_METRIC_SET, &window, CRASH_RATE).await?;
    let points = trend::points(rows, CRASH_RATE)?;
    for p in &points {
        tracing::debug!(date = %p.date_label(), crash_rate = %p.percent_label(), "trend point");
    }
    Ok((window, points))
}
