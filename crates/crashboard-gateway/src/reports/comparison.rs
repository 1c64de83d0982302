use chrono::NaiveDate;

use crashboard_core::error::Result;
use crashboard_core::report::comparison::{self, ComparisonEntry, Week};
use crashboard_core::report::{CRASH_RATE_7D_USER_WEIGHTED, CRASH_RATE_METRIC_SET};

use crate::reporting::ReportingApi;

/// User-weighted 7-day crash rate at the end of the previous and current
/// week, in that order. Windows without data are left out.
pub async fn build(api: &dyn ReportingApi, today: NaiveDate) -> Result<Vec<ComparisonEntry>> {
    let mut entries = Vec::with_capacity(Week::ALL.len());
    for week in Week::ALL {
        let window = week.window(today)?;
        let rows = api
            .query(CRASH_RATE_METRIC_SET, &window, CRASH_RATE_7D_USER_WEIGHTED)
            .await?;
        if let Some(last) = rows.iter().map(|r| r.period_start).max() {
            tracing::info!(week = week.index(), %window, last_period = %last, "comparison window");
        } else {
            tracing::info!(week = week.index(), %window, "no data available for the specified period");
        }
        entries.extend(comparison::entry(week, rows, CRASH_RATE_7D_USER_WEIGHTED)?);
    }
    Ok(entries)
}
