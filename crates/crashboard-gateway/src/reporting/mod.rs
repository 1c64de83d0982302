//! Metrics client for the Play Developer Reporting API.
//!
//! `ReportingApi` is the seam reports depend on; `ReportingClient` is the
//! HTTP implementation.

pub mod client;
pub mod wire;

use async_trait::async_trait;

use crashboard_core::error::Result;
use crashboard_core::{MetricRow, TimeWindow};

pub use client::ReportingClient;

#[async_trait]
pub trait ReportingApi: Send + Sync {
    /// Query `metric` from `metric_set` over `window`. Rows come back in
    /// whatever order the API chose.
    async fn query(&self, metric_set: &str, window: &TimeWindow, metric: &str) -> Result<Vec<MetricRow>>;
}
