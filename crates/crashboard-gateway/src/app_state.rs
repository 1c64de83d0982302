//! Shared application state.
//!
//! Built once at startup from `GatewayConfig` and handed to every handler;
//! nothing in it is mutated per request except counters and the token cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crashboard_core::error::{CrashboardError, Result};

use crate::auth::{ServiceAccountKey, ServiceAccountTokenSource, REPORTING_SCOPE};
use crate::config::GatewayConfig;
use crate::obs::metrics::ServiceMetrics;
use crate::reporting::{ReportingApi, ReportingClient};
use crate::reports::ChartRenderer;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    tz: Tz,
    reporting: Arc<dyn ReportingApi>,
    chart: ChartRenderer,
    metrics: Arc<ServiceMetrics>,
    fixed_today: Option<NaiveDate>,
}

impl AppState {
    /// Load credentials and wire the real reporting client.
    pub fn connect(cfg: GatewayConfig) -> Result<Self> {
        let key = ServiceAccountKey::load_from_file(&cfg.reporting.credentials_path)?;
        tracing::info!(client_email = %key.client_email, "service account loaded");

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.reporting.http_timeout_ms))
            .build()
            .map_err(|e| CrashboardError::Internal(format!("build http client: {e}")))?;
        let tokens = Arc::new(ServiceAccountTokenSource::new(http.clone(), &key, REPORTING_SCOPE)?);

        let metrics = Arc::new(ServiceMetrics::default());
        let reporting = ReportingClient::new(
            http,
            &cfg.reporting.api_base_url,
            cfg.reporting.project.clone(),
            tokens,
        )
        .with_metrics(Arc::clone(&metrics));

        let chart = ChartRenderer::from_config(&cfg.chart);
        Self::build(cfg, Arc::new(reporting), chart, metrics, None)
    }

    /// State over an arbitrary reporting backend.
    pub fn new(cfg: GatewayConfig, reporting: Arc<dyn ReportingApi>, chart: ChartRenderer) -> Result<Self> {
        Self::build(cfg, reporting, chart, Arc::default(), None)
    }

    /// Like [`AppState::new`] with "today" pinned, so report windows are deterministic.
    pub fn with_fixed_today(
        cfg: GatewayConfig,
        reporting: Arc<dyn ReportingApi>,
        chart: ChartRenderer,
        today: NaiveDate,
    ) -> Result<Self> {
        Self::build(cfg, reporting, chart, Arc::default(), Some(today))
    }

    fn build(
        cfg: GatewayConfig,
        reporting: Arc<dyn ReportingApi>,
        chart: ChartRenderer,
        metrics: Arc<ServiceMetrics>,
        fixed_today: Option<NaiveDate>,
    ) -> Result<Self> {
        let tz = cfg.reporting.tz()?;
        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, tz, reporting, chart, metrics, fixed_today }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    /// Current calendar date in the configured report timezone.
    pub fn today(&self) -> NaiveDate {
        self.inner
            .fixed_today
            .unwrap_or_else(|| date_in(self.inner.tz, Utc::now()))
    }

    pub fn timezone(&self) -> Tz {
        self.inner.tz
    }

    pub fn reporting(&self) -> Arc<dyn ReportingApi> {
        Arc::clone(&self.inner.reporting)
    }

    pub fn chart(&self) -> &ChartRenderer {
        &self.inner.chart
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.inner.metrics
    }

    pub fn record_report(&self, report: &str, ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        self.inner.metrics.report_requests.inc(&[("report", report), ("outcome", outcome)]);
    }
}

/// Calendar date of `now` as seen in `tz`.
pub fn date_in(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::reporting::ReportingApi;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use crashboard_core::{MetricRow, TimeWindow};

    struct NoData;

    #[async_trait]
    impl ReportingApi for NoData {
        async fn query(&self, _: &str, _: &TimeWindow, _: &str) -> Result<Vec<MetricRow>> {
            Ok(vec![])
        }
    }

    #[test]
    fn date_follows_configured_zone() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 20, 3, 0, 0).unwrap();
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(date_in(chrono_tz::UTC, instant), d(2024, 3, 20));
        assert_eq!(date_in(chrono_tz::America::Los_Angeles, instant), d(2024, 3, 19));
        assert_eq!(date_in(chrono_tz::Pacific::Kiritimati, Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()), d(2024, 3, 21));
    }

    #[test]
    fn state_uses_timezone_from_config() {
        let mut cfg = GatewayConfig::default();
        cfg.reporting.timezone = "America/Los_Angeles".into();
        let state = AppState::new(cfg, Arc::new(NoData), ChartRenderer::plain()).unwrap();
        assert_eq!(state.timezone(), chrono_tz::America::Los_Angeles);

        let before = date_in(chrono_tz::America::Los_Angeles, Utc::now());
        let today = state.today();
        let after = date_in(chrono_tz::America::Los_Angeles, Utc::now());
        assert!(today == before || today == after);
    }

    #[test]
    fn unknown_timezone_is_config_error() {
        let mut cfg = GatewayConfig::default();
        cfg.reporting.timezone = "Nowhere/Special".into();
        let err = AppState::new(cfg, Arc::new(NoData), ChartRenderer::plain()).err().unwrap();
        assert_eq!(err.client_code().as_str(), "CONFIG");
    }
}
