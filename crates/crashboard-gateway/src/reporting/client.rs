use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crashboard_core::error::{CrashboardError, Result};
use crashboard_core::{MetricRow, TimeWindow};

use crate::auth::TokenSource;
use crate::obs::metrics::ServiceMetrics;

use super::wire::{ErrorEnvelope, QueryRequest, QueryResponse};
use super::ReportingApi;

/// Guard against a server that never stops handing out page tokens.
const MAX_PAGES: usize = 100;

/// HTTP client for `POST {base}/v1beta1/{project}/{metric_set}:query`.
pub struct ReportingClient {
    http: reqwest::Client,
    base_url: String,
    project: String,
    tokens: Arc<dyn TokenSource>,
    metrics: Option<Arc<ServiceMetrics>>,
}

impl ReportingClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        project: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            project: project.into(),
            tokens,
            metrics: None,
        }
    }

    /// Record query outcomes and latency.
    pub fn with_metrics(mut self, metrics: Arc<ServiceMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn endpoint(&self, metric_set: &str) -> String {
        format!("{}/v1beta1/{}/{}:query", self.base_url, self.project, metric_set)
    }

    async fn page(&self, url: &str, body: &QueryRequest<'_>) -> Result<QueryResponse> {
        let token = self.tokens.token().await?;
        let resp = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| CrashboardError::Upstream(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|env| match env.error.status {
                    Some(s) => format!("{s}: {}", env.error.message),
                    None => env.error.message,
                })
                .unwrap_or(text);
            return Err(CrashboardError::Upstream(format!("{url} returned {status}: {detail}")));
        }

        resp.json()
            .await
            .map_err(|e| CrashboardError::MalformedResponse(format!("decode query response: {e}")))
    }

    async fn query_all(&self, metric_set: &str, window: &TimeWindow, metric: &str) -> Result<Vec<MetricRow>> {
        let url = self.endpoint(metric_set);
        let mut body = QueryRequest { timeline_spec: window.into(), metrics: vec![metric], page_token: None };
        let mut rows = Vec::new();

        for page in 1..=MAX_PAGES {
            let resp = self.page(&url, &body).await?;
            for row in resp.rows {
                rows.push(row.into_metric_row()?);
            }
            match resp.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => body.page_token = Some(next),
                None => {
                    tracing::debug!(metric_set, metric, %window, rows = rows.len(), pages = page, "query complete");
                    return Ok(rows);
                }
            }
        }
        Err(CrashboardError::MalformedResponse(format!(
            "{metric_set} query did not finish within {MAX_PAGES} pages"
        )))
    }

    fn record(&self, metric_set: &str, ok: bool, elapsed: Duration) {
        if let Some(m) = &self.metrics {
            let outcome = if ok { "ok" } else { "error" };
            m.upstream_queries.inc(&[("metric_set", metric_set), ("outcome", outcome)]);
            m.upstream_duration.observe(&[("metric_set", metric_set)], elapsed);
        }
    }
}

#[async_trait]
impl ReportingApi for ReportingClient {
    async fn query(&self, metric_set: &str, window: &TimeWindow, metric: &str) -> Result<Vec<MetricRow>> {
        let started = Instant::now();
        let result = self.query_all(metric_set, window, metric).await;
        self.record(metric_set, result.is_ok(), started.elapsed());
        result
    }
}
