//! Report endpoints.
//!
//! - `GET /get-crashes`        : PNG line chart of the daily crash rate
//! - `GET /movingavg/crashes`  : JSON week-over-week user-weighted crash rate

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crashboard_core::error::{CrashboardError, Result};

use crate::app_state::AppState;
use crate::reports;
use crate::transport::ApiError;

pub async fn get_crashes(State(app): State<AppState>) -> std::result::Result<Response, ApiError> {
    let result = render_trend(&app).await;
    app.record_report("trend", result.is_ok());
    let png = result?;
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "image/png")], png).into_response())
}

async fn render_trend(app: &AppState) -> Result<Vec<u8>> {
    let (window, points) = reports::trend::build(app.reporting().as_ref(), app.today()).await?;
    let png = app.chart().render_png(&window, &points)?;
    if let Some(path) = app.cfg().chart.snapshot_path.as_deref() {
        tokio::fs::write(path, &png)
            .await
            .map_err(|e| CrashboardError::Internal(format!("write chart snapshot {path}: {e}")))?;
    }
    tracing::info!(%window, points = points.len(), bytes = png.len(), "trend chart rendered");
    Ok(png)
}

pub async fn weekly_comparison(State(app): State<AppState>) -> std::result::Result<Response, ApiError> {
    let result = reports::comparison::build(app.reporting().as_ref(), app.today()).await;
    app.record_report("comparison", result.is_ok());
    Ok(Json(result?).into_response())
}
