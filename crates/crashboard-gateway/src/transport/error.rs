use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crashboard_core::error::CrashboardError;

/// Handler error: every failure is a 500 with the error text as a plain-text body.
#[derive(Debug)]
pub struct ApiError(pub CrashboardError);

impl From<CrashboardError> for ApiError {
    fn from(e: CrashboardError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code().as_str();
        tracing::error!(code, error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.0.to_string(),
        )
            .into_response()
    }
}
