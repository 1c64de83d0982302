//! Shared error type across crashboard crates.

use thiserror::Error;

/// Stable error codes, logged alongside every failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid or inconsistent configuration.
    Config,
    /// Service-account credential could not be loaded.
    Credentials,
    /// Token exchange failed.
    AuthFailed,
    /// Reporting API returned an error or was unreachable.
    Upstream,
    /// Reporting API answered with something we cannot decode.
    BadUpstreamResponse,
    /// A metric value is not a decimal number.
    InvalidMetric,
    /// A row does not carry the requested metric.
    MissingMetric,
    /// Chart rendering or PNG encoding failed.
    Render,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::Config => "CONFIG",
            ClientCode::Credentials => "CREDENTIALS",
            ClientCode::AuthFailed => "AUTH_FAILED",
            ClientCode::Upstream => "UPSTREAM",
            ClientCode::BadUpstreamResponse => "BAD_UPSTREAM_RESPONSE",
            ClientCode::InvalidMetric => "INVALID_METRIC",
            ClientCode::MissingMetric => "MISSING_METRIC",
            ClientCode::Render => "RENDER",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CrashboardError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum CrashboardError {
    #[error("config: {0}")]
    Config(String),
    #[error("credentials: {0}")]
    Credentials(String),
    #[error("auth failed: {0}")]
    Auth(String),
    #[error("upstream: {0}")]
    Upstream(String),
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
    #[error("invalid value for metric {metric}: {value:?}")]
    InvalidMetric { metric: String, value: String },
    #[error("row for {period} has no metric {metric}")]
    MissingMetric { metric: String, period: String },
    #[error("render: {0}")]
    Render(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl CrashboardError {
    /// Map an error to its stable code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            CrashboardError::Config(_) => ClientCode::Config,
            CrashboardError::Credentials(_) => ClientCode::Credentials,
            CrashboardError::Auth(_) => ClientCode::AuthFailed,
            CrashboardError::Upstream(_) => ClientCode::Upstream,
            CrashboardError::MalformedResponse(_) => ClientCode::BadUpstreamResponse,
            CrashboardError::InvalidMetric { .. } => ClientCode::InvalidMetric,
            CrashboardError::MissingMetric { .. } => ClientCode::MissingMetric,
            CrashboardError::Render(_) => ClientCode::Render,
            CrashboardError::Internal(_) => ClientCode::Internal,
        }
    }
}
