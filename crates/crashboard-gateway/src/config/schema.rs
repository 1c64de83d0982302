use std::net::SocketAddr;

use chrono_tz::Tz;
use serde::Deserialize;
use crashboard_core::error::{CrashboardError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub reporting: ReportingSection,

    #[serde(default)]
    pub chart: ChartSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.reporting.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            CrashboardError::Config(format!("server.listen {:?} is not a socket address: {e}", self.listen))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportingSection {
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,

    /// Play Console app resource, e.g. `apps/com.example.game`.
    #[serde(default = "default_project")]
    pub project: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// IANA zone that decides what "today" is.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
}

impl Default for ReportingSection {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
            project: default_project(),
            api_base_url: default_api_base_url(),
            timezone: default_timezone(),
            http_timeout_ms: default_http_timeout_ms(),
        }
    }
}

impl ReportingSection {
    pub fn validate(&self) -> Result<()> {
        if self.credentials_path.trim().is_empty() {
            return Err(CrashboardError::Config("reporting.credentials_path must not be empty".into()));
        }
        match self.project.strip_prefix("apps/") {
            Some(pkg) if !pkg.is_empty() && !pkg.contains('/') => {}
            _ => {
                return Err(CrashboardError::Config(format!(
                    "reporting.project must look like apps/<package>, got {:?}",
                    self.project
                )))
            }
        }
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(CrashboardError::Config("reporting.api_base_url must be an http(s) url".into()));
        }
        if !(1000..=300000).contains(&self.http_timeout_ms) {
            return Err(CrashboardError::Config(
                "reporting.http_timeout_ms must be between 1000 and 300000".into(),
            ));
        }
        self.tz()?;
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|e| CrashboardError::Config(format!("reporting.timezone: {e}")))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartSection {
    /// Every rendered PNG is also written here. `null` disables the copy.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: Option<String>,

    /// TrueType font for title and axis labels. Without one the chart has no text.
    #[serde(default = "default_font_path")]
    pub font_path: Option<String>,
}

impl Default for ChartSection {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            font_path: default_font_path(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_credentials_path() -> String {
    "./service-account.json".into()
}
fn default_project() -> String {
    "apps/level.game".into()
}
fn default_api_base_url() -> String {
    "https://playdeveloperreporting.googleapis.com".into()
}
fn default_timezone() -> String {
    "UTC".into()
}
fn default_http_timeout_ms() -> u64 {
    30000
}
fn default_snapshot_path() -> Option<String> {
    Some("crash_rate_plot.png".into())
}
fn default_font_path() -> Option<String> {
    Some("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".into())
}
