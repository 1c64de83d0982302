//! Gateway config loader (strict parsing + env overrides).
//!
//! Precedence: built-in defaults, then the YAML file, then `CRASHBOARD_*`
//! environment variables.

pub mod schema;

use std::fs;
use std::path::Path;

use crashboard_core::error::{CrashboardError, Result};

pub use schema::{ChartSection, GatewayConfig, ReportingSection, ServerSection};

pub const CONFIG_ENV: &str = "CRASHBOARD_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "crashboard.yaml";

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| CrashboardError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    // An empty document is valid and means "all defaults".
    let cfg: GatewayConfig = if s.trim().is_empty() {
        GatewayConfig::default()
    } else {
        serde_yaml::from_str(s).map_err(|e| CrashboardError::Config(format!("invalid yaml: {e}")))?
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Load for the binary: `$CRASHBOARD_CONFIG` (must exist) or `crashboard.yaml`
/// (optional), then apply env overrides.
pub fn load() -> Result<GatewayConfig> {
    let mut cfg = match std::env::var(CONFIG_ENV) {
        Ok(path) => load_from_file(&path)?,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH)?,
        Err(_) => GatewayConfig::default(),
    };
    apply_overrides(&mut cfg, |k| std::env::var(k).ok());
    cfg.validate()?;
    Ok(cfg)
}

/// Apply `CRASHBOARD_*` overrides from `lookup` (env in production).
pub fn apply_overrides(cfg: &mut GatewayConfig, lookup: impl Fn(&str) -> Option<String>) {
    let targets: [(&str, &mut String); 4] = [
        ("CRASHBOARD_LISTEN", &mut cfg.server.listen),
        ("CRASHBOARD_CREDENTIALS", &mut cfg.reporting.credentials_path),
        ("CRASHBOARD_PROJECT", &mut cfg.reporting.project),
        ("CRASHBOARD_TIMEZONE", &mut cfg.reporting.timezone),
    ];
    for (key, slot) in targets {
        if let Some(v) = lookup(key).filter(|v| !v.trim().is_empty()) {
            tracing::debug!(key, "config override from environment");
            *slot = v;
        }
    }
}
