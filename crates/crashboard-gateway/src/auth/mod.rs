//! Service-account authentication for the reporting API.
//!
//! A credential file is loaded once at startup; the resulting token source
//! hands out bearer tokens and refreshes them shortly before they expire.

pub mod credentials;
pub mod token;

pub use credentials::ServiceAccountKey;
pub use token::{ServiceAccountTokenSource, StaticTokenSource, TokenSource};

/// The only scope this service ever asks for.
pub const REPORTING_SCOPE: &str = "https://www.googleapis.com/auth/playdeveloperreporting";
