use std::fs;

use jsonwebtoken::EncodingKey;
use serde::Deserialize;

use crashboard_core::error::{CrashboardError, Result};

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The subset of a service-account JSON key we need.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

// Keeps the private key out of logs and panics.
impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let s = fs::read_to_string(path)
            .map_err(|e| CrashboardError::Credentials(format!("read {path} failed: {e}")))?;
        Self::from_json(&s)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let key: ServiceAccountKey = serde_json::from_str(s)
            .map_err(|e| CrashboardError::Credentials(format!("invalid credential json: {e}")))?;
        if key.client_email.trim().is_empty() {
            return Err(CrashboardError::Credentials("client_email is empty".into()));
        }
        // Fail at load rather than on the first request.
        key.encoding_key()?;
        Ok(key)
    }

    pub fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI)
    }

    pub(crate) fn encoding_key(&self) -> Result<EncodingKey> {
        EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| CrashboardError::Credentials(format!("private_key is not an RSA PEM key: {e}")))
    }
}
