//! Bearer token sources.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crashboard_core::error::{CrashboardError, Result};

use super::ServiceAccountKey;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the server-side expiry.
const EXPIRY_SKEW: Duration = Duration::from_secs(60);
/// Upper bound on how long a token is trusted, whatever `expires_in` says.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 3600);

/// Produces bearer tokens for outbound API calls.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token(&self) -> Result<String>;
}

/// Fixed token, never refreshed.
pub struct StaticTokenSource(String);

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Two-legged OAuth: sign a JWT assertion with the service-account key and
/// trade it for an access token. The token is cached until shortly before
/// it expires.
pub struct ServiceAccountTokenSource {
    http: reqwest::Client,
    email: String,
    key_id: Option<String>,
    token_uri: String,
    scope: String,
    signing_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    pub fn new(http: reqwest::Client, key: &ServiceAccountKey, scope: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http,
            email: key.client_email.clone(),
            key_id: key.private_key_id.clone(),
            token_uri: key.token_uri().to_string(),
            scope: scope.into(),
            signing_key: key.encoding_key()?,
            cached: Mutex::new(None),
        })
    }

    fn assertion(&self) -> Result<String> {
        let iat = chrono::Utc::now().timestamp();
        let claims = Claims {
            iss: &self.email,
            scope: &self.scope,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();
        jsonwebtoken::encode(&header, &claims, &self.signing_key)
            .map_err(|e| CrashboardError::Auth(format!("sign assertion: {e}")))
    }

    async fn fetch(&self) -> Result<CachedToken> {
        let assertion = self.assertion()?;
        let resp = self
            .http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| CrashboardError::Auth(format!("token request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CrashboardError::Auth(format!("token endpoint returned {status}: {body}")));
        }
        let tok: TokenResponse = resp
            .json()
            .await
            .map_err(|e| CrashboardError::Auth(format!("invalid token response: {e}")))?;

        let lifetime = Duration::from_secs(tok.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS as u64))
            .min(MAX_TOKEN_LIFETIME);
        tracing::info!(email = %self.email, expires_in_s = lifetime.as_secs(), "access token refreshed");
        let now = Instant::now();
        Ok(CachedToken {
            value: tok.access_token,
            refresh_at: now.checked_add(lifetime.saturating_sub(EXPIRY_SKEW)).unwrap_or(now),
        })
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokenSource {
    async fn token(&self) -> Result<String> {
        // Held across the fetch so concurrent requests share one refresh.
        let mut cached = self.cached.lock().await;
        if let Some(tok) = cached.as_ref().filter(|t| Instant::now() < t.refresh_at) {
            return Ok(tok.value.clone());
        }
        let fresh = self.fetch().await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }
}
