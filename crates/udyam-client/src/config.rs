//! Client configuration.
//!
//! Endpoint base URLs, the optional bearer token, and the request timeout.
//! Defaults point at a registration backend on `localhost:8000`. Override
//! via environment variables or explicit construction.

use std::time::Duration;

use url::Url;
use zeroize::Zeroizing;

use crate::error::ClientError;

/// Default base URL of the registration backend.
pub const DEFAULT_SUBMIT_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the registration backend and pincode service.
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL serving `/submit` and `/validate-pan`.
    pub submit_url: Url,
    /// Base URL serving `/pincode/{code}`. `None` selects the built-in table.
    pub pincode_url: Option<Url>,
    /// Bearer token, sent when present.
    pub api_token: Option<Zeroizing<String>>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("submit_url", &self.submit_url)
            .field("pincode_url", &self.pincode_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `UDYAM_SUBMIT_URL` (default: `http://localhost:8000`)
    /// - `UDYAM_PINCODE_URL` (optional)
    /// - `UDYAM_API_TOKEN` (optional)
    /// - `UDYAM_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            submit_url: env_url("UDYAM_SUBMIT_URL", DEFAULT_SUBMIT_URL)?,
            pincode_url: env_opt_url("UDYAM_PINCODE_URL")?,
            api_token: std::env::var("UDYAM_API_TOKEN")
                .ok()
                .filter(|t| !t.is_empty())
                .map(Zeroizing::new),
            timeout_secs: std::env::var("UDYAM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Configuration pointing at a single base URL, with no pincode service
    /// and no token.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base` does not parse.
    pub fn for_base_url(base: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            submit_url: parse_url("submit_url", base)?,
            pincode_url: None,
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the shared HTTP client: timeout plus bearer header when a token
    /// is configured.
    pub(crate) fn http_client(&self) -> Result<reqwest::Client, ClientError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = &self.api_token {
            let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|_| ClientError::Config(ConfigError::InvalidToken))?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }
        reqwest::Client::builder()
            .timeout(self.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })
    }
}

/// `{base}/{path}` with exactly one slash between them.
pub(crate) fn endpoint_url(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn parse_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(name.to_string(), e.to_string()))
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    parse_url(var, &raw)
}

fn env_opt_url(var: &str) -> Result<Option<Url>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => parse_url(var, &raw).map(Some),
        _ => Ok(None),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("UDYAM_API_TOKEN contains characters not allowed in an HTTP header")]
    InvalidToken,
}
