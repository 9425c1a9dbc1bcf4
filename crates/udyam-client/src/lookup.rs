//! Pincode lookup implementations.
//!
//! - [`HttpLookupService`]: `GET {pincode_url}/pincode/{code}`, 404 → not found.
//! - [`StaticLookupService`]: in-process table, used when no pincode service
//!   is configured.
//! - [`PincodeLookup`]: either of the two, chosen from [`ClientConfig`].

use serde::Deserialize;
use url::Url;

use udyam_core::Pincode;
use udyam_state::{Locality, LookupError, LookupService};

use crate::config::{endpoint_url, ClientConfig};
use crate::error::ClientError;

/// Response body of the pincode service. Accepts both the `city`/`state`
/// and `locality`/`region` spellings.
#[derive(Debug, Deserialize)]
struct PincodeRecord {
    #[serde(alias = "locality")]
    city: String,
    #[serde(alias = "region")]
    state: String,
}

impl From<PincodeRecord> for Locality {
    fn from(r: PincodeRecord) -> Self {
        Locality {
            locality: r.city,
            region: r.state,
        }
    }
}

// -- HTTP --------------------------------------------------------------------

/// Pincode lookup over HTTP.
#[derive(Debug, Clone)]
pub struct HttpLookupService {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpLookupService {
    /// Create a lookup client against `base_url`.
    pub fn new(config: &ClientConfig, base_url: Url) -> Result<Self, ClientError> {
        Ok(Self {
            http: config.http_client()?,
            base_url,
        })
    }
}

impl LookupService for HttpLookupService {
    async fn lookup(&self, code: &Pincode) -> Result<Option<Locality>, LookupError> {
        let url = endpoint_url(&self.base_url, &format!("pincode/{code}"));

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !resp.status().is_success() {
            return Err(LookupError::Unavailable(format!(
                "pincode service returned {}",
                resp.status().as_u16()
            )));
        }

        resp.json::<PincodeRecord>()
            .await
            .map(|r| Some(r.into()))
            .map_err(|e| LookupError::Unavailable(format!("unreadable response: {e}")))
    }

    fn service_name(&self) -> &str {
        "HttpLookupService"
    }
}

// -- Static table ------------------------------------------------------------

const STANDARD_TABLE: &[(&str, &str, &str)] = &[
    ("110001", "New Delhi", "Delhi"),
    ("400001", "Mumbai", "Maharashtra"),
    ("700001", "Kolkata", "West Bengal"),
];

/// In-process pincode table.
#[derive(Debug, Clone)]
pub struct StaticLookupService {
    entries: Vec<(String, Locality)>,
}

impl Default for StaticLookupService {
    fn default() -> Self {
        Self::standard()
    }
}

impl StaticLookupService {
    /// The three metro head-office codes.
    pub fn standard() -> Self {
        Self {
            entries: STANDARD_TABLE
                .iter()
                .map(|(code, city, state)| {
                    (
                        code.to_string(),
                        Locality {
                            locality: city.to_string(),
                            region: state.to_string(),
                        },
                    )
                })
                .collect(),
        }
    }

    /// Add or replace an entry.
    pub fn with_entry(mut self, code: &Pincode, locality: Locality) -> Self {
        self.entries.retain(|(c, _)| c != code.as_str());
        self.entries.push((code.as_str().to_string(), locality));
        self
    }

    fn find(&self, code: &Pincode) -> Option<Locality> {
        self.entries
            .iter()
            .find(|(c, _)| c == code.as_str())
            .map(|(_, l)| l.clone())
    }
}

impl LookupService for StaticLookupService {
    async fn lookup(&self, code: &Pincode) -> Result<Option<Locality>, LookupError> {
        Ok(self.find(code))
    }

    fn service_name(&self) -> &str {
        "StaticLookupService"
    }
}

// -- Selection ---------------------------------------------------------------

/// The lookup service selected by configuration.
#[derive(Debug, Clone)]
pub enum PincodeLookup {
    Http(HttpLookupService),
    Static(StaticLookupService),
}

impl PincodeLookup {
    /// HTTP when `pincode_url` is configured, the static table otherwise.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        match &config.pincode_url {
            Some(url) => Ok(Self::Http(HttpLookupService::new(config, url.clone())?)),
            None => Ok(Self::Static(StaticLookupService::standard())),
        }
    }
}

impl LookupService for PincodeLookup {
    async fn lookup(&self, code: &Pincode) -> Result<Option<Locality>, LookupError> {
        match self {
            Self::Http(s) => s.lookup(code).await,
            Self::Static(s) => s.lookup(code).await,
        }
    }

    fn service_name(&self) -> &str {
        match self {
            Self::Http(s) => s.service_name(),
            Self::Static(s) => s.service_name(),
        }
    }
}
