//! Client errors for calls outside the submission transport seam.
//!
//! Submission failures are reported as `udyam_state::TransportError`; this
//! type covers client construction, PAN pre-verification and pincode
//! lookups over HTTP.

use udyam_core::FieldId;

use crate::config::ConfigError;

/// Errors from the HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or timed out.
    #[error("HTTP request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-2xx status.
    #[error("{endpoint} returned {status}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("failed to read {endpoint} response: {source}")]
    Deserialization {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// A field needed to build the request has no answer.
    #[error("missing answer for {0}")]
    MissingAnswer(FieldId),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
