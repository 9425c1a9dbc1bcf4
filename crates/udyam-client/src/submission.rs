//! HTTP submission transport and PAN pre-verification.
//!
//! ## Endpoints
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/submit` | Final registration, body = every wizard field (absent → `null`) |
//! | POST   | `/validate-pan` | PAN pre-verification, body = `{pan, panName, dob, dobType}` |
//!
//! Rejections arrive as `{"detail": [{"msg": "..."}, ...]}`. The first
//! message is surfaced to the applicant; any other body shape falls back to
//! [`FALLBACK_REJECTION_MESSAGE`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use udyam_core::{AnswerSet, FieldId};
use udyam_state::transport::FALLBACK_REJECTION_MESSAGE;
use udyam_state::{SubmissionReceipt, SubmissionTransport, TransportError};

use crate::config::{endpoint_url, ClientConfig};
use crate::error::ClientError;

const SUBMIT_PATH: &str = "submit";
const VALIDATE_PAN_PATH: &str = "validate-pan";

/// The message a rejection body carries for the applicant.
pub fn rejection_message(body: &Value) -> String {
    body.get("detail")
        .and_then(Value::as_array)
        .and_then(|detail| detail.first())
        .and_then(|first| first.get("msg"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_REJECTION_MESSAGE.to_string())
}

// -- PAN pre-verification types ----------------------------------------------

/// Request body for `POST /validate-pan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanVerificationRequest {
    pub pan: String,
    pub pan_name: String,
    pub dob: String,
    pub dob_type: String,
}

impl PanVerificationRequest {
    /// Build the request from the wizard's PAN block.
    ///
    /// # Errors
    ///
    /// [`ClientError::MissingAnswer`] for the first PAN-block field with no
    /// text answer. The DOB/DOI kind is required too; the endpoint has no
    /// default for it.
    pub fn from_answers(answers: &AnswerSet) -> Result<Self, ClientError> {
        let text = |field: FieldId| {
            answers
                .text(field)
                .map(str::to_string)
                .ok_or(ClientError::MissingAnswer(field))
        };
        Ok(Self {
            pan: text(FieldId::Pan)?,
            pan_name: text(FieldId::PanName)?,
            dob: text(FieldId::DateOfBirthOrIncorporation)?,
            dob_type: text(FieldId::DateKind)?,
        })
    }
}

/// Response body of `POST /validate-pan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanVerificationResponse {
    pub is_valid: bool,
    pub message: String,
}

// -- Client ------------------------------------------------------------------

/// Submission transport backed by the registration HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
    timeout_ms: u64,
}

impl HttpTransport {
    /// Create a transport from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            http: config.http_client()?,
            base_url: config.submit_url.clone(),
            timeout_ms: u64::try_from(config.timeout().as_millis()).unwrap_or(u64::MAX),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Pre-verify PAN details.
    ///
    /// Calls `POST {base_url}/validate-pan`. Informational only; the wizard's
    /// gates never consult it.
    pub async fn verify_pan(
        &self,
        req: &PanVerificationRequest,
    ) -> Result<PanVerificationResponse, ClientError> {
        let endpoint = "POST /validate-pan";
        let url = endpoint_url(&self.base_url, VALIDATE_PAN_PATH);

        let resp = self
            .http
            .post(&url)
            .json(req)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.json::<Value>().await.unwrap_or(Value::Null);
            return Err(ClientError::Api {
                endpoint: endpoint.into(),
                status,
                message: rejection_message(&body),
            });
        }

        resp.json().await.map_err(|e| ClientError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })
    }
}

impl SubmissionTransport for HttpTransport {
    /// Calls `POST {base_url}/submit` with every wizard field.
    async fn submit(&self, answers: &AnswerSet) -> Result<SubmissionReceipt, TransportError> {
        let url = endpoint_url(&self.base_url, SUBMIT_PATH);
        let payload = answers.to_submission_json();

        let resp = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout {
                        elapsed_ms: self.timeout_ms,
                    }
                } else {
                    TransportError::Unreachable(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.json::<Value>().await.unwrap_or(Value::Null);
            let message = rejection_message(&body);
            tracing::debug!(status = status.as_u16(), "submission rejected by endpoint");
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<SubmissionReceipt>()
            .await
            .map_err(|e| TransportError::Unreachable(format!("unreadable response: {e}")))
    }

    fn transport_name(&self) -> &str {
        "HttpTransport"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejection_message_uses_first_detail() {
        let body = json!({"detail": [{"msg": "first"}, {"msg": "second"}]});
        assert_eq!(rejection_message(&body), "first");
    }

    #[test]
    fn rejection_message_falls_back() {
        assert_eq!(rejection_message(&json!({"detail": []})), "Submission failed.");
        assert_eq!(
            rejection_message(&json!({"detail": "Database error: duplicate key"})),
            "Submission failed."
        );
        assert_eq!(rejection_message(&Value::Null), "Submission failed.");
    }

    #[test]
    fn pan_request_from_answers() {
        let mut a = AnswerSet::new();
        a.set(FieldId::Pan, "ABCDE1234F");
        a.set(FieldId::PanName, "Acme");
        a.set(FieldId::DateOfBirthOrIncorporation, "15/05/1980");
        assert!(matches!(
            PanVerificationRequest::from_answers(&a),
            Err(ClientError::MissingAnswer(FieldId::DateKind))
        ));
        a.set(FieldId::DateKind, "DOI");
        let req = PanVerificationRequest::from_answers(&a).unwrap();
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            json!({"pan": "ABCDE1234F", "panName": "Acme", "dob": "15/05/1980", "dobType": "DOI"})
        );
    }

    #[test]
    fn pan_request_sends_what_submit_sends() {
        let mut a = AnswerSet::new();
        a.set(FieldId::Pan, " ABCDE1234F");
        a.set(FieldId::PanName, "Acme");
        a.set(FieldId::DateOfBirthOrIncorporation, "15/05/1980");
        a.set(FieldId::DateKind, "DOI");
        let req = PanVerificationRequest::from_answers(&a).unwrap();
        assert_eq!(req.pan, " ABCDE1234F");
        assert_eq!(a.to_submission_json()["pan"], json!(req.pan));
    }
}
