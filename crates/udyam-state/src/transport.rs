//! # Submission Transport
//!
//! The seam through which a fully validated answer set leaves the wizard.
//! Implementations live in `udyam-client` (HTTP and an in-process mock).
//!
//! A transport never validates the wizard's rules; it relays the remote
//! endpoint's verdict. Remote rejections carry the endpoint's first
//! `detail[0].msg`, or the generic fallback when the body has none.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use udyam_core::AnswerSet;

/// Banner text when a rejection carries no usable message.
pub const FALLBACK_REJECTION_MESSAGE: &str = "Submission failed.";

/// Banner text when the endpoint could not be reached or did not answer.
pub const FALLBACK_FAILURE_MESSAGE: &str =
    "An error occurred during submission. Please try again.";

/// Successful submission acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Message shown to the applicant.
    pub message: String,
    /// Registration identifier assigned by the endpoint, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

/// Why a submission did not succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The endpoint answered with a non-2xx status.
    #[error("submission rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// First `detail[0].msg`, or [`FALLBACK_REJECTION_MESSAGE`].
        message: String,
    },

    /// The endpoint could not be reached or the response was unreadable.
    #[error("submission endpoint unreachable: {0}")]
    Unreachable(String),

    /// No answer within the configured submission timeout.
    #[error("submission timed out after {elapsed_ms} ms")]
    Timeout {
        /// Time waited.
        elapsed_ms: u64,
    },
}

impl TransportError {
    /// Text for the failure banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Unreachable(_) | Self::Timeout { .. } => FALLBACK_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Posts a validated answer set to the registration endpoint.
pub trait SubmissionTransport: Send + Sync {
    /// Submit the answers. Called only after full-form validation is clean.
    fn submit(
        &self,
        answers: &AnswerSet,
    ) -> impl Future<Output = Result<SubmissionReceipt, TransportError>> + Send;

    /// Human-readable name of the implementation, for logs.
    fn transport_name(&self) -> &str;
}
