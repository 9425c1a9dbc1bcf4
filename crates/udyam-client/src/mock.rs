//! In-process stand-in for the registration endpoint.
//!
//! Applies the endpoint's own Aadhaar rules (Verhoeff checksum, no leading
//! `0` or `1`) and its uniqueness constraint on Aadhaar numbers, and answers
//! in the endpoint's wire shapes. Used for offline sessions and tests of the
//! failure path.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use serde_json::{json, Value};

use udyam_core::{verhoeff, AnswerSet, FieldId};
use udyam_state::{SubmissionReceipt, SubmissionTransport, TransportError};

use crate::submission::rejection_message;

/// Success message of the registration endpoint.
pub const ACCEPTED_MESSAGE: &str = "Form submitted successfully!";

/// Offline submission transport.
#[derive(Debug, Default)]
pub struct MockSubmissionTransport {
    next_id: AtomicI64,
    registered: Mutex<BTreeSet<String>>,
}

impl MockSubmissionTransport {
    /// A transport with no prior registrations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accepted submissions.
    pub fn accepted(&self) -> usize {
        self.registered.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn reject(status: u16, body: Value) -> TransportError {
        TransportError::Rejected {
            status,
            message: rejection_message(&body),
        }
    }
}

fn field_error(field: FieldId, msg: &str) -> Value {
    json!({
        "detail": [{
            "loc": ["body", field.wire_key()],
            "msg": msg,
            "type": "value_error",
        }]
    })
}

impl SubmissionTransport for MockSubmissionTransport {
    async fn submit(&self, answers: &AnswerSet) -> Result<SubmissionReceipt, TransportError> {
        let aadhaar = answers.text(FieldId::AadhaarNumber).unwrap_or_default();
        if let Some(msg) = verhoeff::endpoint_rejection(aadhaar) {
            return Err(Self::reject(422, field_error(FieldId::AadhaarNumber, msg)));
        }

        let mut registered = self
            .registered
            .lock()
            .map_err(|_| TransportError::Unreachable("mock registry poisoned".into()))?;
        if !registered.insert(aadhaar.to_string()) {
            // The endpoint's unique index surfaces as a 500 with a string detail.
            return Err(Self::reject(
                500,
                json!({"detail": "Database error: duplicate key value violates unique constraint"}),
            ));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SubmissionReceipt {
            message: ACCEPTED_MESSAGE.to_string(),
            id: Some(id),
        })
    }

    fn transport_name(&self) -> &str {
        "MockSubmissionTransport"
    }
}
