//! # Pincode Lookup
//!
//! Informational locality display for a 6-digit postal code. A lookup
//! never gates progression and never touches the answer set.
//!
//! ## Superseded Requests
//!
//! Every edit takes a new generation number from [`PincodeTracker::edit`].
//! A completed lookup is applied only when its ticket's generation is still
//! the latest, so a slow answer for an old code can never overwrite the
//! display for the code currently typed.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use udyam_core::Pincode;

/// Locality resolved from a pincode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    /// City or district.
    pub locality: String,
    /// State or union territory.
    pub region: String,
}

/// Why a lookup produced no answer. Not-found is not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The service failed or returned an unreadable body.
    #[error("pincode service unavailable: {0}")]
    Unavailable(String),

    /// No answer within the configured lookup timeout.
    #[error("pincode lookup timed out after {elapsed_ms} ms")]
    Timeout {
        /// Time waited.
        elapsed_ms: u64,
    },
}

/// Resolves a pincode to a locality.
pub trait LookupService: Send + Sync {
    /// `Ok(None)` when the code is unknown.
    fn lookup(
        &self,
        code: &Pincode,
    ) -> impl Future<Output = Result<Option<Locality>, LookupError>> + Send;

    /// Human-readable name of the implementation, for logs.
    fn service_name(&self) -> &str;
}

/// Run one lookup, failing soft after `timeout`.
pub async fn lookup_with_timeout<S: LookupService>(
    service: &S,
    code: &Pincode,
    timeout: Duration,
) -> Result<Option<Locality>, LookupError> {
    match tokio::time::timeout(timeout, service.lookup(code)).await {
        Ok(result) => result,
        Err(_) => Err(LookupError::Timeout {
            elapsed_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

// ─── Tracker ─────────────────────────────────────────────────────────

/// What the renderer shows next to the pincode input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PincodeDisplay {
    /// No complete code entered.
    Empty,
    /// Lookup in flight.
    Loading {
        /// The code being looked up.
        code: String,
    },
    /// Lookup resolved.
    Found(Locality),
    /// The service does not know the code.
    NotFound,
    /// Lookup failed; the message is informational only.
    Failed {
        /// Failure text.
        message: String,
    },
}

/// Handle for one issued lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    /// Generation at issue time.
    pub generation: u64,
    /// The code to look up.
    pub code: Pincode,
}

/// Generation-counted pincode display state.
#[derive(Debug, Clone)]
pub struct PincodeTracker {
    generation: u64,
    input: String,
    display: PincodeDisplay,
}

impl Default for PincodeTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PincodeTracker {
    /// Tracker with nothing entered.
    pub fn new() -> Self {
        Self {
            generation: 0,
            input: String::new(),
            display: PincodeDisplay::Empty,
        }
    }

    /// Record an edit of the pincode input.
    ///
    /// Returns a ticket when the input is exactly six digits and a lookup
    /// should be issued. Anything else clears the display without a call.
    pub fn edit(&mut self, raw: &str) -> Option<LookupTicket> {
        self.generation += 1;
        self.input = raw.to_string();
        match Pincode::new(raw) {
            Ok(code) => {
                self.display = PincodeDisplay::Loading {
                    code: code.as_str().to_string(),
                };
                Some(LookupTicket {
                    generation: self.generation,
                    code,
                })
            }
            Err(_) => {
                self.display = PincodeDisplay::Empty;
                None
            }
        }
    }

    /// Apply a completed lookup. Returns `false` if the ticket was
    /// superseded and the result discarded.
    pub fn complete(
        &mut self,
        ticket: &LookupTicket,
        result: Result<Option<Locality>, LookupError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                latest = self.generation,
                "discarding stale pincode lookup"
            );
            return false;
        }
        self.display = match result {
            Ok(Some(locality)) => PincodeDisplay::Found(locality),
            Ok(None) => PincodeDisplay::NotFound,
            Err(e) => {
                tracing::warn!(error = %e, "pincode lookup failed");
                PincodeDisplay::Failed {
                    message: e.to_string(),
                }
            }
        };
        true
    }

    /// Latest generation issued.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The raw input as last edited.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Current display state.
    pub fn display(&self) -> &PincodeDisplay {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delhi() -> Locality {
        Locality {
            locality: "New Delhi".into(),
            region: "Delhi".into(),
        }
    }

    #[test]
    fn test_incomplete_code_clears_without_ticket() {
        let mut t = PincodeTracker::new();
        assert!(t.edit("11000").is_none());
        assert_eq!(t.display(), &PincodeDisplay::Empty);
        assert!(t.edit("11000a").is_none());
        assert_eq!(t.generation(), 2);
    }

    #[test]
    fn test_padded_code_issues_no_lookup() {
        let mut t = PincodeTracker::new();
        assert!(t.edit(" 110001").is_none());
        assert!(t.edit("110001\n").is_none());
        assert_eq!(t.display(), &PincodeDisplay::Empty);
    }

    #[test]
    fn test_complete_code_issues_ticket() {
        let mut t = PincodeTracker::new();
        let ticket = t.edit("110001").unwrap();
        assert_eq!(ticket.code.as_str(), "110001");
        assert!(matches!(t.display(), PincodeDisplay::Loading { code } if code == "110001"));
        assert!(t.complete(&ticket, Ok(Some(delhi()))));
        assert_eq!(t.display(), &PincodeDisplay::Found(delhi()));
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut t = PincodeTracker::new();
        let old = t.edit("110001").unwrap();
        let new = t.edit("999999").unwrap();
        assert!(t.complete(&new, Ok(None)));
        assert!(!t.complete(&old, Ok(Some(delhi()))));
        assert_eq!(t.display(), &PincodeDisplay::NotFound);
    }

    #[test]
    fn test_edit_to_incomplete_invalidates_in_flight_lookup() {
        let mut t = PincodeTracker::new();
        let ticket = t.edit("110001").unwrap();
        t.edit("1100");
        assert!(!t.complete(&ticket, Ok(Some(delhi()))));
        assert_eq!(t.display(), &PincodeDisplay::Empty);
    }

    #[test]
    fn test_failure_is_informational() {
        let mut t = PincodeTracker::new();
        let ticket = t.edit("400001").unwrap();
        assert!(t.complete(&ticket, Err(LookupError::Timeout { elapsed_ms: 5000 })));
        assert!(matches!(t.display(), PincodeDisplay::Failed { .. }));
    }

    struct NeverAnswers;

    impl LookupService for NeverAnswers {
        async fn lookup(&self, _code: &Pincode) -> Result<Option<Locality>, LookupError> {
            std::future::pending().await
        }

        fn service_name(&self) -> &str {
            "NeverAnswers"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_times_out_softly() {
        let code = Pincode::new("110001").unwrap();
        let result = lookup_with_timeout(&NeverAnswers, &code, Duration::from_secs(5)).await;
        assert_eq!(result, Err(LookupError::Timeout { elapsed_ms: 5000 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_timeout_saturates_elapsed() {
        let code = Pincode::new("110001").unwrap();
        let result =
            lookup_with_timeout(&NeverAnswers, &code, Duration::from_secs(u64::MAX)).await;
        assert_eq!(result, Err(LookupError::Timeout { elapsed_ms: u64::MAX }));
    }
}
