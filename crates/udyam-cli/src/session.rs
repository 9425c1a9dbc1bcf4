//! # Run Subcommand
//!
//! Replays a scripted wizard session. The script stands in for an
//! applicant: it edits answers, moves between steps, enters a pincode and
//! submits. After every event the wizard's snapshot is printed as one JSON
//! line.
//!
//! ## Script format
//!
//! ```yaml
//! events:
//!   - { event: update, field: adharno, value: "234567890124" }
//!   - { event: update, field: ownername, value: "Asha Verma" }
//!   - { event: advance }
//!   - { event: pincode, code: "400001" }
//!   - { event: submit }
//! ```
//!
//! A rejected event (for example `submit` before step 3) is reported in
//! place and the replay continues.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use udyam_client::{HttpTransport, MockSubmissionTransport, PincodeLookup};
use udyam_core::{AnswerSet, FieldId, FieldValue};
use udyam_state::{
    LookupService, SubmissionReceipt, SubmissionTransport, SubmitOutcome, TransportError, Wizard,
    WizardSnapshot,
};

use crate::document::load_document;
use crate::EndpointArgs;

/// Arguments for `udyam run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Session script (JSON or YAML).
    pub script: PathBuf,

    /// Submit to the in-process mock instead of the registration backend.
    #[arg(long)]
    pub offline: bool,

    #[command(flatten)]
    pub endpoints: EndpointArgs,
}

/// A scripted session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionScript {
    /// Events in replay order.
    pub events: Vec<ScriptEvent>,
}

/// One applicant action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Set a field.
    Update { field: FieldId, value: FieldValue },
    /// Remove a field's answer.
    Clear { field: FieldId },
    /// Try to move to the next step.
    Advance,
    /// Move to the previous step.
    Retreat,
    /// Submit the form.
    Submit,
    /// Enter a pincode.
    Pincode { code: String },
}

impl ScriptEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Update { .. } => "update",
            Self::Clear { .. } => "clear",
            Self::Advance => "advance",
            Self::Retreat => "retreat",
            Self::Submit => "submit",
            Self::Pincode { .. } => "pincode",
        }
    }
}

/// What replaying one event produced.
#[derive(Debug, Clone, Serialize)]
pub struct EventReport {
    /// Zero-based position in the script.
    pub index: usize,
    /// Event name.
    pub event: &'static str,
    /// Event-specific result; `{"error": ...}` when the wizard refused it.
    pub result: Value,
    /// Wizard state after the event.
    pub snapshot: WizardSnapshot,
}

impl EventReport {
    /// Whether the wizard refused the event.
    pub fn is_error(&self) -> bool {
        self.result.get("error").is_some()
    }
}

// -- Transport selection -----------------------------------------------------

/// Submission target of a replay.
#[derive(Debug)]
pub enum SessionTransport {
    Http(HttpTransport),
    Offline(MockSubmissionTransport),
}

impl SubmissionTransport for SessionTransport {
    async fn submit(&self, answers: &AnswerSet) -> Result<SubmissionReceipt, TransportError> {
        match self {
            Self::Http(t) => t.submit(answers).await,
            Self::Offline(t) => t.submit(answers).await,
        }
    }

    fn transport_name(&self) -> &str {
        match self {
            Self::Http(t) => t.transport_name(),
            Self::Offline(t) => t.transport_name(),
        }
    }
}

// -- Replay ------------------------------------------------------------------

fn submit_result(outcome: &SubmitOutcome) -> Value {
    match outcome {
        SubmitOutcome::Submitted(receipt) => json!({
            "outcome": "submitted",
            "message": receipt.message,
            "id": receipt.id,
        }),
        SubmitOutcome::Invalid(violations) => json!({
            "outcome": "invalid",
            "violations": violations,
        }),
        SubmitOutcome::Failed { error, message } => json!({
            "outcome": "failed",
            "message": message,
            "detail": error.to_string(),
        }),
    }
}

fn error_result(err: impl std::fmt::Display) -> Value {
    json!({ "error": err.to_string() })
}

/// Replay `script` against a fresh wizard.
pub async fn replay<T, L>(
    script: &SessionScript,
    transport: &T,
    lookup: &L,
) -> Result<Vec<EventReport>>
where
    T: SubmissionTransport,
    L: LookupService,
{
    let mut wizard = Wizard::new();
    let mut reports = Vec::with_capacity(script.events.len());

    for (index, event) in script.events.iter().enumerate() {
        let result = match event {
            ScriptEvent::Update { field, value } => {
                match wizard.update_answer(*field, value.clone()) {
                    Ok(()) => Value::Null,
                    Err(e) => error_result(e),
                }
            }
            ScriptEvent::Clear { field } => match wizard.clear_answer(*field) {
                Ok(()) => Value::Null,
                Err(e) => error_result(e),
            },
            ScriptEvent::Advance => match wizard.advance() {
                Ok(outcome) => serde_json::to_value(&outcome)?,
                Err(e) => error_result(e),
            },
            ScriptEvent::Retreat => match wizard.retreat() {
                Ok(step) => json!({ "step": step.number() }),
                Err(e) => error_result(e),
            },
            ScriptEvent::Submit => match wizard.submit(transport).await {
                Ok(outcome) => submit_result(&outcome),
                Err(e) => error_result(e),
            },
            ScriptEvent::Pincode { code } => {
                let applied = wizard.lookup_pincode(lookup, code).await;
                json!({ "applied": applied })
            }
        };

        let report = EventReport {
            index,
            event: event.name(),
            result,
            snapshot: wizard.snapshot(),
        };
        if report.is_error() {
            tracing::warn!(index, event = report.event, "scripted event refused");
        }
        reports.push(report);
    }

    Ok(reports)
}

/// Execute `udyam run`. Exit code 1 when any event was refused.
pub async fn run_session_command(args: &RunArgs) -> Result<u8> {
    let script: SessionScript = load_document(&args.script)?;
    let config = args.endpoints.client_config()?;

    let transport = if args.offline {
        SessionTransport::Offline(MockSubmissionTransport::new())
    } else {
        SessionTransport::Http(HttpTransport::new(&config)?)
    };
    let lookup = PincodeLookup::from_config(&config)?;

    tracing::info!(
        events = script.events.len(),
        transport = transport.transport_name(),
        lookup = lookup.service_name(),
        "replaying session"
    );

    let reports = replay(&script, &transport, &lookup).await?;
    for report in &reports {
        println!("{}", serde_json::to_string(report)?);
    }

    Ok(if reports.iter().any(EventReport::is_error) { 1 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use udyam_client::StaticLookupService;
    use udyam_state::WizardPhase;

    const PROPRIETOR_SESSION: &str = r#"
events:
  - { event: update, field: adharno, value: "234567890124" }
  - { event: update, field: ownername, value: "Asha Verma" }
  - { event: advance }
  - { event: update, field: organizationType, value: "1" }
  - { event: update, field: hasPan, value: "no" }
  - { event: advance }
  - { event: pincode, code: "400001" }
  - { event: update, field: totalTurnoverA, value: 1500000 }
  - { event: submit }
"#;

    fn parse(yaml: &str) -> SessionScript {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_script_parses_every_event_kind() {
        let script: SessionScript = serde_json::from_str(
            r#"{"events": [
                {"event": "update", "field": "aadhaarDeclaration", "value": false},
                {"event": "clear", "field": "pan"},
                {"event": "advance"},
                {"event": "retreat"},
                {"event": "pincode", "code": "110001"},
                {"event": "submit"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(script.events.len(), 6);
        assert_eq!(
            script.events[0],
            ScriptEvent::Update {
                field: FieldId::AadhaarDeclaration,
                value: FieldValue::Flag(false)
            }
        );
        assert_eq!(script.events[5], ScriptEvent::Submit);
    }

    #[test]
    fn test_unknown_field_in_script_is_rejected() {
        let res: Result<SessionScript, _> = serde_json::from_str(
            r#"{"events": [{"event": "update", "field": "gstin", "value": "x"}]}"#,
        );
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn test_offline_replay_submits() {
        let script = parse(PROPRIETOR_SESSION);
        let transport = SessionTransport::Offline(MockSubmissionTransport::new());
        let lookup = StaticLookupService::standard();

        let reports = replay(&script, &transport, &lookup).await.unwrap();
        assert_eq!(reports.len(), 9);
        assert!(reports.iter().all(|r| !r.is_error()));

        assert_eq!(reports[2].result["outcome"], "advanced");
        assert_eq!(reports[6].result["applied"], true);

        let last = reports.last().unwrap();
        assert_eq!(last.result["outcome"], "submitted");
        assert_eq!(last.result["message"], "Form submitted successfully!");
        assert_eq!(last.snapshot.phase, WizardPhase::Submitted);
        assert!(last.snapshot.answers.is_empty());
    }

    #[tokio::test]
    async fn test_refused_events_are_reported_and_replay_continues() {
        let script = parse(
            r#"
events:
  - { event: submit }
  - { event: advance }
  - { event: update, field: adharno, value: "234567890124" }
"#,
        );
        let transport = SessionTransport::Offline(MockSubmissionTransport::new());
        let lookup = StaticLookupService::standard();

        let reports = replay(&script, &transport, &lookup).await.unwrap();
        assert!(reports[0].is_error());
        assert_eq!(reports[1].result["outcome"], "denied");
        assert!(!reports[2].is_error());
        assert_eq!(
            reports[2].snapshot.answers.text(FieldId::AadhaarNumber),
            Some("234567890124")
        );
    }

    #[tokio::test]
    async fn test_run_command_reads_script_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.yaml");
        std::fs::write(&path, PROPRIETOR_SESSION).unwrap();

        let args = RunArgs {
            script: path,
            offline: true,
            endpoints: EndpointArgs::default(),
        };
        assert_eq!(run_session_command(&args).await.unwrap(), 0);
    }
}
