//! # Wizard State Machine
//!
//! Owns the current step, the answers, the violations on display, and the
//! "PAN re-validated" lock. Every write from the renderer goes through one
//! of the transition operations below; nothing else mutates the state.
//!
//! ## States
//!
//! ```text
//! Step 1 ──▶ Step 2 ──▶ Step 3 ──▶ Submitting ──▶ Submitted (terminal)
//!   ◀──────────┘ ◀────────┘   ▲          │
//!                             │          ▼
//!                             └──── SubmissionFailed
//! ```
//!
//! `SubmissionFailed` is recorded in the transition log and immediately
//! returns to Step 3 with the failure banner set, so the applicant can
//! correct and retry without losing any answers.
//!
//! ## PAN Re-validation
//!
//! Passing the step 2 gate sets the lock flag. Any edit to a PAN-sensitive
//! field (organization type, has PAN, PAN, PAN name, DOB/DOI, PAN
//! declaration) clears it, as does retreating out of step 2. The step 2
//! gate always re-runs in full on the next advance. Submission does not
//! touch the flag.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use udyam_core::{AnswerSet, FieldId, FieldValue, SessionId, UdyamError};
use udyam_rules::cross_field::PAN_DETAIL_FIELDS;
use udyam_rules::gate::{self, Step};
use udyam_rules::{ValidationEngine, Violation};

use crate::lookup::{
    lookup_with_timeout, Locality, LookupError, LookupService, LookupTicket, PincodeDisplay,
    PincodeTracker,
};
use crate::transport::{SubmissionReceipt, SubmissionTransport, TransportError};

/// Banner shown when the step 2 gate fails on the PAN block.
pub const PAN_CORRECTION_BANNER: &str = "Please correct the PAN details.";

/// Banner shown when an in-flight submission is abandoned.
pub const SUBMISSION_CANCELLED_BANNER: &str = "Submission cancelled.";

// ─── Configuration ───────────────────────────────────────────────────

/// Timeouts for the two suspending operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardConfig {
    /// Upper bound on one submission call.
    pub submit_timeout: Duration,
    /// Upper bound on one pincode lookup.
    pub lookup_timeout: Duration,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            submit_timeout: Duration::from_secs(15),
            lookup_timeout: Duration::from_secs(5),
        }
    }
}

// ─── Phase ───────────────────────────────────────────────────────────

/// Where the wizard is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardPhase {
    /// Editing a step.
    Step(Step),
    /// Waiting for the submission transport.
    Submitting,
    /// The transport rejected the submission or failed.
    SubmissionFailed,
    /// Submission accepted (terminal).
    Submitted,
}

impl WizardPhase {
    /// The step being edited, if any.
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Step(step) => Some(*step),
            _ => None,
        }
    }

    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted)
    }
}

impl std::fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Step(step) => write!(f, "STEP_{}", step.number()),
            Self::Submitting => f.write_str("SUBMITTING"),
            Self::SubmissionFailed => f.write_str("SUBMISSION_FAILED"),
            Self::Submitted => f.write_str("SUBMITTED"),
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Misuse of the wizard. Business failures are outcomes, not errors.
#[derive(Error, Debug)]
pub enum WizardError {
    /// The operation is not allowed in the current phase.
    #[error("invalid wizard transition: {from} -> {to}")]
    InvalidTransition {
        /// Current phase.
        from: String,
        /// Attempted target.
        to: String,
    },

    /// Registry and engine disagree about the declared fields.
    #[error(transparent)]
    Rules(#[from] UdyamError),
}

// ─── Records and outcomes ────────────────────────────────────────────

/// One entry in the wizard's transition log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardTransitionRecord {
    /// Phase before.
    pub from: WizardPhase,
    /// Phase after.
    pub to: WizardPhase,
    /// When the transition happened.
    pub timestamp: DateTime<Utc>,
    /// Why.
    pub reason: String,
}

/// Tone of the banner message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    /// Submission accepted.
    Success,
    /// Something needs the applicant's attention.
    Error,
}

/// Form-level message shown above the fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    /// Tone.
    pub kind: BannerKind,
    /// Text.
    pub message: String,
}

impl Banner {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }
}

/// Result of [`Wizard::advance`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    /// The gate passed.
    Advanced {
        /// Step left.
        from: Step,
        /// Step entered.
        to: Step,
    },
    /// The gate failed; the violations are the gated fields' only.
    Denied {
        /// Step the wizard stays on.
        step: Step,
        /// Violations on the step's gate fields.
        violations: Vec<Violation>,
    },
    /// Step 3 has no forward gate; use [`Wizard::submit`].
    FinalStep,
}

/// Result of [`Wizard::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Accepted by the transport; answers discarded.
    Submitted(SubmissionReceipt),
    /// Full-form validation failed; the transport was not contacted.
    Invalid(Vec<Violation>),
    /// The transport failed; back on step 3 with answers intact.
    Failed {
        /// Underlying failure.
        error: TransportError,
        /// Banner text.
        message: String,
    },
}

/// Read-only view of the wizard for a renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    /// Session identifier.
    pub session: SessionId,
    /// Current phase.
    pub phase: WizardPhase,
    /// Fields shown on the current step.
    pub visible_fields: Vec<FieldId>,
    /// Current answers.
    pub answers: AnswerSet,
    /// Violations on display, in declaration order.
    pub violations: Vec<Violation>,
    /// Whether the step 2 gate must re-run before its approval counts.
    pub pan_revalidation_required: bool,
    /// Form-level message.
    pub banner: Option<Banner>,
    /// Pincode display state.
    pub pincode: PincodeDisplay,
}

// ─── Wizard ──────────────────────────────────────────────────────────

/// One interactive registration session.
///
/// Instances share no mutable state; run as many side by side as needed.
#[derive(Debug, Clone)]
pub struct Wizard<'r> {
    session: SessionId,
    engine: ValidationEngine<'r>,
    config: WizardConfig,
    phase: WizardPhase,
    answers: AnswerSet,
    violations: BTreeMap<FieldId, Violation>,
    pan_revalidated: bool,
    banner: Option<Banner>,
    pincode: PincodeTracker,
    transitions: Vec<WizardTransitionRecord>,
}

impl Wizard<'static> {
    /// Wizard over the standard registry with default timeouts.
    pub fn new() -> Self {
        Self::with_engine(ValidationEngine::standard(), WizardConfig::default())
    }
}

impl Default for Wizard<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Wizard<'r> {
    /// Wizard using `engine`, starting on step 1 with the declared defaults.
    pub fn with_engine(engine: ValidationEngine<'r>, config: WizardConfig) -> Self {
        let session = SessionId::new();
        tracing::info!(session = %session, "wizard started");
        Self {
            session,
            engine,
            config,
            phase: WizardPhase::Step(Step::One),
            answers: AnswerSet::with_defaults(),
            violations: BTreeMap::new(),
            pan_revalidated: false,
            banner: None,
            pincode: PincodeTracker::new(),
            transitions: Vec::new(),
        }
    }

    // ── Accessors ──

    /// Session identifier.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Current phase.
    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    /// Current step, when editing.
    pub fn current_step(&self) -> Option<Step> {
        self.phase.step()
    }

    /// Current answers.
    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Violations on display, in declaration order.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations.values()
    }

    /// The message shown against `field`, if any.
    pub fn violation_for(&self, field: FieldId) -> Option<&Violation> {
        self.violations.get(&field)
    }

    /// Whether the PAN block has to pass the step 2 gate again.
    pub fn pan_revalidation_required(&self) -> bool {
        !self.pan_revalidated
    }

    /// Form-level message.
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Pincode display state.
    pub fn pincode(&self) -> &PincodeTracker {
        &self.pincode
    }

    /// Transition log, oldest first.
    pub fn transitions(&self) -> &[WizardTransitionRecord] {
        &self.transitions
    }

    /// Configured timeouts.
    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    /// Fields shown on the current step. Empty outside step phases.
    pub fn visible_fields(&self) -> Vec<FieldId> {
        self.phase
            .step()
            .map(|s| s.definition().visible_fields(&self.answers))
            .unwrap_or_default()
    }

    /// Renderer view of the whole state.
    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            session: self.session,
            phase: self.phase,
            visible_fields: self.visible_fields(),
            answers: self.answers.clone(),
            violations: self.violations.values().cloned().collect(),
            pan_revalidation_required: self.pan_revalidation_required(),
            banner: self.banner.clone(),
            pincode: self.pincode.display().clone(),
        }
    }

    // ── Transitions ──

    /// Run the current step's gate and move forward if it passes.
    ///
    /// On denial the displayed violations are replaced by the gate fields'
    /// violations; violations on other steps' fields are never reported.
    ///
    /// # Errors
    ///
    /// [`WizardError::InvalidTransition`] outside step phases;
    /// [`WizardError::Rules`] on a registry mismatch.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, WizardError> {
        let step = self.require_step("NEXT_STEP")?;
        let Some(next) = step.next() else {
            return Ok(AdvanceOutcome::FinalStep);
        };

        let verdict = gate::evaluate(&self.engine, step, &self.answers)?;
        if verdict.is_open() {
            if step == Step::Two {
                self.pan_revalidated = true;
            }
            self.banner = None;
            self.do_transition(WizardPhase::Step(next), "step gate passed");
            self.retain_violations_for(next);
            return Ok(AdvanceOutcome::Advanced { from: step, to: next });
        }

        tracing::warn!(
            session = %self.session,
            step = %step,
            violations = verdict.violations.len(),
            "step gate denied"
        );
        self.violations = first_per_field(&verdict.violations);
        if step == Step::Two {
            self.pan_revalidated = false;
            if verdict
                .violations
                .iter()
                .any(|v| PAN_DETAIL_FIELDS.contains(&v.field))
            {
                self.banner = Some(Banner::error(PAN_CORRECTION_BANNER));
            }
        }
        Ok(AdvanceOutcome::Denied {
            step,
            violations: verdict.violations,
        })
    }

    /// Move back one step (floor step 1). Returns the step now shown.
    ///
    /// # Errors
    ///
    /// [`WizardError::InvalidTransition`] outside step phases.
    pub fn retreat(&mut self) -> Result<Step, WizardError> {
        let step = self.require_step("PREVIOUS_STEP")?;
        let Some(previous) = step.previous() else {
            return Ok(step);
        };
        if step == Step::Two {
            self.pan_revalidated = false;
        }
        self.banner = None;
        self.do_transition(WizardPhase::Step(previous), "returned to previous step");
        self.retain_violations_for(previous);
        Ok(previous)
    }

    /// Assign an answer.
    ///
    /// PAN-sensitive fields clear the re-validation flag. Fields already
    /// showing a message are re-validated so a corrected field clears at
    /// once; fields without a message do not gain one.
    ///
    /// # Errors
    ///
    /// [`WizardError::InvalidTransition`] outside step phases;
    /// [`WizardError::Rules`] on a registry mismatch.
    pub fn update_answer(
        &mut self,
        field: FieldId,
        value: impl Into<FieldValue>,
    ) -> Result<(), WizardError> {
        self.require_step("UPDATE_ANSWER")?;
        self.answers.set(field, value);
        self.after_edit(field)
    }

    /// Remove an answer. Same rules as [`Wizard::update_answer`].
    ///
    /// # Errors
    ///
    /// As for [`Wizard::update_answer`].
    pub fn clear_answer(&mut self, field: FieldId) -> Result<(), WizardError> {
        self.require_step("UPDATE_ANSWER")?;
        self.answers.clear(field);
        self.after_edit(field)
    }

    /// Validate the whole form and, if clean, hand it to `transport`.
    ///
    /// Invalid forms stay on step 3 with every violation displayed and the
    /// transport untouched. Transport failures and timeouts are reported as
    /// [`SubmitOutcome::Failed`] and return the wizard to step 3.
    ///
    /// # Errors
    ///
    /// [`WizardError::InvalidTransition`] unless on step 3;
    /// [`WizardError::Rules`] on a registry mismatch.
    pub async fn submit<T: SubmissionTransport>(
        &mut self,
        transport: &T,
    ) -> Result<SubmitOutcome, WizardError> {
        if self.phase != WizardPhase::Step(Step::Three) {
            return Err(WizardError::InvalidTransition {
                from: self.phase.to_string(),
                to: WizardPhase::Submitting.to_string(),
            });
        }

        let violations = self.engine.validate(&self.answers)?;
        if !violations.is_empty() {
            tracing::warn!(
                session = %self.session,
                violations = violations.len(),
                "submission blocked by validation"
            );
            self.violations = first_per_field(&violations);
            self.banner = None;
            return Ok(SubmitOutcome::Invalid(violations));
        }

        self.violations.clear();
        self.banner = None;
        self.do_transition(WizardPhase::Submitting, "full-form validation passed");

        let timeout = self.config.submit_timeout;
        let result = match tokio::time::timeout(timeout, transport.submit(&self.answers)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                elapsed_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };

        match result {
            Ok(receipt) => {
                tracing::info!(
                    session = %self.session,
                    transport = transport.transport_name(),
                    "submission accepted"
                );
                self.do_transition(WizardPhase::Submitted, "submission accepted");
                self.answers = AnswerSet::new();
                self.banner = Some(Banner::success(receipt.message.clone()));
                Ok(SubmitOutcome::Submitted(receipt))
            }
            Err(error) => {
                let message = error.user_message();
                tracing::warn!(
                    session = %self.session,
                    transport = transport.transport_name(),
                    error = %error,
                    "submission failed"
                );
                self.do_transition(WizardPhase::SubmissionFailed, &message);
                self.do_transition(WizardPhase::Step(Step::Three), "retry after failed submission");
                self.banner = Some(Banner::error(message.clone()));
                Ok(SubmitOutcome::Failed { error, message })
            }
        }
    }

    /// Return to step 3 after a submission future was dropped mid-flight.
    ///
    /// # Errors
    ///
    /// [`WizardError::InvalidTransition`] unless a submission is in flight.
    pub fn abandon_submission(&mut self) -> Result<(), WizardError> {
        if self.phase != WizardPhase::Submitting {
            return Err(WizardError::InvalidTransition {
                from: self.phase.to_string(),
                to: WizardPhase::Step(Step::Three).to_string(),
            });
        }
        self.do_transition(WizardPhase::Step(Step::Three), "submission abandoned");
        self.banner = Some(Banner::error(SUBMISSION_CANCELLED_BANNER));
        Ok(())
    }

    // ── Pincode ──

    /// Record a pincode edit; see [`PincodeTracker::edit`].
    pub fn edit_pincode(&mut self, raw: &str) -> Option<LookupTicket> {
        self.pincode.edit(raw)
    }

    /// Apply a lookup result; see [`PincodeTracker::complete`].
    pub fn complete_lookup(
        &mut self,
        ticket: &LookupTicket,
        result: Result<Option<Locality>, LookupError>,
    ) -> bool {
        self.pincode.complete(ticket, result)
    }

    /// Edit the pincode and, for a complete code, look it up within the
    /// configured timeout. Returns whether a result was applied.
    pub async fn lookup_pincode<S: LookupService>(&mut self, service: &S, raw: &str) -> bool {
        let Some(ticket) = self.pincode.edit(raw) else {
            return false;
        };
        let result = lookup_with_timeout(service, &ticket.code, self.config.lookup_timeout).await;
        self.pincode.complete(&ticket, result)
    }

    // ── Internals ──

    fn require_step(&self, target: &str) -> Result<Step, WizardError> {
        self.phase.step().ok_or_else(|| WizardError::InvalidTransition {
            from: self.phase.to_string(),
            to: target.to_string(),
        })
    }

    fn do_transition(&mut self, to: WizardPhase, reason: &str) {
        tracing::info!(session = %self.session, from = %self.phase, to = %to, reason, "wizard transition");
        self.transitions.push(WizardTransitionRecord {
            from: self.phase,
            to,
            timestamp: Utc::now(),
            reason: reason.to_string(),
        });
        self.phase = to;
    }

    fn retain_violations_for(&mut self, step: Step) {
        let def = step.definition();
        self.violations.retain(|field, _| def.owns(*field));
    }

    fn after_edit(&mut self, field: FieldId) -> Result<(), WizardError> {
        if field.is_pan_sensitive() && self.pan_revalidated {
            tracing::debug!(session = %self.session, field = %field, "PAN re-validation required");
            self.pan_revalidated = false;
        }
        if self.violations.is_empty() {
            return Ok(());
        }
        let shown: BTreeSet<FieldId> = self.violations.keys().copied().collect();
        let fresh = self.engine.validate_fields(&self.answers, &shown)?;
        self.violations = first_per_field(&fresh);
        Ok(())
    }
}

fn first_per_field(violations: &[Violation]) -> BTreeMap<FieldId, Violation> {
    let mut map = BTreeMap::new();
    for v in violations {
        map.entry(v.field).or_insert_with(|| v.clone());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use udyam_rules::Registry;

    fn wizard() -> Wizard<'static> {
        let engine = ValidationEngine::new(
            Registry::standard(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        Wizard::with_engine(engine, WizardConfig::default())
    }

    fn fill_step_one(w: &mut Wizard<'_>) {
        w.update_answer(FieldId::AadhaarNumber, "234567890124").unwrap();
        w.update_answer(FieldId::OwnerName, "Asha Verma").unwrap();
    }

    #[test]
    fn test_starts_on_step_one_with_defaults() {
        let w = wizard();
        assert_eq!(w.phase(), WizardPhase::Step(Step::One));
        assert_eq!(w.answers().flag(FieldId::AadhaarDeclaration), Some(true));
        assert_eq!(w.answers().text(FieldId::HasPan), Some("yes"));
        assert!(w.pan_revalidation_required());
        assert!(w.transitions().is_empty());
    }

    #[test]
    fn test_denied_advance_reports_only_step_one_fields() {
        let mut w = wizard();
        w.update_answer(FieldId::AadhaarNumber, "234567890124").unwrap();
        w.update_answer(FieldId::TotalTurnoverA, FieldValue::Number(-5.0)).unwrap();
        let outcome = w.advance().unwrap();
        match outcome {
            AdvanceOutcome::Denied { step, violations } => {
                assert_eq!(step, Step::One);
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field, FieldId::OwnerName);
            }
            other => panic!("expected denial, got {other:?}"),
        }
        assert_eq!(w.phase(), WizardPhase::Step(Step::One));
        assert!(w.violation_for(FieldId::TotalTurnoverA).is_none());
    }

    #[test]
    fn test_advance_records_transition() {
        let mut w = wizard();
        fill_step_one(&mut w);
        assert_eq!(
            w.advance().unwrap(),
            AdvanceOutcome::Advanced {
                from: Step::One,
                to: Step::Two
            }
        );
        let record = &w.transitions()[0];
        assert_eq!(record.from, WizardPhase::Step(Step::One));
        assert_eq!(record.to, WizardPhase::Step(Step::Two));
    }

    #[test]
    fn test_corrected_field_clears_its_message() {
        let mut w = wizard();
        w.update_answer(FieldId::AadhaarNumber, "1234").unwrap();
        w.advance().unwrap();
        assert!(w.violation_for(FieldId::AadhaarNumber).is_some());
        assert!(w.violation_for(FieldId::OwnerName).is_some());

        w.update_answer(FieldId::AadhaarNumber, "234567890124").unwrap();
        assert!(w.violation_for(FieldId::AadhaarNumber).is_none());
        // Untouched field keeps its message.
        assert!(w.violation_for(FieldId::OwnerName).is_some());
    }

    #[test]
    fn test_edit_does_not_surface_new_messages() {
        let mut w = wizard();
        w.update_answer(FieldId::AadhaarNumber, "12").unwrap();
        assert_eq!(w.violations().count(), 0);
    }

    #[test]
    fn test_step_two_pan_block_denial_sets_banner() {
        let mut w = wizard();
        fill_step_one(&mut w);
        w.advance().unwrap();
        w.update_answer(FieldId::OrganizationType, "5").unwrap();
        let outcome = w.advance().unwrap();
        assert!(matches!(outcome, AdvanceOutcome::Denied { ref violations, .. } if violations.len() == 4));
        assert_eq!(w.banner().unwrap().message, PAN_CORRECTION_BANNER);
        assert!(w.pan_revalidation_required());
    }

    #[test]
    fn test_pan_sensitive_edit_clears_lock() {
        let mut w = wizard();
        fill_step_one(&mut w);
        w.advance().unwrap();
        w.update_answer(FieldId::OrganizationType, "1").unwrap();
        w.update_answer(FieldId::HasPan, "no").unwrap();
        w.advance().unwrap();
        assert!(!w.pan_revalidation_required());

        w.update_answer(FieldId::TotalTurnoverA, 10.0).unwrap();
        assert!(!w.pan_revalidation_required());
        w.update_answer(FieldId::OrganizationType, "3").unwrap();
        assert!(w.pan_revalidation_required());
    }

    #[test]
    fn test_retreat_floor_and_lock() {
        let mut w = wizard();
        assert_eq!(w.retreat().unwrap(), Step::One);
        assert!(w.transitions().is_empty());

        fill_step_one(&mut w);
        w.advance().unwrap();
        w.update_answer(FieldId::OrganizationType, "1").unwrap();
        w.update_answer(FieldId::HasPan, "no").unwrap();
        w.advance().unwrap();
        assert_eq!(w.retreat().unwrap(), Step::Two);
        assert!(!w.pan_revalidation_required());
        assert_eq!(w.retreat().unwrap(), Step::One);
        assert!(w.pan_revalidation_required());
    }

    #[test]
    fn test_step_three_advance_is_final() {
        let mut w = wizard();
        fill_step_one(&mut w);
        w.advance().unwrap();
        w.update_answer(FieldId::OrganizationType, "1").unwrap();
        w.update_answer(FieldId::HasPan, "no").unwrap();
        w.advance().unwrap();
        assert_eq!(w.advance().unwrap(), AdvanceOutcome::FinalStep);
        assert_eq!(w.current_step(), Some(Step::Three));
    }

    #[test]
    fn test_visible_fields_follow_has_pan() {
        let mut w = wizard();
        fill_step_one(&mut w);
        w.advance().unwrap();
        assert!(w.visible_fields().contains(&FieldId::Pan));
        w.update_answer(FieldId::HasPan, "no").unwrap();
        assert_eq!(
            w.visible_fields(),
            vec![FieldId::OrganizationType, FieldId::HasPan]
        );
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(WizardPhase::Step(Step::Two).to_string(), "STEP_2");
        assert_eq!(WizardPhase::SubmissionFailed.to_string(), "SUBMISSION_FAILED");
        assert!(WizardPhase::Submitted.is_terminal());
    }

    #[test]
    fn test_abandon_requires_submitting() {
        let mut w = wizard();
        assert!(matches!(
            w.abandon_submission(),
            Err(WizardError::InvalidTransition { .. })
        ));
    }
}
