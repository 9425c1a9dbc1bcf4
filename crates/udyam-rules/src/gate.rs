//! # Step Gates
//!
//! Each wizard step owns a set of fields. Advancing from a step requires
//! that none of the step's gate fields carries a violation; fields of other
//! steps never block the gate, even when they are invalid.
//!
//! | Step | Gate fields |
//! |------|-------------|
//! | 1 | Aadhaar number, owner name, Aadhaar declaration |
//! | 2 | organization type, has PAN; plus PAN, PAN holder name, DOB/DOI and PAN declaration when has PAN = `yes` |
//! | 3 | none (step 3 submits instead of advancing) |
//!
//! The DOB/DOI kind selector is shown with the PAN block but never gates.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use udyam_core::{AnswerSet, FieldId, UdyamError, YesNo};

use crate::engine::ValidationEngine;
use crate::registry::Predicate;
use crate::violation::Violation;

/// A wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Step {
    /// Aadhaar verification.
    One = 1,
    /// Organization and PAN.
    Two = 2,
    /// GSTIN and turnover.
    Three = 3,
}

impl Step {
    /// Every step, in order.
    pub const ALL: [Step; 3] = [Step::One, Step::Two, Step::Three];

    /// The step number, 1-based.
    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// Step for a 1-based number.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    /// The following step, if any.
    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// The preceding step, if any.
    pub fn previous(&self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    /// Title shown above the step's fields.
    pub fn title(&self) -> &'static str {
        match self {
            Self::One => "Aadhaar Verification With OTP",
            Self::Two => "PAN Verification",
            Self::Three => "GSTIN and Turnover",
        }
    }

    /// The step's gate definition.
    pub fn definition(&self) -> &'static StepDefinition {
        &STEP_DEFINITIONS[(self.number() - 1) as usize]
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> u8 {
        step.number()
    }
}

impl TryFrom<u8> for Step {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(n).ok_or_else(|| format!("no wizard step {n}"))
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "step {}", self.number())
    }
}

// ─── Step definitions ────────────────────────────────────────────────

/// Fields a step always gates on, fields it gates on conditionally, and
/// the fields it shows.
#[derive(Clone, Copy)]
pub struct StepDefinition {
    /// The step.
    pub step: Step,
    /// Always part of the gate.
    pub fields: &'static [FieldId],
    /// Part of the gate when `conditional_when` holds.
    pub conditional_fields: &'static [FieldId],
    /// Condition for `conditional_fields`.
    pub conditional_when: Predicate,
    /// Shown with the conditional block but never gated.
    pub display_only: &'static [FieldId],
    /// Business rule that must also hold to advance.
    pub extra_gate: Predicate,
    /// Whether the step can be advanced from at all.
    pub advances: bool,
}

impl std::fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepDefinition")
            .field("step", &self.step)
            .field("fields", &self.fields)
            .field("conditional_fields", &self.conditional_fields)
            .field("display_only", &self.display_only)
            .field("advances", &self.advances)
            .finish_non_exhaustive()
    }
}

fn has_pan(answers: &AnswerSet) -> bool {
    answers.yes_no(FieldId::HasPan) == Some(YesNo::Yes)
}

fn no_condition(_: &AnswerSet) -> bool {
    false
}

fn no_extra_gate(_: &AnswerSet) -> bool {
    true
}

/// A non-proprietary organization must declare a PAN.
fn pan_declared_where_mandatory(answers: &AnswerSet) -> bool {
    !(answers.is_non_proprietary() && answers.yes_no(FieldId::HasPan) == Some(YesNo::No))
}

static STEP_DEFINITIONS: [StepDefinition; 3] = [
    StepDefinition {
        step: Step::One,
        fields: &[
            FieldId::AadhaarNumber,
            FieldId::OwnerName,
            FieldId::AadhaarDeclaration,
        ],
        conditional_fields: &[],
        conditional_when: no_condition,
        display_only: &[],
        extra_gate: no_extra_gate,
        advances: true,
    },
    StepDefinition {
        step: Step::Two,
        fields: &[FieldId::OrganizationType, FieldId::HasPan],
        conditional_fields: &[
            FieldId::Pan,
            FieldId::PanName,
            FieldId::DateOfBirthOrIncorporation,
            FieldId::PanDeclaration,
        ],
        conditional_when: has_pan,
        display_only: &[FieldId::DateKind],
        extra_gate: pan_declared_where_mandatory,
        advances: true,
    },
    StepDefinition {
        step: Step::Three,
        fields: &[],
        conditional_fields: &[],
        conditional_when: no_condition,
        display_only: &[
            FieldId::HasGstin,
            FieldId::TotalTurnoverA,
            FieldId::TotalTurnoverB,
        ],
        extra_gate: no_extra_gate,
        advances: false,
    },
];

impl StepDefinition {
    /// The fields the gate validates for these answers.
    pub fn fields_to_validate(&self, answers: &AnswerSet) -> BTreeSet<FieldId> {
        let mut fields: BTreeSet<FieldId> = self.fields.iter().copied().collect();
        if (self.conditional_when)(answers) {
            fields.extend(self.conditional_fields.iter().copied());
        }
        fields
    }

    /// The fields the step shows for these answers, in declaration order.
    pub fn visible_fields(&self, answers: &AnswerSet) -> Vec<FieldId> {
        let mut fields = self.fields_to_validate(answers);
        if self.conditional_fields.is_empty() || (self.conditional_when)(answers) {
            fields.extend(self.display_only.iter().copied());
        }
        fields.into_iter().collect()
    }

    /// Whether `field` belongs to this step at all, shown or not.
    pub fn owns(&self, field: FieldId) -> bool {
        self.fields.contains(&field)
            || self.conditional_fields.contains(&field)
            || self.display_only.contains(&field)
    }
}

/// The fields step `step`'s gate validates for these answers.
pub fn fields_to_validate(step: Step, answers: &AnswerSet) -> BTreeSet<FieldId> {
    step.definition().fields_to_validate(answers)
}

/// The step that owns `field`.
pub fn step_of(field: FieldId) -> Step {
    Step::ALL
        .into_iter()
        .find(|s| s.definition().owns(field))
        .unwrap_or(Step::Three)
}

/// Whether the wizard may advance from `step` given a full violation list.
///
/// Only violations on the step's gate fields count, plus the step's extra
/// business rule. Step 3 never advances.
pub fn can_advance(step: Step, answers: &AnswerSet, violations: &[Violation]) -> bool {
    let def = step.definition();
    if !def.advances || !(def.extra_gate)(answers) {
        return false;
    }
    let gate = def.fields_to_validate(answers);
    !violations.iter().any(|v| gate.contains(&v.field))
}

// ─── Gate evaluation ─────────────────────────────────────────────────

/// Result of evaluating one step's gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateVerdict {
    /// The step evaluated.
    pub step: Step,
    /// The gate fields, in declaration order.
    pub fields: Vec<FieldId>,
    /// Violations on the gate fields.
    pub violations: Vec<Violation>,
    /// Whether the step may be left forwards.
    pub open: bool,
}

impl GateVerdict {
    /// Whether the gate lets the wizard advance.
    pub fn is_open(&self) -> bool {
        self.open
    }
}

/// Validate the answers and decide the gate of `step`.
///
/// # Errors
///
/// [`UdyamError::UnknownField`] from the validation engine.
pub fn evaluate(
    engine: &ValidationEngine<'_>,
    step: Step,
    answers: &AnswerSet,
) -> Result<GateVerdict, UdyamError> {
    let fields = fields_to_validate(step, answers);
    let violations = engine.validate_fields(answers, &fields)?;
    let open = can_advance(step, answers, &violations);
    tracing::debug!(
        step = step.number(),
        violations = violations.len(),
        open,
        "step gate evaluated"
    );
    Ok(GateVerdict {
        step,
        fields: fields.into_iter().collect(),
        violations,
        open,
    })
}
