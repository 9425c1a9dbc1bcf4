//! # Cross-Field Business Rules
//!
//! Rules that depend on more than one answer and cannot be attached to a
//! single field's requirement predicate.
//!
//! | Rule | Condition | Reported on |
//! |------|-----------|-------------|
//! | PAN mandatory | non-proprietary type ∧ has PAN = `no` | `hasPan` |
//! | PAN details present | non-proprietary type ∧ has PAN = `yes` | each missing PAN-block field |
//! | GSTIN mandatory | has GSTIN = `no` ∧ turnover (A) > 4,000,000 | `hasGstin` |
//!
//! The turnover threshold is a fixed number in the unit of the turnover
//! fields. Only turnover (A) is compared.

use udyam_core::{AnswerSet, FieldId, UdyamError, YesNo};

use crate::registry::Registry;
use crate::violation::{Violation, ViolationCode};

/// Turnover (A) above which a GSTIN is mandatory.
pub const GSTIN_TURNOVER_THRESHOLD: f64 = 4_000_000.0;

/// Fields that must each be present when a PAN is declared for a
/// non-proprietary organization.
pub const PAN_DETAIL_FIELDS: [FieldId; 4] = [
    FieldId::Pan,
    FieldId::PanName,
    FieldId::DateOfBirthOrIncorporation,
    FieldId::PanDeclaration,
];

/// Signature of a cross-field rule.
pub type RuleFn = fn(&AnswerSet, &Registry) -> Result<Vec<Violation>, UdyamError>;

/// A named cross-field rule.
#[derive(Clone, Copy)]
pub struct CrossFieldRule {
    /// Rule name, for logs.
    pub name: &'static str,
    /// The rule.
    pub apply: RuleFn,
}

impl std::fmt::Debug for CrossFieldRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossFieldRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Every cross-field rule, in evaluation order.
pub const CROSS_FIELD_RULES: [CrossFieldRule; 3] = [
    CrossFieldRule {
        name: "pan_mandatory",
        apply: pan_mandatory,
    },
    CrossFieldRule {
        name: "pan_details_present",
        apply: pan_details_present,
    },
    CrossFieldRule {
        name: "gstin_mandatory",
        apply: gstin_mandatory,
    },
];

fn pan_mandatory(answers: &AnswerSet, _: &Registry) -> Result<Vec<Violation>, UdyamError> {
    if answers.is_non_proprietary() && answers.yes_no(FieldId::HasPan) == Some(YesNo::No) {
        return Ok(vec![Violation::new(
            FieldId::HasPan,
            ViolationCode::PanMandatory,
            "PAN is mandatory for this type of organization. Please select \"Yes\".",
        )]);
    }
    Ok(Vec::new())
}

fn pan_details_present(
    answers: &AnswerSet,
    registry: &Registry,
) -> Result<Vec<Violation>, UdyamError> {
    if !(answers.is_non_proprietary() && answers.yes_no(FieldId::HasPan) == Some(YesNo::Yes)) {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for field in PAN_DETAIL_FIELDS {
        let spec = registry.spec_for(field)?;
        if spec.is_empty_in(answers) {
            out.push(Violation::new(
                field,
                ViolationCode::Required,
                spec.required_message,
            ));
        }
    }
    Ok(out)
}

fn gstin_mandatory(answers: &AnswerSet, _: &Registry) -> Result<Vec<Violation>, UdyamError> {
    let above_threshold = answers
        .number(FieldId::TotalTurnoverA)
        .is_some_and(|t| t > GSTIN_TURNOVER_THRESHOLD);
    if answers.yes_no(FieldId::HasGstin) == Some(YesNo::No) && above_threshold {
        return Ok(vec![Violation::new(
            FieldId::HasGstin,
            ViolationCode::GstinMandatory,
            "GSTIN is mandatory if turnover exceeds \u{20b9}40 Lakhs.",
        )]);
    }
    Ok(Vec::new())
}
