//! # Violations
//!
//! A violation is one user-correctable problem attached to one field.
//! Violations are produced fresh on every validation pass and never
//! mutated; a new pass's list fully replaces the previous one.

use serde::{Deserialize, Serialize};

use udyam_core::FieldId;

/// Severity of a violation. Every rule in the wizard blocks progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks the step gate and submission.
    #[default]
    Error,
}

/// The category of a failed check.
///
/// At most one category is reported per field per pass for static checks.
/// Cross-field rules never report a category a field already carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// Required but absent or empty.
    Required,
    /// Value of the wrong type for the field (e.g. a flag for a text field).
    Kind,
    /// Length outside the allowed bounds.
    Length,
    /// Characters outside the allowed class.
    Charset,
    /// Text does not match the field's pattern.
    Pattern,
    /// Date text is not shaped `DD/MM/YYYY`.
    DateFormat,
    /// Date does not exist in the calendar.
    InvalidDate,
    /// Date lies after today.
    FutureDate,
    /// Numeric value outside the allowed range.
    Range,
    /// Value outside the field's option set.
    Choice,
    /// Organization category requires a PAN but "has PAN" is `no`.
    PanMandatory,
    /// Turnover above the threshold but "has GSTIN" is `no`.
    GstinMandatory,
}

impl ViolationCode {
    /// Stable snake-case name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Kind => "kind",
            Self::Length => "length",
            Self::Charset => "charset",
            Self::Pattern => "pattern",
            Self::DateFormat => "date_format",
            Self::InvalidDate => "invalid_date",
            Self::FutureDate => "future_date",
            Self::Range => "range",
            Self::Choice => "choice",
            Self::PanMandatory => "pan_mandatory",
            Self::GstinMandatory => "gstin_mandatory",
        }
    }
}

impl std::fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-level problem found by a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Violation {
    /// The field the message is shown against.
    pub field: FieldId,
    /// Category of the failed check.
    pub code: ViolationCode,
    /// Message shown to the applicant.
    pub message: String,
    /// Always [`Severity::Error`].
    #[serde(default)]
    pub severity: Severity,
}

impl Violation {
    /// Create an error-severity violation.
    pub fn new(field: FieldId, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.field, self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let v = Violation::new(FieldId::Pan, ViolationCode::Pattern, "bad");
        assert_eq!(v.to_string(), "pan [pattern]: bad");
        assert_eq!(v.severity, Severity::Error);
    }

    #[test]
    fn test_serialization_uses_wire_names() {
        let v = Violation::new(FieldId::HasGstin, ViolationCode::GstinMandatory, "m");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["field"], "hasGstin");
        assert_eq!(json["code"], "gstin_mandatory");
        assert_eq!(json["severity"], "error");
    }
}
