//! # Field Registry
//!
//! Static catalogue of the wizard's fields: value kind, static constraints,
//! and the predicate that decides when a field is required.
//!
//! ## Invariants
//!
//! - `required_when` is a plain `fn(&AnswerSet) -> bool`. It cannot capture
//!   state, so it is a pure function of the answers by construction.
//! - Specs are kept in declaration order; the validation engine reports
//!   violations in that order.
//! - The standard registry is built once per process ([`Registry::standard`])
//!   and never mutated afterwards.
//!
//! ## Requirement Predicates and Step Gates
//!
//! The PAN block (PAN, PAN holder name, DOB/DOI, PAN declaration) is required
//! only when the organization type is non-proprietary *and* "has PAN" is
//! `yes`. When "has PAN" is `no` the step 2 gate excludes the block, and the
//! predicate is false as well, so the two never disagree.

use std::sync::OnceLock;

use chrono::NaiveDate;

use udyam_core::identity::is_all_digits;
use udyam_core::{
    AadhaarNumber, AnswerSet, DateError, FieldId, FieldValue, FormDate, OrganizationType,
    PanNumber, UdyamError, YesNo,
};

use crate::violation::ViolationCode;

/// Requirement predicate over the answers.
pub type Predicate = fn(&AnswerSet) -> bool;

/// The type of value a field holds and how emptiness is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Free text. Blank after trimming counts as absent.
    Text,
    /// A consent checkbox. `false` counts as absent.
    Consent,
    /// One of a fixed set of option values.
    Choice(&'static [&'static str]),
    /// The organization-type dropdown. The `"0"` placeholder counts as absent.
    Organization,
    /// A `DD/MM/YYYY` date.
    Date,
    /// A number.
    Number,
}

impl ValueKind {
    /// Whether `value` counts as "not provided" for this kind.
    pub fn is_empty(&self, value: Option<&FieldValue>) -> bool {
        let Some(value) = value else {
            return true;
        };
        if value.is_blank() {
            return true;
        }
        match self {
            Self::Consent => value.as_flag() == Some(false),
            Self::Organization => {
                value.as_text() == Some(OrganizationType::UNSET_VALUE)
            }
            _ => false,
        }
    }

    /// Whether the value has the JSON type this kind expects.
    fn accepts(&self, value: &FieldValue) -> bool {
        match self {
            Self::Text | Self::Choice(_) | Self::Organization | Self::Date => {
                value.as_text().is_some()
            }
            Self::Consent => value.as_flag().is_some(),
            Self::Number => value.as_number().is_some(),
        }
    }
}

/// A static check applied to a present value.
///
/// Constraints run in declaration order; the first failure is the only one
/// reported for the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Text length (in characters) must equal `len`.
    ExactLength {
        /// Required length.
        len: usize,
        /// Message on failure.
        message: &'static str,
    },
    /// Text length (in characters) must not exceed `max`.
    MaxLength {
        /// Maximum length.
        max: usize,
        /// Message on failure.
        message: &'static str,
    },
    /// Text must consist of ASCII digits only.
    DigitsOnly {
        /// Message on failure.
        message: &'static str,
    },
    /// Text must match the PAN pattern.
    PanPattern {
        /// Message on failure.
        message: &'static str,
    },
    /// Text must be shaped `DD/MM/YYYY`.
    DateFormat {
        /// Message on failure.
        message: &'static str,
    },
    /// The date must exist in the calendar.
    CalendarDate {
        /// Message on failure.
        message: &'static str,
    },
    /// The date must not be after today.
    NotInFuture {
        /// Message on failure.
        message: &'static str,
    },
    /// Text must be one of the field's option values.
    OneOf {
        /// Allowed values.
        options: &'static [&'static str],
        /// Message on failure.
        message: &'static str,
    },
    /// Text must be a known organization type value.
    KnownOrganizationType {
        /// Message on failure.
        message: &'static str,
    },
    /// Number must be at least `min`.
    Minimum {
        /// Inclusive lower bound.
        min: f64,
        /// Message on failure.
        message: &'static str,
    },
}

impl Constraint {
    /// Check a present value. Returns the failure category and message.
    ///
    /// Text is checked as entered, so padding counts toward length and
    /// charset.
    pub fn check(
        &self,
        value: &FieldValue,
        today: NaiveDate,
    ) -> Option<(ViolationCode, &'static str)> {
        let text = value.as_text();
        match *self {
            Self::ExactLength { len, message } => text
                .filter(|t| t.chars().count() != len)
                .map(|_| (ViolationCode::Length, message)),
            Self::MaxLength { max, message } => text
                .filter(|t| t.chars().count() > max)
                .map(|_| (ViolationCode::Length, message)),
            Self::DigitsOnly { message } => text
                .filter(|t| !is_all_digits(t))
                .map(|_| (ViolationCode::Charset, message)),
            Self::PanPattern { message } => text
                .filter(|t| !PanNumber::matches_pattern(t))
                .map(|_| (ViolationCode::Pattern, message)),
            Self::DateFormat { message } => text
                .filter(|t| FormDate::parse(t) == Err(DateError::Format))
                .map(|_| (ViolationCode::DateFormat, message)),
            Self::CalendarDate { message } => text
                .filter(|t| FormDate::parse(t) == Err(DateError::Calendar))
                .map(|_| (ViolationCode::InvalidDate, message)),
            Self::NotInFuture { message } => text
                .and_then(|t| FormDate::parse(t).ok())
                .filter(|d| d.is_after(today))
                .map(|_| (ViolationCode::FutureDate, message)),
            Self::OneOf { options, message } => text
                .filter(|t| !options.contains(t))
                .map(|_| (ViolationCode::Choice, message)),
            Self::KnownOrganizationType { message } => text
                .filter(|t| OrganizationType::parse_option(t).is_err())
                .map(|_| (ViolationCode::Choice, message)),
            Self::Minimum { min, message } => value
                .as_number()
                .filter(|n| n.is_nan() || *n < min)
                .map(|_| (ViolationCode::Range, message)),
        }
    }
}

/// Declaration of one wizard field.
#[derive(Clone)]
pub struct FieldSpec {
    /// The field.
    pub id: FieldId,
    /// Label shown by the renderer.
    pub label: &'static str,
    /// Value kind.
    pub kind: ValueKind,
    /// Static constraints, in evaluation order.
    pub constraints: Vec<Constraint>,
    /// When the field must be present.
    pub required_when: Predicate,
    /// Message when required but absent.
    pub required_message: &'static str,
    /// Message when the value has the wrong type.
    pub kind_message: &'static str,
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("constraints", &self.constraints)
            .finish_non_exhaustive()
    }
}

impl FieldSpec {
    /// Whether the field is required for these answers.
    pub fn is_required(&self, answers: &AnswerSet) -> bool {
        (self.required_when)(answers)
    }

    /// Whether the field's value counts as not provided.
    pub fn is_empty_in(&self, answers: &AnswerSet) -> bool {
        self.kind.is_empty(answers.get(self.id))
    }

    /// First failing static check for a present value, including the
    /// kind check that precedes all constraints.
    pub fn first_failure(
        &self,
        value: &FieldValue,
        today: NaiveDate,
    ) -> Option<(ViolationCode, &'static str)> {
        if !self.kind.accepts(value) {
            return Some((ViolationCode::Kind, self.kind_message));
        }
        self.constraints
            .iter()
            .find_map(|c| c.check(value, today))
    }
}

/// Immutable catalogue of field specs in declaration order.
#[derive(Debug, Clone)]
pub struct Registry {
    specs: Vec<FieldSpec>,
}

impl Registry {
    /// Build a registry from specs, kept in the given order.
    pub fn from_specs(specs: Vec<FieldSpec>) -> Self {
        Self { specs }
    }

    /// The process-wide registry of the registration wizard.
    pub fn standard() -> &'static Registry {
        static STANDARD: OnceLock<Registry> = OnceLock::new();
        STANDARD.get_or_init(|| Registry::from_specs(standard_specs()))
    }

    /// Look up a field's spec.
    ///
    /// # Errors
    ///
    /// [`UdyamError::UnknownField`] if this registry does not declare `id`.
    pub fn spec_for(&self, id: FieldId) -> Result<&FieldSpec, UdyamError> {
        self.specs
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| UdyamError::UnknownField(id.wire_key().to_string()))
    }

    /// Whether `id` is declared.
    pub fn declares(&self, id: FieldId) -> bool {
        self.specs.iter().any(|s| s.id == id)
    }

    /// Specs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.specs.iter()
    }

    /// Field ids in declaration order.
    pub fn field_ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.specs.iter().map(|s| s.id)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether no field is declared.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

// ─── Requirement predicates ──────────────────────────────────────────

/// Always required.
pub fn always(_: &AnswerSet) -> bool {
    true
}

/// Never required; checked only when present.
pub fn never(_: &AnswerSet) -> bool {
    false
}

/// The PAN block is required for non-proprietary organizations that
/// declare a PAN.
pub fn pan_block_required(answers: &AnswerSet) -> bool {
    answers.is_non_proprietary() && answers.yes_no(FieldId::HasPan) == Some(YesNo::Yes)
}

// ─── Standard catalogue ──────────────────────────────────────────────

const YES_NO: &[&str] = &["yes", "no"];
const DATE_KINDS: &[&str] = &["DOB", "DOI"];

const NAME_MAX: usize = 100;

fn standard_specs() -> Vec<FieldSpec> {
    vec![
        FieldSpec {
            id: FieldId::AadhaarNumber,
            label: "1. Aadhaar Number",
            kind: ValueKind::Text,
            constraints: vec![
                Constraint::ExactLength {
                    len: AadhaarNumber::LEN,
                    message: "Aadhaar must be 12 digits long.",
                },
                Constraint::DigitsOnly {
                    message: "Aadhaar must contain only numbers.",
                },
            ],
            required_when: always,
            required_message: "Aadhaar number is required.",
            kind_message: "Aadhaar number must be entered as text.",
        },
        FieldSpec {
            id: FieldId::OwnerName,
            label: "2. Name of Entrepreneur",
            kind: ValueKind::Text,
            constraints: vec![Constraint::MaxLength {
                max: NAME_MAX,
                message: "Name cannot exceed 100 characters.",
            }],
            required_when: always,
            required_message: "Name of Entrepreneur is required.",
            kind_message: "Name must be entered as text.",
        },
        FieldSpec {
            id: FieldId::AadhaarDeclaration,
            label: "Aadhaar declaration",
            kind: ValueKind::Consent,
            constraints: vec![],
            required_when: always,
            required_message: "You must agree to the Aadhaar declaration.",
            kind_message: "Aadhaar declaration must be ticked or unticked.",
        },
        FieldSpec {
            id: FieldId::OrganizationType,
            label: "3. Type of Organisation",
            kind: ValueKind::Organization,
            constraints: vec![Constraint::KnownOrganizationType {
                message: "Please select a valid type of organisation.",
            }],
            required_when: always,
            required_message: "Please select a type of organisation.",
            kind_message: "Type of organisation must be an option value.",
        },
        FieldSpec {
            id: FieldId::HasPan,
            label: "4. Do you have PAN?",
            kind: ValueKind::Choice(YES_NO),
            constraints: vec![Constraint::OneOf {
                options: YES_NO,
                message: "Please answer Yes or No.",
            }],
            required_when: always,
            required_message: "Please say whether you have a PAN.",
            kind_message: "Please answer Yes or No.",
        },
        FieldSpec {
            id: FieldId::Pan,
            label: "4.1 PAN",
            kind: ValueKind::Text,
            constraints: vec![
                Constraint::ExactLength {
                    len: PanNumber::LEN,
                    message: "PAN must be 10 characters long.",
                },
                Constraint::PanPattern {
                    message: "Invalid PAN format (e.g., ABCDE1234F).",
                },
            ],
            required_when: pan_block_required,
            required_message: "PAN number is required.",
            kind_message: "PAN must be entered as text.",
        },
        FieldSpec {
            id: FieldId::PanName,
            label: "4.1.1 Name of PAN Holder",
            kind: ValueKind::Text,
            constraints: vec![Constraint::MaxLength {
                max: NAME_MAX,
                message: "Name cannot exceed 100 characters.",
            }],
            required_when: pan_block_required,
            required_message: "Name of PAN Holder is required.",
            kind_message: "Name must be entered as text.",
        },
        FieldSpec {
            id: FieldId::DateOfBirthOrIncorporation,
            label: "4.1.2 DOB or DOI as per PAN",
            kind: ValueKind::Date,
            constraints: vec![
                Constraint::DateFormat {
                    message: "Date format is DD/MM/YYYY.",
                },
                Constraint::CalendarDate {
                    message: "Invalid date provided.",
                },
                Constraint::NotInFuture {
                    message: "Date cannot be in the future.",
                },
            ],
            required_when: pan_block_required,
            required_message: "DOB or DOI is required.",
            kind_message: "Date must be entered as DD/MM/YYYY text.",
        },
        FieldSpec {
            id: FieldId::DateKind,
            label: "4.1.3 DOB or DOI",
            kind: ValueKind::Choice(DATE_KINDS),
            constraints: vec![Constraint::OneOf {
                options: DATE_KINDS,
                message: "Please choose DOB or DOI.",
            }],
            required_when: never,
            required_message: "Please choose DOB or DOI.",
            kind_message: "Please choose DOB or DOI.",
        },
        FieldSpec {
            id: FieldId::PanDeclaration,
            label: "PAN declaration",
            kind: ValueKind::Consent,
            constraints: vec![],
            required_when: pan_block_required,
            required_message: "You must agree to the PAN declaration.",
            kind_message: "PAN declaration must be ticked or unticked.",
        },
        FieldSpec {
            id: FieldId::HasGstin,
            label: "5. Do you have GSTIN?",
            kind: ValueKind::Choice(YES_NO),
            constraints: vec![Constraint::OneOf {
                options: YES_NO,
                message: "Please answer Yes or No.",
            }],
            required_when: never,
            required_message: "Please say whether you have a GSTIN.",
            kind_message: "Please answer Yes or No.",
        },
        FieldSpec {
            id: FieldId::TotalTurnoverA,
            label: "Total Turnover (A)",
            kind: ValueKind::Number,
            constraints: vec![Constraint::Minimum {
                min: 0.0,
                message: "Turnover cannot be negative.",
            }],
            required_when: never,
            required_message: "Total Turnover (A) is required.",
            kind_message: "Turnover must be a number.",
        },
        FieldSpec {
            id: FieldId::TotalTurnoverB,
            label: "Total Turnover (B)",
            kind: ValueKind::Number,
            constraints: vec![Constraint::Minimum {
                min: 0.0,
                message: "Turnover cannot be negative.",
            }],
            required_when: never,
            required_message: "Total Turnover (B) is required.",
            kind_message: "Turnover must be a number.",
        },
    ]
}
