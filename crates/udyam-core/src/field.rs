//! # Field Identifiers and Values
//!
//! The wizard collects thirteen fields. [`FieldId`] enumerates them in
//! declaration order; the derived `Ord` follows that order, so any
//! `BTreeMap<FieldId, _>` iterates the way the registry declares fields.
//!
//! Wire keys match the submission payload of the registration endpoint
//! (`adharno`, `ownername`, `aadhaarDeclaration`, ...).

use serde::{Deserialize, Serialize};

use crate::error::UdyamError;

/// Number of declared wizard fields.
pub const FIELD_COUNT: usize = 13;

/// Identifier of a wizard field.
///
/// Variants are listed in declaration order. Do not reorder: violation
/// ordering and submission payload ordering derive from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldId {
    /// 12-digit Aadhaar number.
    #[serde(rename = "adharno")]
    AadhaarNumber,
    /// Name of the entrepreneur as per Aadhaar.
    #[serde(rename = "ownername")]
    OwnerName,
    /// Consent to the Aadhaar declaration.
    #[serde(rename = "aadhaarDeclaration")]
    AadhaarDeclaration,
    /// Type of organisation (enumerated option value).
    #[serde(rename = "organizationType")]
    OrganizationType,
    /// Whether the applicant has a PAN (`yes` / `no`).
    #[serde(rename = "hasPan")]
    HasPan,
    /// 10-character PAN.
    #[serde(rename = "pan")]
    Pan,
    /// Name of the PAN holder.
    #[serde(rename = "panName")]
    PanName,
    /// Date of birth or incorporation as per PAN (`DD/MM/YYYY`).
    #[serde(rename = "dob")]
    DateOfBirthOrIncorporation,
    /// Which date the `dob` field carries (`DOB` / `DOI`).
    #[serde(rename = "dobType")]
    DateKind,
    /// Consent to the PAN declaration.
    #[serde(rename = "panDeclaration")]
    PanDeclaration,
    /// Whether the applicant has a GSTIN (`yes` / `no`).
    #[serde(rename = "hasGstin")]
    HasGstin,
    /// Total turnover (A).
    #[serde(rename = "totalTurnoverA")]
    TotalTurnoverA,
    /// Total turnover (B).
    #[serde(rename = "totalTurnoverB")]
    TotalTurnoverB,
}

impl FieldId {
    /// All fields, in declaration order.
    pub const ALL: [FieldId; FIELD_COUNT] = [
        Self::AadhaarNumber,
        Self::OwnerName,
        Self::AadhaarDeclaration,
        Self::OrganizationType,
        Self::HasPan,
        Self::Pan,
        Self::PanName,
        Self::DateOfBirthOrIncorporation,
        Self::DateKind,
        Self::PanDeclaration,
        Self::HasGstin,
        Self::TotalTurnoverA,
        Self::TotalTurnoverB,
    ];

    /// Fields whose edit invalidates a previous PAN approval.
    pub const PAN_SENSITIVE: [FieldId; 6] = [
        Self::OrganizationType,
        Self::HasPan,
        Self::Pan,
        Self::PanName,
        Self::DateOfBirthOrIncorporation,
        Self::PanDeclaration,
    ];

    /// The wire key used in answer files and the submission payload.
    pub fn wire_key(&self) -> &'static str {
        match self {
            Self::AadhaarNumber => "adharno",
            Self::OwnerName => "ownername",
            Self::AadhaarDeclaration => "aadhaarDeclaration",
            Self::OrganizationType => "organizationType",
            Self::HasPan => "hasPan",
            Self::Pan => "pan",
            Self::PanName => "panName",
            Self::DateOfBirthOrIncorporation => "dob",
            Self::DateKind => "dobType",
            Self::PanDeclaration => "panDeclaration",
            Self::HasGstin => "hasGstin",
            Self::TotalTurnoverA => "totalTurnoverA",
            Self::TotalTurnoverB => "totalTurnoverB",
        }
    }

    /// Whether editing this field clears a previous PAN approval.
    pub fn is_pan_sensitive(&self) -> bool {
        Self::PAN_SENSITIVE.contains(self)
    }

    /// Position in declaration order (0-based).
    pub fn position(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_key())
    }
}

impl std::str::FromStr for FieldId {
    type Err = UdyamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.wire_key() == s)
            .ok_or_else(|| UdyamError::UnknownField(s.to_string()))
    }
}

/// A single answer value.
///
/// Enumerated answers (organization type, yes/no choices) are carried as
/// [`FieldValue::Text`] holding the option value; the rule layer checks
/// membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Checkbox state.
    Flag(bool),
    /// Numeric input.
    Number(f64),
    /// Free text or an enumerated option value.
    Text(String),
}

impl FieldValue {
    /// Convenience constructor for text values.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// The text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The flag, if this is a boolean value.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// The number, if this is a numeric value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether the value counts as "not provided".
    ///
    /// Text is blank when it is empty after trimming. Flags and numbers are
    /// never blank here; consent semantics (`false` means not given) belong
    /// to the field's kind.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Flag(_) | Self::Number(_) => false,
        }
    }

    /// Short name of the value's JSON type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Flag(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_all_is_in_declaration_order() {
        for (i, id) in FieldId::ALL.iter().enumerate() {
            assert_eq!(id.position(), i);
        }
        let mut sorted = FieldId::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, FieldId::ALL.to_vec());
    }

    #[test]
    fn test_wire_key_round_trip_for_every_field() {
        for id in FieldId::ALL {
            assert_eq!(FieldId::from_str(id.wire_key()).unwrap(), id);
        }
    }

    #[test]
    fn test_unknown_wire_key_rejected() {
        let err = FieldId::from_str("gstin").unwrap_err();
        assert!(matches!(err, UdyamError::UnknownField(k) if k == "gstin"));
    }

    #[test]
    fn test_serde_uses_wire_keys() {
        let json = serde_json::to_string(&FieldId::DateOfBirthOrIncorporation).unwrap();
        assert_eq!(json, "\"dob\"");
        let parsed: FieldId = serde_json::from_str("\"totalTurnoverA\"").unwrap();
        assert_eq!(parsed, FieldId::TotalTurnoverA);
    }

    #[test]
    fn test_pan_sensitive_group() {
        assert!(FieldId::OrganizationType.is_pan_sensitive());
        assert!(FieldId::PanDeclaration.is_pan_sensitive());
        assert!(!FieldId::AadhaarNumber.is_pan_sensitive());
        assert!(!FieldId::HasGstin.is_pan_sensitive());
        assert!(!FieldId::DateKind.is_pan_sensitive());
    }

    #[test]
    fn test_field_value_untagged_deserialization() {
        let v: FieldValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, FieldValue::Flag(true));
        let v: FieldValue = serde_json::from_str("4000000").unwrap();
        assert_eq!(v, FieldValue::Number(4_000_000.0));
        let v: FieldValue = serde_json::from_str("\"yes\"").unwrap();
        assert_eq!(v, FieldValue::text("yes"));
    }

    #[test]
    fn test_blank_detection() {
        assert!(FieldValue::text("").is_blank());
        assert!(FieldValue::text("   ").is_blank());
        assert!(!FieldValue::text("x").is_blank());
        assert!(!FieldValue::Flag(false).is_blank());
        assert!(!FieldValue::Number(0.0).is_blank());
    }
}
