//! # Answer Set
//!
//! The partial mapping from [`FieldId`] to [`FieldValue`] collected by the
//! wizard. Created with declared defaults at wizard start, mutated one
//! field at a time, and serialized as the submission payload.
//!
//! ## Boundary Rules
//!
//! - JSON `null` means "absent", not a value.
//! - Keys outside the declared field set are rejected with
//!   [`UdyamError::UnknownField`]; they are never silently dropped.
//! - Arrays and objects are not answer values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::UdyamError;
use crate::field::{FieldId, FieldValue};
use crate::organization::{OrganizationType, YesNo};

/// Partial set of wizard answers, keyed by field in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<FieldId, FieldValue>);

impl AnswerSet {
    /// An answer set with no values at all.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// The answer set a fresh wizard starts from.
    ///
    /// Aadhaar declaration pre-ticked, "has PAN" pre-set to `yes`, and the
    /// organization type on its unset sentinel.
    pub fn with_defaults() -> Self {
        let mut answers = Self::new();
        answers.set(FieldId::AadhaarDeclaration, FieldValue::Flag(true));
        answers.set(FieldId::HasPan, FieldValue::text(YesNo::Yes.as_str()));
        answers.set(
            FieldId::OrganizationType,
            FieldValue::text(OrganizationType::UNSET_VALUE),
        );
        answers
    }

    /// Assign a value, returning the previous one.
    pub fn set(&mut self, field: FieldId, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.0.insert(field, value.into())
    }

    /// Remove a value, returning it.
    pub fn clear(&mut self, field: FieldId) -> Option<FieldValue> {
        self.0.remove(&field)
    }

    /// Assign by wire key.
    ///
    /// # Errors
    ///
    /// Returns [`UdyamError::UnknownField`] if `key` is not a declared field.
    pub fn set_by_key(&mut self, key: &str, value: impl Into<FieldValue>) -> Result<(), UdyamError> {
        let field: FieldId = key.parse()?;
        self.set(field, value);
        Ok(())
    }

    /// The raw value of a field, if any.
    pub fn get(&self, field: FieldId) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    /// The value of a field unless it is absent or blank text.
    pub fn present(&self, field: FieldId) -> Option<&FieldValue> {
        self.get(field).filter(|v| !v.is_blank())
    }

    /// Text of a field exactly as entered, if it holds non-blank text.
    ///
    /// Surrounding whitespace is kept; it is part of what gets submitted.
    pub fn text(&self, field: FieldId) -> Option<&str> {
        self.present(field).and_then(FieldValue::as_text)
    }

    /// Numeric value of a field, if it holds a number.
    pub fn number(&self, field: FieldId) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_number)
    }

    /// Boolean value of a field, if it holds a flag.
    pub fn flag(&self, field: FieldId) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_flag)
    }

    /// Parsed yes/no answer, if the field holds a recognized one.
    pub fn yes_no(&self, field: FieldId) -> Option<YesNo> {
        self.text(field).and_then(|s| s.parse().ok())
    }

    /// Parsed organization type. The unset sentinel yields `None`.
    pub fn organization_type(&self) -> Option<OrganizationType> {
        self.text(FieldId::OrganizationType)
            .and_then(|s| s.parse().ok())
    }

    /// Whether the organization type is one that mandates a PAN.
    pub fn is_non_proprietary(&self) -> bool {
        self.organization_type()
            .is_some_and(|t| t.is_non_proprietary())
    }

    /// Iterate over present entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    /// Number of fields holding a value.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field holds a value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build an answer set from a JSON object keyed by wire keys.
    ///
    /// # Errors
    ///
    /// - [`UdyamError::UnknownField`] for an undeclared key.
    /// - [`UdyamError::UnsupportedValue`] for arrays, objects, or a
    ///   non-object top level.
    pub fn from_json(value: &Value) -> Result<Self, UdyamError> {
        let object = value.as_object().ok_or_else(|| UdyamError::UnsupportedValue {
            field: "<root>".to_string(),
            reason: "answers must be a JSON object".to_string(),
        })?;

        let mut answers = Self::new();
        for (key, raw) in object {
            let field: FieldId = key.parse()?;
            let value = match raw {
                Value::Null => continue,
                Value::Bool(b) => FieldValue::Flag(*b),
                Value::Number(n) => {
                    let n = n.as_f64().ok_or_else(|| UdyamError::UnsupportedValue {
                        field: key.clone(),
                        reason: format!("number {n} is not representable"),
                    })?;
                    FieldValue::Number(n)
                }
                Value::String(s) => FieldValue::Text(s.clone()),
                Value::Array(_) | Value::Object(_) => {
                    return Err(UdyamError::UnsupportedValue {
                        field: key.clone(),
                        reason: "arrays and objects are not answer values".to_string(),
                    });
                }
            };
            answers.set(field, value);
        }
        Ok(answers)
    }

    /// Serialize as the submission payload.
    ///
    /// Every declared field appears; absent ones as `null`, matching the
    /// optional-field shape the registration endpoint expects.
    pub fn to_submission_json(&self) -> Value {
        let mut object = serde_json::Map::new();
        for field in FieldId::ALL {
            let value = match self.get(field) {
                Some(FieldValue::Flag(b)) => Value::Bool(*b),
                Some(FieldValue::Number(n)) => serde_json::Number::from_f64(*n)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                Some(FieldValue::Text(s)) => Value::String(s.clone()),
                None => Value::Null,
            };
            object.insert(field.wire_key().to_string(), value);
        }
        Value::Object(object)
    }
}

impl<'de> Deserialize<'de> for AnswerSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Self::from_json(&raw).map_err(serde::de::Error::custom)
    }
}

impl FromIterator<(FieldId, FieldValue)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (FieldId, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let a = AnswerSet::with_defaults();
        assert_eq!(a.flag(FieldId::AadhaarDeclaration), Some(true));
        assert_eq!(a.yes_no(FieldId::HasPan), Some(YesNo::Yes));
        assert_eq!(a.text(FieldId::OrganizationType), Some("0"));
        assert_eq!(a.organization_type(), None);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn test_from_json_treats_null_as_absent() {
        let a = AnswerSet::from_json(&json!({"adharno": "234567890123", "pan": null})).unwrap();
        assert_eq!(a.text(FieldId::AadhaarNumber), Some("234567890123"));
        assert!(a.get(FieldId::Pan).is_none());
    }

    #[test]
    fn test_from_json_rejects_unknown_key() {
        let err = AnswerSet::from_json(&json!({"gstinNumber": "x"})).unwrap_err();
        assert!(matches!(err, UdyamError::UnknownField(k) if k == "gstinNumber"));
    }

    #[test]
    fn test_from_json_rejects_nested_values() {
        let err = AnswerSet::from_json(&json!({"ownername": ["a"]})).unwrap_err();
        assert!(matches!(err, UdyamError::UnsupportedValue { .. }));
        let err = AnswerSet::from_json(&json!("not an object")).unwrap_err();
        assert!(matches!(err, UdyamError::UnsupportedValue { .. }));
    }

    #[test]
    fn test_deserialize_routes_through_from_json() {
        let result: Result<AnswerSet, _> = serde_json::from_str(r#"{"bogus": 1}"#);
        assert!(result.is_err());
        let a: AnswerSet = serde_json::from_str(r#"{"totalTurnoverA": 5000000}"#).unwrap();
        assert_eq!(a.number(FieldId::TotalTurnoverA), Some(5_000_000.0));
    }

    #[test]
    fn test_submission_json_lists_every_field() {
        let a = AnswerSet::with_defaults();
        let payload = a.to_submission_json();
        let obj = payload.as_object().unwrap();
        assert_eq!(obj.len(), crate::field::FIELD_COUNT);
        assert_eq!(obj["hasPan"], json!("yes"));
        assert_eq!(obj["pan"], Value::Null);
        assert_eq!(obj["aadhaarDeclaration"], json!(true));
    }

    #[test]
    fn test_text_keeps_padding_and_hides_blank() {
        let mut a = AnswerSet::new();
        a.set(FieldId::OwnerName, "  Asha  ");
        a.set(FieldId::PanName, "   ");
        assert_eq!(a.text(FieldId::OwnerName), Some("  Asha  "));
        assert_eq!(
            a.to_submission_json()["ownername"],
            json!("  Asha  ")
        );
        assert_eq!(a.text(FieldId::PanName), None);
        assert!(a.get(FieldId::PanName).is_some());
    }

    #[test]
    fn test_non_proprietary_detection() {
        let mut a = AnswerSet::new();
        a.set(FieldId::OrganizationType, "1");
        assert!(!a.is_non_proprietary());
        a.set(FieldId::OrganizationType, "3");
        assert!(a.is_non_proprietary());
        a.set(FieldId::OrganizationType, "0");
        assert!(!a.is_non_proprietary());
    }
}
