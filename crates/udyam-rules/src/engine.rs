//! # Validation Engine
//!
//! Pure mapping from an answer set to an ordered list of violations.
//!
//! ## Algorithm
//!
//! 1. For every spec, evaluate `required_when`. Required and empty yields a
//!    `required` violation and skips the field's static checks.
//! 2. Present values run the kind check and then the static constraints;
//!    the first failure is the only one reported for the field.
//! 3. Cross-field rules run last. Their violations land after the own
//!    checks of the field they are reported on. A rule never repeats a
//!    category the field already carries, so a missing PAN reported by
//!    step 1 is not reported again by the PAN-details rule.
//! 4. The result is ordered by registry declaration order.
//!
//! Deterministic for a fixed `today`; no I/O. The only error is
//! [`UdyamError::UnknownField`], raised when the answers or a rule refer to
//! a field the registry does not declare.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use udyam_core::{AnswerSet, FieldId, UdyamError};

use crate::cross_field::CROSS_FIELD_RULES;
use crate::registry::Registry;
use crate::violation::{Violation, ViolationCode};

/// Stateless validator bound to a registry and an evaluation date.
#[derive(Debug, Clone, Copy)]
pub struct ValidationEngine<'r> {
    registry: &'r Registry,
    today: NaiveDate,
}

impl ValidationEngine<'static> {
    /// Engine over the standard registry, evaluating dates against the
    /// local calendar date at construction time.
    pub fn standard() -> Self {
        Self::new(Registry::standard(), chrono::Local::now().date_naive())
    }
}

impl<'r> ValidationEngine<'r> {
    /// Engine over `registry` with a fixed "today".
    pub fn new(registry: &'r Registry, today: NaiveDate) -> Self {
        Self { registry, today }
    }

    /// The registry this engine validates against.
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// The date future-date checks compare against.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Validate the whole answer set.
    ///
    /// # Errors
    ///
    /// [`UdyamError::UnknownField`] if `answers` holds a field the registry
    /// does not declare.
    pub fn validate(&self, answers: &AnswerSet) -> Result<Vec<Violation>, UdyamError> {
        for (field, _) in answers.iter() {
            if !self.registry.declares(field) {
                return Err(UdyamError::UnknownField(field.wire_key().to_string()));
            }
        }

        // One bucket per declared field, in declaration order.
        let mut buckets: Vec<(FieldId, Vec<Violation>)> = self
            .registry
            .iter()
            .map(|spec| (spec.id, self.field_violation(spec, answers).into_iter().collect()))
            .collect();

        for rule in CROSS_FIELD_RULES {
            for violation in (rule.apply)(answers, self.registry)? {
                let bucket = buckets
                    .iter_mut()
                    .find(|(id, _)| *id == violation.field)
                    .map(|(_, b)| b)
                    .ok_or_else(|| UdyamError::UnknownField(violation.field.wire_key().to_string()))?;
                if bucket.iter().any(|v| v.code == violation.code) {
                    continue;
                }
                tracing::trace!(rule = rule.name, field = %violation.field, "cross-field violation");
                bucket.push(violation);
            }
        }

        let violations: Vec<Violation> = buckets.into_iter().flat_map(|(_, b)| b).collect();
        tracing::debug!(violations = violations.len(), "validation pass complete");
        Ok(violations)
    }

    /// Validate, keeping only violations on `fields`.
    ///
    /// The full pass still runs, so cross-field rules see every answer.
    ///
    /// # Errors
    ///
    /// Same as [`ValidationEngine::validate`].
    pub fn validate_fields(
        &self,
        answers: &AnswerSet,
        fields: &BTreeSet<FieldId>,
    ) -> Result<Vec<Violation>, UdyamError> {
        let mut violations = self.validate(answers)?;
        violations.retain(|v| fields.contains(&v.field));
        Ok(violations)
    }

    fn field_violation(
        &self,
        spec: &crate::registry::FieldSpec,
        answers: &AnswerSet,
    ) -> Option<Violation> {
        if spec.is_empty_in(answers) {
            return spec.is_required(answers).then(|| {
                Violation::new(spec.id, ViolationCode::Required, spec.required_message)
            });
        }
        let value = answers.get(spec.id)?;
        spec.first_failure(value, self.today)
            .map(|(code, message)| Violation::new(spec.id, code, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use udyam_core::FieldValue;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn engine() -> ValidationEngine<'static> {
        ValidationEngine::new(Registry::standard(), today())
    }

    fn step_one_ok() -> AnswerSet {
        let mut a = AnswerSet::with_defaults();
        a.set(FieldId::AadhaarNumber, "123456789012");
        a.set(FieldId::OwnerName, "Asha Verma");
        a
    }

    fn proprietary_ok() -> AnswerSet {
        let mut a = step_one_ok();
        a.set(FieldId::OrganizationType, "1");
        a.set(FieldId::HasPan, "no");
        a
    }

    fn fields_of(v: &[Violation]) -> Vec<FieldId> {
        v.iter().map(|v| v.field).collect()
    }

    #[test]
    fn test_clean_proprietary_answers() {
        let v = engine().validate(&proprietary_ok()).unwrap();
        assert!(v.is_empty(), "unexpected: {v:?}");
    }

    #[test]
    fn test_empty_answers_report_always_required_fields_in_order() {
        let v = engine().validate(&AnswerSet::new()).unwrap();
        assert_eq!(
            fields_of(&v),
            vec![
                FieldId::AadhaarNumber,
                FieldId::OwnerName,
                FieldId::AadhaarDeclaration,
                FieldId::OrganizationType,
                FieldId::HasPan,
            ]
        );
        assert!(v.iter().all(|v| v.code == ViolationCode::Required));
    }

    #[test]
    fn test_unset_organization_type_fails() {
        let mut a = proprietary_ok();
        a.set(FieldId::OrganizationType, "0");
        let v = engine().validate(&a).unwrap();
        assert_eq!(fields_of(&v), vec![FieldId::OrganizationType]);
        assert_eq!(v[0].message, "Please select a type of organisation.");
    }

    #[test]
    fn test_partnership_without_pan_single_violation_on_has_pan() {
        let mut a = proprietary_ok();
        a.set(FieldId::OrganizationType, "3");
        let v = engine().validate(&a).unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].field, FieldId::HasPan);
        assert_eq!(v[0].code, ViolationCode::PanMandatory);
    }

    #[test]
    fn test_partnership_with_pan_and_empty_block_four_violations() {
        let mut a = proprietary_ok();
        a.set(FieldId::OrganizationType, "3");
        a.set(FieldId::HasPan, "yes");
        let v = engine().validate(&a).unwrap();
        assert_eq!(
            fields_of(&v),
            vec![
                FieldId::Pan,
                FieldId::PanName,
                FieldId::DateOfBirthOrIncorporation,
                FieldId::PanDeclaration,
            ]
        );
        let unique: BTreeSet<_> = fields_of(&v).into_iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_aadhaar_lengths() {
        let mut a = proprietary_ok();
        a.set(FieldId::AadhaarNumber, "12345678901");
        let v = engine().validate(&a).unwrap();
        assert_eq!(fields_of(&v), vec![FieldId::AadhaarNumber]);
        assert_eq!(v[0].code, ViolationCode::Length);

        a.set(FieldId::AadhaarNumber, "123456789012");
        assert!(engine().validate(&a).unwrap().is_empty());
    }

    fn with_pan(pan: &str) -> AnswerSet {
        let mut a = proprietary_ok();
        a.set(FieldId::OrganizationType, "5");
        a.set(FieldId::HasPan, "yes");
        a.set(FieldId::Pan, pan);
        a.set(FieldId::PanName, "Acme Pvt Ltd");
        a.set(FieldId::DateOfBirthOrIncorporation, "15/05/1980");
        a.set(FieldId::DateKind, "DOI");
        a.set(FieldId::PanDeclaration, true);
        a
    }

    #[test]
    fn test_pan_formats() {
        assert!(engine().validate(&with_pan("ABCDE1234F")).unwrap().is_empty());

        let v = engine().validate(&with_pan("abcde1234f")).unwrap();
        assert_eq!(fields_of(&v), vec![FieldId::Pan]);
        assert_eq!(v[0].code, ViolationCode::Pattern);

        let v = engine().validate(&with_pan("ABCDE12345")).unwrap();
        assert_eq!(v[0].code, ViolationCode::Pattern);
    }

    #[test]
    fn test_dates_relative_to_today() {
        let mut a = with_pan("ABCDE1234F");
        a.set(FieldId::DateOfBirthOrIncorporation, "31/02/2023");
        let v = engine().validate(&a).unwrap();
        assert_eq!(v[0].code, ViolationCode::InvalidDate);

        a.set(FieldId::DateOfBirthOrIncorporation, "02/06/2024");
        let v = engine().validate(&a).unwrap();
        assert_eq!(v[0].code, ViolationCode::FutureDate);

        a.set(FieldId::DateOfBirthOrIncorporation, "01/06/2024");
        assert!(engine().validate(&a).unwrap().is_empty());
    }

    #[test]
    fn test_padded_identifiers_fail_their_formats() {
        let mut a = proprietary_ok();
        a.set(FieldId::AadhaarNumber, "123456789012 ");
        let v = engine().validate(&a).unwrap();
        assert_eq!(fields_of(&v), vec![FieldId::AadhaarNumber]);
        assert_eq!(v[0].code, ViolationCode::Length);

        let v = engine().validate(&with_pan(" ABCDE1234F")).unwrap();
        assert_eq!(fields_of(&v), vec![FieldId::Pan]);

        let v = engine().validate(&with_pan("ABCDE 234F")).unwrap();
        assert_eq!(v[0].code, ViolationCode::Pattern);
    }

    #[test]
    fn test_blank_text_counts_as_missing() {
        let mut a = proprietary_ok();
        a.set(FieldId::OwnerName, "   ");
        let v = engine().validate(&a).unwrap();
        assert_eq!(fields_of(&v), vec![FieldId::OwnerName]);
        assert_eq!(v[0].code, ViolationCode::Required);
    }

    #[test]
    fn test_gstin_threshold() {
        let mut a = proprietary_ok();
        a.set(FieldId::HasGstin, "no");
        a.set(FieldId::TotalTurnoverA, 5_000_000.0);
        let v = engine().validate(&a).unwrap();
        assert_eq!(fields_of(&v), vec![FieldId::HasGstin]);
        assert_eq!(v[0].code, ViolationCode::GstinMandatory);

        a.set(FieldId::TotalTurnoverA, 3_000_000.0);
        assert!(engine().validate(&a).unwrap().is_empty());
    }

    #[test]
    fn test_pan_block_present_but_not_required_is_still_format_checked() {
        let mut a = proprietary_ok();
        a.set(FieldId::Pan, "bad");
        let v = engine().validate(&a).unwrap();
        assert_eq!(fields_of(&v), vec![FieldId::Pan]);
        assert_eq!(v[0].code, ViolationCode::Length);
    }

    #[test]
    fn test_unknown_field_is_the_only_error() {
        let narrow = Registry::from_specs(
            Registry::standard()
                .iter()
                .filter(|s| s.id != FieldId::TotalTurnoverB)
                .cloned()
                .collect(),
        );
        let engine = ValidationEngine::new(&narrow, today());
        let mut a = proprietary_ok();
        assert!(engine.validate(&a).is_ok());
        a.set(FieldId::TotalTurnoverB, 1.0);
        assert!(matches!(
            engine.validate(&a),
            Err(UdyamError::UnknownField(k)) if k == "totalTurnoverB"
        ));
    }

    #[test]
    fn test_validate_fields_filters() {
        let fields: BTreeSet<_> = [FieldId::OwnerName].into_iter().collect();
        let v = engine().validate_fields(&AnswerSet::new(), &fields).unwrap();
        assert_eq!(fields_of(&v), vec![FieldId::OwnerName]);
    }

    fn arb_value() -> impl Strategy<Value = Option<FieldValue>> {
        prop_oneof![
            Just(None),
            any::<bool>().prop_map(|b| Some(FieldValue::Flag(b))),
            (-10_000_000.0f64..10_000_000.0).prop_map(|n| Some(FieldValue::Number(n))),
            "[A-Za-z0-9/ ]{0,14}".prop_map(|s| Some(FieldValue::Text(s))),
            prop::sample::select(vec!["yes", "no", "0", "1", "3", "9", "DOB", "ABCDE1234F", "15/05/1980"])
                .prop_map(|s| Some(FieldValue::text(s))),
        ]
    }

    fn arb_answers() -> impl Strategy<Value = AnswerSet> {
        prop::collection::vec(arb_value(), FieldId::ALL.len()).prop_map(|values| {
            FieldId::ALL
                .iter()
                .zip(values)
                .filter_map(|(id, v)| v.map(|v| (*id, v)))
                .collect()
        })
    }

    proptest! {
        /// Validation is deterministic and idempotent.
        #[test]
        fn validate_is_deterministic(answers in arb_answers()) {
            let first = engine().validate(&answers).unwrap();
            let second = engine().validate(&answers).unwrap();
            prop_assert_eq!(first, second);
        }

        /// No field is reported twice for the same category.
        #[test]
        fn no_duplicate_field_code_pairs(answers in arb_answers()) {
            let v = engine().validate(&answers).unwrap();
            let pairs: BTreeSet<_> = v.iter().map(|v| (v.field, v.code.as_str())).collect();
            prop_assert_eq!(pairs.len(), v.len());
        }

        /// Violations come out in declaration order.
        #[test]
        fn violations_are_ordered(answers in arb_answers()) {
            let v = engine().validate(&answers).unwrap();
            prop_assert!(v.windows(2).all(|w| w[0].field <= w[1].field));
        }
    }
}
