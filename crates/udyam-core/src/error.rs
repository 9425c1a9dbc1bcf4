//! # Error Hierarchy
//!
//! Structured error types for the wizard, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Business failures (a missing PAN, a future date) are never errors: the
//! rule layer reports them as violations. The types here cover programming
//! misuse and malformed input at the serialization boundary.

use thiserror::Error;

/// Top-level error type for the wizard core.
#[derive(Error, Debug)]
pub enum UdyamError {
    /// A field identifier that the registry does not declare.
    ///
    /// Indicates a mismatch between the caller and the field registry.
    /// This is the only condition that aborts a validation pass.
    #[error("unknown field: \"{0}\"")]
    UnknownField(String),

    /// Identifier newtype validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An answer value of a JSON type the answer set cannot hold.
    #[error("unsupported value for field {field}: {reason}")]
    UnsupportedValue {
        /// Wire key of the field.
        field: String,
        /// What was wrong with the value.
        reason: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors for identifier newtypes.
///
/// Each variant carries the rejected input for diagnostics. Callers that
/// render messages to applicants should use the rule layer's violation
/// messages instead; these are for programmatic construction paths.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Aadhaar number is not exactly 12 ASCII digits.
    #[error("invalid Aadhaar number: \"{0}\" (expected 12 digits)")]
    InvalidAadhaar(String),

    /// PAN does not match `AAAAA9999A`.
    #[error("invalid PAN: \"{0}\" (expected 5 uppercase letters, 4 digits, 1 uppercase letter)")]
    InvalidPan(String),

    /// Postal index number is not exactly 6 ASCII digits.
    #[error("invalid pincode: \"{0}\" (expected 6 digits)")]
    InvalidPincode(String),

    /// Organization type value outside the enumerated set.
    #[error("unknown organization type value: \"{0}\"")]
    UnknownOrganizationType(String),

    /// A yes/no answer that is neither.
    #[error("expected \"yes\" or \"no\", got \"{0}\"")]
    InvalidYesNo(String),

    /// A date-kind answer that is neither DOB nor DOI.
    #[error("expected \"DOB\" or \"DOI\", got \"{0}\"")]
    InvalidDateKind(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_field_display_names_the_key() {
        let err = UdyamError::UnknownField("gstin".into());
        assert_eq!(err.to_string(), "unknown field: \"gstin\"");
    }

    #[test]
    fn validation_error_converts_into_udyam_error() {
        let err: UdyamError = ValidationError::InvalidPan("abc".into()).into();
        let msg = err.to_string();
        assert!(msg.starts_with("validation error"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn json_error_converts() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: UdyamError = bad.into();
        assert!(matches!(err, UdyamError::Json(_)));
    }
}
