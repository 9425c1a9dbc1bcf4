//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the identifiers the wizard handles.
//!
//! ## Validation
//!
//! String-based identifiers ([`AadhaarNumber`], [`PanNumber`], [`Pincode`])
//! validate format at construction time. [`SessionId`] is UUID-based and
//! always valid by construction.
//!
//! Format checks here are structural only. The Aadhaar Verhoeff checksum is
//! a registration-endpoint rule and lives in [`crate::verhoeff`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Implement `Deserialize` for string newtypes by routing through `new()`,
/// so invalid values are rejected at deserialization time.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// UUID-based identifiers
// ---------------------------------------------------------------------------

/// Identifier of one interactive wizard session.
///
/// Used only to tell concurrent sessions apart in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// String-based identifiers (validated at construction)
// ---------------------------------------------------------------------------

/// Aadhaar number: exactly 12 ASCII digits.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AadhaarNumber(String);

impl_validating_deserialize!(AadhaarNumber);

impl AadhaarNumber {
    /// Number of digits in an Aadhaar number.
    pub const LEN: usize = 12;

    /// Create an Aadhaar number, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAadhaar`] unless the input is
    /// exactly 12 ASCII digits.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.len() != Self::LEN || !is_all_digits(&s) {
            return Err(ValidationError::InvalidAadhaar(s));
        }
        Ok(Self(s))
    }

    /// Access the digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last four digits, the only part safe to display.
    pub fn last_four(&self) -> &str {
        &self.0[Self::LEN - 4..]
    }
}

impl std::fmt::Debug for AadhaarNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AadhaarNumber(XXXXXXXX{})", self.last_four())
    }
}

impl std::fmt::Display for AadhaarNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "XXXX XXXX {}", self.last_four())
    }
}

/// Permanent Account Number: `AAAAA9999A`.
///
/// Five uppercase ASCII letters, four digits, one uppercase letter.
/// Case-sensitive: `abcde1234f` is rejected, not normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PanNumber(String);

impl_validating_deserialize!(PanNumber);

impl PanNumber {
    /// Number of characters in a PAN.
    pub const LEN: usize = 10;

    /// Create a PAN, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPan`] if the input does not match
    /// the PAN pattern.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !Self::matches_pattern(&s) {
            return Err(ValidationError::InvalidPan(s));
        }
        Ok(Self(s))
    }

    /// Check the PAN pattern without constructing.
    pub fn matches_pattern(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == Self::LEN
            && bytes[..5].iter().all(u8::is_ascii_uppercase)
            && bytes[5..9].iter().all(u8::is_ascii_digit)
            && bytes[9].is_ascii_uppercase()
    }

    /// Access the PAN string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PanNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Postal index number: exactly 6 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Pincode(String);

impl_validating_deserialize!(Pincode);

impl Pincode {
    /// Number of digits in a pincode.
    pub const LEN: usize = 6;

    /// Create a pincode, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPincode`] unless the input is
    /// exactly six ASCII digits.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.len() != Self::LEN || !is_all_digits(&s) {
            return Err(ValidationError::InvalidPincode(s));
        }
        Ok(Self(s))
    }

    /// Access the digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Pincode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-empty and ASCII digits only.
pub fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_aadhaar_accepts_twelve_digits() {
        let a = AadhaarNumber::new("123456789012").unwrap();
        assert_eq!(a.as_str(), "123456789012");
        assert_eq!(a.last_four(), "9012");
    }

    #[test]
    fn test_aadhaar_rejects_eleven_digits() {
        assert!(matches!(
            AadhaarNumber::new("12345678901"),
            Err(ValidationError::InvalidAadhaar(_))
        ));
    }

    #[test]
    fn test_aadhaar_rejects_non_digits() {
        assert!(AadhaarNumber::new("12345678901a").is_err());
        assert!(AadhaarNumber::new("1234 5678 90").is_err());
    }

    #[test]
    fn test_aadhaar_debug_and_display_mask_digits() {
        let a = AadhaarNumber::new("234567890123").unwrap();
        assert!(!format!("{a:?}").contains("23456789"));
        assert_eq!(a.to_string(), "XXXX XXXX 0123");
    }

    #[test]
    fn test_pan_pattern() {
        assert!(PanNumber::new("ABCDE1234F").is_ok());
        assert!(PanNumber::new("abcde1234f").is_err());
        assert!(PanNumber::new("ABCDE12345").is_err());
        assert!(PanNumber::new("ABCD12345F").is_err());
        assert!(PanNumber::new("ABCDE1234FG").is_err());
        assert!(PanNumber::new("").is_err());
    }

    #[test]
    fn test_pan_rejects_multibyte_input_of_same_byte_length() {
        assert!(!PanNumber::matches_pattern("ÄBCD1234F"));
    }

    #[test]
    fn test_pincode() {
        assert!(Pincode::new("110001").is_ok());
        assert!(Pincode::new("11000").is_err());
        assert!(Pincode::new("11000a").is_err());
    }

    #[test]
    fn test_validating_deserialize() {
        let ok: Result<PanNumber, _> = serde_json::from_str("\"ABCDE1234F\"");
        assert!(ok.is_ok());
        let bad: Result<PanNumber, _> = serde_json::from_str("\"abcde1234f\"");
        assert!(bad.is_err());
        let bad: Result<Pincode, _> = serde_json::from_str("\"1\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_session_ids_are_distinct() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    proptest! {
        /// Any 12-digit string is a structurally valid Aadhaar number.
        #[test]
        fn aadhaar_accepts_every_twelve_digit_string(s in "[0-9]{12}") {
            prop_assert!(AadhaarNumber::new(s).is_ok());
        }

        /// Generated PANs always satisfy the pattern; lowercasing breaks it.
        #[test]
        fn pan_pattern_is_case_sensitive(s in "[A-Z]{5}[0-9]{4}[A-Z]") {
            prop_assert!(PanNumber::matches_pattern(&s));
            prop_assert!(!PanNumber::matches_pattern(&s.to_lowercase()));
        }
    }
}
