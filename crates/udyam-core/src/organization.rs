//! # Enumerated Answers
//!
//! Option sets for the wizard's choice fields.
//!
//! ## Organization Type Values
//!
//! The option *values* are what the rules key off, not the numbering in the
//! display labels. The registration portal lists "8. Limited Liability
//! Partnership" with value `9`, "9. Society" with value `10`, "10. Trust"
//! with value `11` and "11. Others" with value `8`. That mapping is
//! reproduced exactly.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Type of organisation being registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrganizationType {
    /// Value `1`.
    Proprietary,
    /// Value `2`.
    HinduUndividedFamily,
    /// Value `3`.
    Partnership,
    /// Value `4`.
    CoOperative,
    /// Value `5`.
    PrivateLimitedCompany,
    /// Value `6`.
    PublicLimitedCompany,
    /// Value `7`.
    SelfHelpGroup,
    /// Value `9`, listed eighth.
    LimitedLiabilityPartnership,
    /// Value `10`, listed ninth.
    Society,
    /// Value `11`, listed tenth.
    Trust,
    /// Value `8`, listed last.
    Others,
}

impl OrganizationType {
    /// Option value of the "Type of Organisation" placeholder.
    pub const UNSET_VALUE: &'static str = "0";

    /// All types in display order.
    pub const ALL: [OrganizationType; 11] = [
        Self::Proprietary,
        Self::HinduUndividedFamily,
        Self::Partnership,
        Self::CoOperative,
        Self::PrivateLimitedCompany,
        Self::PublicLimitedCompany,
        Self::SelfHelpGroup,
        Self::LimitedLiabilityPartnership,
        Self::Society,
        Self::Trust,
        Self::Others,
    ];

    /// The option value submitted for this type.
    pub fn value(&self) -> &'static str {
        match self {
            Self::Proprietary => "1",
            Self::HinduUndividedFamily => "2",
            Self::Partnership => "3",
            Self::CoOperative => "4",
            Self::PrivateLimitedCompany => "5",
            Self::PublicLimitedCompany => "6",
            Self::SelfHelpGroup => "7",
            Self::LimitedLiabilityPartnership => "9",
            Self::Society => "10",
            Self::Trust => "11",
            Self::Others => "8",
        }
    }

    /// The display label, numbered in display order.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Proprietary => "1. Proprietary",
            Self::HinduUndividedFamily => "2. Hindu Undivided Family",
            Self::Partnership => "3. Partnership",
            Self::CoOperative => "4. Co-Operative",
            Self::PrivateLimitedCompany => "5. Private Limited Company",
            Self::PublicLimitedCompany => "6. Public Limited Company",
            Self::SelfHelpGroup => "7. Self Help Group",
            Self::LimitedLiabilityPartnership => "8. Limited Liability Partnership",
            Self::Society => "9. Society",
            Self::Trust => "10. Trust",
            Self::Others => "11. Others",
        }
    }

    /// Every type except a sole proprietorship must register with a PAN.
    pub fn is_non_proprietary(&self) -> bool {
        !matches!(self, Self::Proprietary)
    }

    /// Parse an option value, mapping the placeholder to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownOrganizationType`] for values
    /// outside the option set.
    pub fn parse_option(value: &str) -> Result<Option<Self>, ValidationError> {
        let value = value.trim();
        if value == Self::UNSET_VALUE {
            return Ok(None);
        }
        value.parse().map(Some)
    }
}

impl std::str::FromStr for OrganizationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.value() == s)
            .ok_or_else(|| ValidationError::UnknownOrganizationType(s.to_string()))
    }
}

impl std::fmt::Display for OrganizationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Answer to a yes/no radio group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    /// `yes`
    Yes,
    /// `no`
    No,
}

impl YesNo {
    /// The submitted option value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl std::str::FromStr for YesNo {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            other => Err(ValidationError::InvalidYesNo(other.to_string())),
        }
    }
}

impl std::fmt::Display for YesNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which date the PAN date field carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateKind {
    /// Date of birth (individuals, HUF karta).
    #[serde(rename = "DOB")]
    Birth,
    /// Date of incorporation (companies, firms, societies).
    #[serde(rename = "DOI")]
    Incorporation,
}

impl DateKind {
    /// The submitted option value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Birth => "DOB",
            Self::Incorporation => "DOI",
        }
    }
}

impl std::str::FromStr for DateKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "DOB" => Ok(Self::Birth),
            "DOI" => Ok(Self::Incorporation),
            other => Err(ValidationError::InvalidDateKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_mapping_follows_option_values_not_labels() {
        assert_eq!(
            "9".parse::<OrganizationType>().unwrap(),
            OrganizationType::LimitedLiabilityPartnership
        );
        assert_eq!("8".parse::<OrganizationType>().unwrap(), OrganizationType::Others);
        assert_eq!("10".parse::<OrganizationType>().unwrap(), OrganizationType::Society);
        assert_eq!("11".parse::<OrganizationType>().unwrap(), OrganizationType::Trust);
        assert!(OrganizationType::LimitedLiabilityPartnership
            .label()
            .starts_with("8."));
    }

    #[test]
    fn test_values_are_unique() {
        let mut values: Vec<_> = OrganizationType::ALL.iter().map(|t| t.value()).collect();
        values.sort();
        values.dedup();
        assert_eq!(values.len(), OrganizationType::ALL.len());
    }

    #[test]
    fn test_ten_non_proprietary_types() {
        let count = OrganizationType::ALL
            .iter()
            .filter(|t| t.is_non_proprietary())
            .count();
        assert_eq!(count, 10);
        assert!(!OrganizationType::Proprietary.is_non_proprietary());
    }

    #[test]
    fn test_unset_sentinel() {
        assert_eq!(OrganizationType::parse_option("0").unwrap(), None);
        assert!("0".parse::<OrganizationType>().is_err());
        assert!(OrganizationType::parse_option("12").is_err());
        assert_eq!(
            OrganizationType::parse_option("3").unwrap(),
            Some(OrganizationType::Partnership)
        );
    }

    #[test]
    fn test_yes_no_and_date_kind() {
        assert_eq!("yes".parse::<YesNo>().unwrap(), YesNo::Yes);
        assert!("Yes".parse::<YesNo>().is_err());
        assert_eq!("DOI".parse::<DateKind>().unwrap(), DateKind::Incorporation);
        assert!("dob".parse::<DateKind>().is_err());
        assert_eq!(serde_json::to_string(&DateKind::Birth).unwrap(), "\"DOB\"");
    }
}
