//! # Form Dates
//!
//! `DD/MM/YYYY` dates as typed into the PAN date field.
//!
//! Parsing distinguishes three outcomes, because the wizard reports them
//! with different messages:
//!
//! - the text is not shaped `DD/MM/YYYY` ([`DateError::Format`]),
//! - the shape is right but the date does not exist, e.g. `31/02/2023`
//!   ([`DateError::Calendar`]),
//! - the date exists ([`FormDate`]).
//!
//! Whether a date lies in the future is a comparison against a caller
//! supplied "today" at day granularity. The type never reads the clock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a date string was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateError {
    /// Not of the form two digits, slash, two digits, slash, four digits.
    #[error("date must be formatted DD/MM/YYYY")]
    Format,
    /// Well-formed but not a real calendar date.
    #[error("date does not exist in the calendar")]
    Calendar,
}

/// A calendar-valid date entered as `DD/MM/YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FormDate(NaiveDate);

impl FormDate {
    /// Parse a `DD/MM/YYYY` string.
    ///
    /// # Errors
    ///
    /// [`DateError::Format`] for shape mismatches, [`DateError::Calendar`]
    /// for impossible dates.
    pub fn parse(s: &str) -> Result<Self, DateError> {
        let bytes = s.as_bytes();
        let shaped = bytes.len() == 10
            && bytes[2] == b'/'
            && bytes[5] == b'/'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
        if !shaped {
            return Err(DateError::Format);
        }

        let day: u32 = s[0..2].parse().map_err(|_| DateError::Format)?;
        let month: u32 = s[3..5].parse().map_err(|_| DateError::Format)?;
        let year: i32 = s[6..10].parse().map_err(|_| DateError::Format)?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(DateError::Calendar)
    }

    /// Wrap an existing date.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Access the inner date.
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// Whether this date is strictly after `today`. Today itself is not.
    pub fn is_after(&self, today: NaiveDate) -> bool {
        self.0 > today
    }
}

impl std::fmt::Display for FormDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%d/%m/%Y"))
    }
}
