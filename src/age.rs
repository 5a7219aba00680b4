//! Birthdate parsing and age computation.
//!
//! Ages are computed against an explicit reference date. Nothing in this
//! module reads the system clock.
//!
//! The age rule compares ordinal days of the year rather than month and
//! day, so it can be off by one around February 29:
//!
//! ```
//! use age_pipeline::age::{BirthDate, age_on};
//! use chrono::NaiveDate;
//!
//! let birth = BirthDate::parse("2000/03/01").unwrap(); // day 61 of a leap year
//! let reference = NaiveDate::from_ymd_opt(2031, 3, 1).unwrap(); // day 60
//! assert_eq!(age_on(birth, reference), 30);
//! ```

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::error::PipelineError;

/// Only ages strictly greater than this are counted by default.
pub const DEFAULT_AGE_THRESHOLD: i32 = 30;

/// Layout accepted for birthdates.
pub const BIRTHDATE_FORMAT: &str = "%Y/%m/%d";

/// A calendar date parsed from a `YYYY/MM/DD` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    /// Parse `YYYY/MM/DD` exactly: four-digit year, two-digit month and
    /// day, slash separators, nothing before or after.
    pub fn parse(value: &str) -> Result<Self, PipelineError> {
        let bytes = value.as_bytes();
        let shape_ok = bytes.len() == 10
            && bytes[4] == b'/'
            && bytes[7] == b'/'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !shape_ok {
            return Err(PipelineError::invalid_date(
                value,
                "expected layout YYYY/MM/DD",
            ));
        }

        NaiveDate::parse_from_str(value, BIRTHDATE_FORMAT)
            .map(BirthDate)
            .map_err(|e| PipelineError::invalid_date(value, e.to_string()))
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(BIRTHDATE_FORMAT))
    }
}

/// Age in whole years on `reference`.
///
/// Subtracts the years, then takes one off when the reference day-of-year
/// is earlier than the birth day-of-year.
pub fn age_on(birth: BirthDate, reference: NaiveDate) -> i32 {
    let mut years = reference.year() - birth.0.year();
    if reference.ordinal() < birth.0.ordinal() {
        years -= 1;
    }
    years
}
