//! Calendar quarter selection.
//!
//! The LICW challenge runs per quarter. A quarter is written as `2025Q3`,
//! `Q3-2025`, `Q3/2025`, or just `Q3` for the current year, in any case.

use chrono::{Datelike, NaiveDate, Utc};
use thiserror::Error;

use crate::challenge::DateRange;

/// Errors from user-supplied date selectors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuarterError {
    #[error("Invalid quarter specifier: {0} (expected e.g. 2025Q3 or Q3)")]
    InvalidSpecifier(String),

    #[error("Quarter out of range: {0} (expected 1 to 4)")]
    OutOfRange(String),

    #[error("Invalid year in quarter specifier: {0}")]
    InvalidYear(String),

    #[error("Invalid date: {0} (expected YYYYMMDD)")]
    InvalidDate(String),
}

/// A calendar quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quarter {
    pub year: i32,
    /// 1 to 4.
    pub number: u32,
}

impl Quarter {
    /// Parse a quarter specifier, taking the current UTC year if none is given.
    pub fn parse(input: &str) -> Result<Self, QuarterError> {
        Self::parse_with_default_year(input, Utc::now().year())
    }

    /// Parse a quarter specifier, using `default_year` if none is given.
    pub fn parse_with_default_year(input: &str, default_year: i32) -> Result<Self, QuarterError> {
        let spec = input.trim().to_ascii_uppercase();
        let Some(q) = spec.find('Q') else {
            return Err(QuarterError::InvalidSpecifier(input.to_string()));
        };

        // Either YYYYQn, or Qn optionally followed by -YYYY or /YYYY.
        let (number, year) = if q == 0 {
            let rest = &spec[1..];
            match rest.find(['-', '/']) {
                Some(sep) => (&rest[..sep], Some(&rest[sep + 1..])),
                None => (rest, None),
            }
        } else {
            (&spec[q + 1..], Some(&spec[..q]))
        };

        let number: u32 = number
            .trim()
            .parse()
            .map_err(|_| QuarterError::InvalidSpecifier(input.to_string()))?;
        if !(1..=4).contains(&number) {
            return Err(QuarterError::OutOfRange(input.to_string()));
        }

        let year = match year {
            Some(year) => year
                .trim()
                .parse::<i32>()
                .ok()
                .filter(|y| (1..=9999).contains(y))
                .ok_or_else(|| QuarterError::InvalidYear(input.to_string()))?,
            None => default_year,
        };

        Ok(Quarter { year, number })
    }

    pub fn first_day(&self) -> NaiveDate {
        let month = (self.number - 1) * 3 + 1;
        NaiveDate::from_ymd_opt(self.year, month, 1).unwrap_or_default()
    }

    pub fn last_day(&self) -> NaiveDate {
        let next = if self.number == 4 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.number * 3 + 1, 1)
        };
        next.and_then(|d| d.pred_opt()).unwrap_or_default()
    }

    /// Inclusive YYYYMMDD bounds of this quarter.
    pub fn date_range(&self) -> DateRange {
        DateRange::new(
            Some(to_yyyymmdd(self.first_day())),
            Some(to_yyyymmdd(self.last_day())),
        )
    }
}

/// Encode a date as a YYYYMMDD integer.
pub fn to_yyyymmdd(date: NaiveDate) -> u32 {
    date.year() as u32 * 10_000 + date.month() * 100 + date.day()
}

/// Parse and check a YYYYMMDD date.
pub fn parse_yyyymmdd(input: &str) -> Result<u32, QuarterError> {
    NaiveDate::parse_from_str(input.trim(), "%Y%m%d")
        .ok()
        .filter(|d| (1..=9999).contains(&d.year()))
        .map(to_yyyymmdd)
        .ok_or_else(|| QuarterError::InvalidDate(input.to_string()))
}
