//! QSO records and LICW annotation handling.
//!
//! A record is built from the raw ADIF field map of one log entry. The
//! challenge data lives in the free-text comment as
//! `LICW[SPC:NUMBER[LETTERS][:EXTRA,EXTRA,...]]`, for example
//! `LICW[IA:0042s]` or `LICW[ON:17:F2F,FIRST]`.

use std::collections::HashMap;
use std::fmt;

use nom::{
    IResult, Parser,
    character::complete::{alpha0, digit1},
    combinator::eof,
    sequence::terminated,
};

use crate::error::{ParseError, ParseResult};
use crate::points::{DEFAULT_POINTS, DX_KEY, ScoringTables};

/// Uppercase ADIF field name to raw value, for one record.
pub type FieldMap = HashMap<String, String>;

const ANNOTATION_START: &str = "LICW[";

/// A single logged contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qso {
    /// `QSO_DATE` as YYYYMMDD, unset if missing or not a number.
    pub date: Option<u32>,
    /// `TIME_ON` as logged.
    pub time_on: Option<String>,
    /// Band, uppercased (e.g. `40M`).
    pub band: Option<String>,
    /// Worked station, uppercased.
    pub callsign: Option<String>,
    /// Operator name.
    pub name: Option<String>,
    pub mode: Option<String>,
    /// State/province/country code from the annotation.
    pub spc: Option<String>,
    /// Challenge number, digits only.
    pub number: Option<String>,
    /// Single-letter codes following the challenge number.
    pub bonus_letters: String,
    /// Tokens from the optional third annotation segment.
    pub extras: Vec<String>,
    /// Base points.
    pub points: u32,
    /// Bonus points.
    pub bonus: u32,
}

/// Why a record cannot be scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Omission {
    MissingField(&'static str),
    NotCw(String),
}

impl fmt::Display for Omission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Omission::MissingField(field) => write!(f, "missing {}", field),
            Omission::NotCw(mode) => write!(f, "mode {} is not CW", mode),
        }
    }
}

/// The parsed contents of a `LICW[...]` annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Annotation {
    spc: Option<String>,
    number: Option<String>,
    letters: String,
    extras: Vec<String>,
}

impl Qso {
    /// Build a record from a field map, scoring it against `tables`.
    ///
    /// Missing or malformed fields leave the corresponding attribute unset.
    /// Only a comment whose annotation has fewer than two segments is an
    /// error.
    pub fn from_fields(fields: &FieldMap, tables: &ScoringTables) -> ParseResult<Self> {
        let annotation = match field(fields, "COMMENT") {
            Some(comment) => parse_annotation(&comment.to_uppercase())?,
            None => Annotation::default(),
        };

        let mut qso = Qso {
            date: field(fields, "QSO_DATE").and_then(|d| d.parse().ok()),
            time_on: field(fields, "TIME_ON").map(str::to_string),
            band: field(fields, "BAND").map(str::to_ascii_uppercase),
            callsign: field(fields, "CALL").map(str::to_ascii_uppercase),
            name: field(fields, "NAME").map(str::to_string),
            mode: field(fields, "MODE").map(str::to_string),
            spc: annotation.spc,
            number: annotation.number,
            bonus_letters: annotation.letters,
            extras: annotation.extras,
            points: 0,
            bonus: 0,
        };

        if qso.number.is_some() {
            qso.points = qso.base_points(tables);
            qso.bonus = qso.bonus_points(tables);
        }

        Ok(qso)
    }

    /// The first reason this record cannot be scored, if any.
    pub fn omission(&self) -> Option<Omission> {
        let required = [
            ("BAND", self.band.is_some()),
            ("CALL", self.callsign.is_some()),
            ("NAME", self.name.is_some()),
            ("SPC", self.spc.is_some()),
            ("challenge number", self.number.is_some()),
            ("QSO_DATE", self.date.is_some()),
        ];
        if let Some((name, _)) = required.iter().find(|(_, present)| !present) {
            return Some(Omission::MissingField(*name));
        }
        match self.mode.as_deref() {
            None => Some(Omission::MissingField("MODE")),
            Some(mode) if !mode.eq_ignore_ascii_case("CW") => {
                Some(Omission::NotCw(mode.to_string()))
            }
            Some(_) => None,
        }
    }

    /// Whether this record can be scored.
    pub fn is_valid(&self) -> bool {
        self.omission().is_none()
    }

    /// Base plus bonus points.
    pub fn total(&self) -> u32 {
        self.points + self.bonus
    }

    pub fn callsign(&self) -> &str {
        self.callsign.as_deref().unwrap_or_default()
    }

    pub fn band(&self) -> &str {
        self.band.as_deref().unwrap_or_default()
    }

    pub fn spc(&self) -> &str {
        self.spc.as_deref().unwrap_or_default()
    }

    /// Whether the SPC counts as DX: three characters, or literally `DX`.
    pub fn is_dx(&self) -> bool {
        self.spc
            .as_deref()
            .is_some_and(|spc| spc.chars().count() == 3 || spc.eq_ignore_ascii_case(DX_KEY))
    }

    /// Letters and extras, each one a candidate table key.
    fn codes(&self) -> impl Iterator<Item = String> + '_ {
        self.bonus_letters
            .chars()
            .map(String::from)
            .chain(self.extras.iter().cloned())
    }

    /// Highest single primary-table match, or the default.
    fn base_points(&self, tables: &ScoringTables) -> u32 {
        let from_call = self
            .callsign
            .as_deref()
            .and_then(|call| tables.primary(call))
            .unwrap_or(DEFAULT_POINTS);

        self.codes()
            .filter_map(|code| tables.primary(&code))
            .fold(from_call, u32::max)
    }

    /// Sum of every bonus-table match, plus the DX bonus.
    fn bonus_points(&self, tables: &ScoringTables) -> u32 {
        let mut bonus: u32 = self.codes().filter_map(|code| tables.bonus(&code)).sum();
        if self.is_dx() {
            bonus += tables.dx_bonus();
        }
        bonus
    }
}

/// A non-empty, trimmed field value.
fn field<'a>(fields: &'a FieldMap, name: &str) -> Option<&'a str> {
    fields
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// Contents between `LICW[` and the last `]` after it.
fn find_annotation(comment: &str) -> Option<&str> {
    let start = comment.find(ANNOTATION_START)? + ANNOTATION_START.len();
    let rest = &comment[start..];
    let inner = &rest[..rest.rfind(']')?];
    (!inner.is_empty()).then_some(inner)
}

/// Parse the annotation out of an uppercased comment.
fn parse_annotation(comment: &str) -> ParseResult<Annotation> {
    let Some(inner) = find_annotation(comment) else {
        return Ok(Annotation::default());
    };

    let segments: Vec<&str> = inner.split(':').collect();
    if segments.len() < 2 {
        return Err(ParseError::MalformedAnnotation(
            segments.iter().map(|s| s.to_string()).collect(),
        ));
    }

    let spc = Some(segments[0].trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let (number, letters) = match parse_number(segments[1].trim()) {
        Ok((_, (digits, letters))) => (Some(digits.to_string()), letters.to_string()),
        Err(_) => (None, String::new()),
    };

    let extras = segments
        .get(2)
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Annotation {
        spc,
        number,
        letters,
        extras,
    })
}

/// Match `^(\d+)([A-Za-z]*)$`.
fn parse_number(input: &str) -> IResult<&str, (&str, &str)> {
    terminated((digit1, alpha0), eof).parse(input)
}
