// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dates in the local civil (Buddhist Era) calendar.
//!
//! Every date stored in the ledger or shown to a requester is rendered as
//! `DD/MM/YYYY` where `YYYY` is the Buddhist Era year (Gregorian + 543).
//! Internally a `CivilDate` wraps a Gregorian `NaiveDate` so ordering and
//! arithmetic stay in chrono.

use crate::error::DomainError;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Years between the Gregorian and Buddhist Era calendars.
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

/// A calendar day in the local civil calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDate {
    /// The same day in the Gregorian calendar.
    gregorian: NaiveDate,
}

impl CivilDate {
    /// Wraps a Gregorian date.
    #[must_use]
    pub const fn from_gregorian(gregorian: NaiveDate) -> Self {
        Self { gregorian }
    }

    /// Parses a strict `DD/MM/YYYY` civil date.
    ///
    /// Exactly two day digits, two month digits and four year digits are
    /// required so that formatting a parsed date reproduces the input.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateParseError` for anything else.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let malformed = |error: &str| DomainError::DateParseError {
            date_string: input.to_string(),
            error: error.to_string(),
        };

        let bytes: &[u8] = input.as_bytes();
        if bytes.len() != 10 || bytes[2] != b'/' || bytes[5] != b'/' {
            return Err(malformed("expected DD/MM/YYYY"));
        }
        let digits_ok: bool = bytes
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != 2 && *idx != 5)
            .all(|(_, b)| b.is_ascii_digit());
        if !digits_ok {
            return Err(malformed("expected DD/MM/YYYY"));
        }

        let day: u32 = input[0..2]
            .parse()
            .map_err(|_| malformed("invalid day"))?;
        let month: u32 = input[3..5]
            .parse()
            .map_err(|_| malformed("invalid month"))?;
        let civil_year: i32 = input[6..10]
            .parse()
            .map_err(|_| malformed("invalid year"))?;

        let gregorian_year: i32 = civil_year - BUDDHIST_ERA_OFFSET;
        if gregorian_year < 1 {
            return Err(malformed("year precedes the Buddhist Era offset"));
        }

        NaiveDate::from_ymd_opt(gregorian_year, month, day)
            .map(Self::from_gregorian)
            .ok_or_else(|| malformed("no such calendar day"))
    }

    /// Returns the civil date of `instant` as observed in `zone`.
    #[must_use]
    pub fn on(instant: DateTime<Utc>, zone: Tz) -> Self {
        Self::from_gregorian(instant.with_timezone(&zone).date_naive())
    }

    /// Returns the Gregorian date.
    #[must_use]
    pub const fn gregorian(&self) -> NaiveDate {
        self.gregorian
    }

    /// Returns the Buddhist Era year.
    #[must_use]
    pub fn civil_year(&self) -> i32 {
        self.gregorian.year() + BUDDHIST_ERA_OFFSET
    }

    /// Returns the day of the month.
    #[must_use]
    pub fn day(&self) -> u32 {
        self.gregorian.day()
    }

    /// Returns the month number (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.gregorian.month()
    }
}

impl std::fmt::Display for CivilDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}/{:02}/{:04}",
            self.day(),
            self.month(),
            self.civil_year()
        )
    }
}

impl FromStr for CivilDate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CivilDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CivilDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: String = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Renders `instant` in `zone` as `DD/MM/YYYY HH:MM:SS` with a civil year.
///
/// This is the request timestamp written to the first ledger column.
#[must_use]
pub fn format_civil_timestamp(instant: DateTime<Utc>, zone: Tz) -> String {
    let local = instant.with_timezone(&zone);
    format!(
        "{:02}/{:02}/{:04} {}",
        local.day(),
        local.month(),
        local.year() + BUDDHIST_ERA_OFFSET,
        local.format("%H:%M:%S")
    )
}

/// Parses an IANA timezone name such as `Asia/Bangkok`.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` for unknown names.
pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse::<Tz>()
        .map_err(|e| DomainError::InvalidTimezone(format!("{name}: {e}")))
}
