// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Date token normalization.
//!
//! The extractor emits date tokens such as `"27/07/2567 เต็มวัน"`,
//! `"to_day ครึ่งวัน"` or `"wrong date"`. A token is split on whitespace
//! into a date part and a span qualifier:
//!
//! - a "today" sentinel resolves to the civil date of the message
//! - the `wrong` sentinel rejects the token outright
//! - anything else must be a strict `DD/MM/YYYY` civil date
//!
//! The qualifier never fails; see [`LeaveSpan::from_qualifier`].

use crate::civil_date::CivilDate;
use crate::error::DomainError;
use crate::span::LeaveSpan;

/// Date parts that mean "the day the message was sent".
pub const TODAY_SENTINELS: [&str; 3] = ["to_day", "today", "วันนี้"];

/// Date part the extractor uses for dates that do not exist.
pub const INVALID_DATE_SENTINEL: &str = "wrong";

/// A date token resolved to a civil date and span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedDate {
    /// The resolved day.
    pub date: CivilDate,
    /// Full or half day.
    pub span: LeaveSpan,
}

/// Normalizes one extractor date token.
///
/// # Arguments
///
/// * `token` - The raw token, e.g. `"27/07/2567 เต็มวัน"`
/// * `today` - The civil date the message was received on
///
/// # Errors
///
/// Returns `DomainError::UnparseableDate` for the invalid sentinel and
/// `DomainError::DateParseError` for malformed dates.
pub fn normalize_date_token(token: &str, today: CivilDate) -> Result<NormalizedDate, DomainError> {
    let mut parts = token.split_whitespace();
    let date_part: &str = parts.next().unwrap_or_default();
    let qualifier: String = parts.collect::<Vec<&str>>().join(" ");

    if date_part == INVALID_DATE_SENTINEL {
        return Err(DomainError::UnparseableDate {
            token: token.to_string(),
        });
    }

    let date: CivilDate = if TODAY_SENTINELS.contains(&date_part) {
        today
    } else {
        CivilDate::parse(date_part)?
    };

    Ok(NormalizedDate {
        date,
        span: LeaveSpan::from_qualifier(&qualifier),
    })
}
