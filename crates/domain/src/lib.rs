// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod civil_date;
mod error;
mod normalize;
mod span;
mod types;

#[cfg(test)]
mod tests;

pub use civil_date::{
    BUDDHIST_ERA_OFFSET, CivilDate, format_civil_timestamp, parse_timezone,
};
pub use error::DomainError;
pub use normalize::{INVALID_DATE_SENTINEL, NormalizedDate, TODAY_SENTINELS, normalize_date_token};
pub use span::LeaveSpan;
pub use types::{IntentCommand, LeaveRecord, Requester};

/// Re-exported so callers name zones without a direct `chrono-tz` dependency.
pub use chrono_tz::Tz;
