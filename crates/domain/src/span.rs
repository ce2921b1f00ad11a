// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How much of a day a leave record claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeaveSpan {
    /// The whole working day.
    #[default]
    FullDay,
    /// Half of the working day.
    HalfDay,
}

impl LeaveSpan {
    /// Returns the label written to the ledger's span column (`full_day` / `half_day`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullDay => "full_day",
            Self::HalfDay => "half_day",
        }
    }

    /// Recognizes a span qualifier, returning `None` when it is unknown.
    #[must_use]
    pub fn recognize(qualifier: &str) -> Option<Self> {
        match qualifier.trim().to_lowercase().as_str() {
            "เต็มวัน" | "เต็ม" | "full" | "full_day" | "fullday" | "full day" => {
                Some(Self::FullDay)
            }
            "ครึ่งวัน" | "ครึ่ง" | "half" | "half_day" | "halfday" | "half day" => {
                Some(Self::HalfDay)
            }
            _ => None,
        }
    }

    /// Maps a date token's trailing qualifier to a span.
    ///
    /// Unknown or missing qualifiers fall back to a full day without error.
    #[must_use]
    pub fn from_qualifier(qualifier: &str) -> Self {
        Self::recognize(qualifier).unwrap_or_default()
    }
}

impl FromStr for LeaveSpan {
    type Err = DomainError;

    /// Strict parse used when reading ledger rows back.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::recognize(s).ok_or_else(|| DomainError::InvalidSpan(s.to_string()))
    }
}

impl std::fmt::Display for LeaveSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
