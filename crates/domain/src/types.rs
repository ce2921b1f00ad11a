// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::civil_date::CivilDate;
use crate::error::DomainError;
use crate::span::LeaveSpan;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The two commands the extractor may emit for an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCommand {
    /// Request new leave days.
    Add,
    /// Withdraw previously requested leave days.
    Cancel,
}

impl IntentCommand {
    /// Returns the wire value of this command.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Cancel => "cancel",
        }
    }
}

impl FromStr for IntentCommand {
    type Err = DomainError;

    /// Only the exact values `add` and `cancel` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "cancel" => Ok(Self::Cancel),
            _ => Err(DomainError::InvalidCommand(s.to_string())),
        }
    }
}

impl std::fmt::Display for IntentCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The chat user a request is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    /// The chat platform's user identifier.
    pub user_id: String,
    /// Full name from the user's profile.
    pub real_name: String,
    /// Display name (nickname) from the user's profile.
    pub display_name: String,
}

impl Requester {
    /// Creates a new `Requester`.
    #[must_use]
    pub fn new(user_id: &str, real_name: &str, display_name: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            real_name: real_name.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

/// One row of the leave ledger.
///
/// The identity of a record is `(user_id, date)`: a user holds at most one
/// record per civil date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// When the request was made, `DD/MM/YYYY HH:MM:SS` in the civil calendar.
    pub request_timestamp: String,
    /// The requester's chat user identifier.
    pub user_id: String,
    /// The requester's full name.
    pub user_real_name: String,
    /// The requester's display name.
    pub user_display_name: String,
    /// Leave category as named by the requester (e.g. ลาป่วย).
    pub leave_type: String,
    /// The day on leave.
    pub date: CivilDate,
    /// Full or half day.
    pub span: LeaveSpan,
    /// The original message text.
    pub detail: String,
    /// Permalink to the originating message.
    pub source_link: String,
}

impl LeaveRecord {
    /// Returns true when this record occupies `date` for `user_id`.
    #[must_use]
    pub fn occupies(&self, user_id: &str, date: CivilDate) -> bool {
        self.user_id == user_id && self.date == date
    }
}
