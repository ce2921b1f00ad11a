// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors raised while interpreting leave dates and commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A date string is not a strict `DD/MM/YYYY` civil date.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// The extractor marked the date as impossible (the `wrong` sentinel).
    UnparseableDate {
        /// The raw token as received.
        token: String,
    },
    /// Command is neither `add` nor `cancel`.
    InvalidCommand(String),
    /// A stored span label is not recognized.
    InvalidSpan(String),
    /// Timezone name is unknown.
    InvalidTimezone(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::UnparseableDate { token } => write!(f, "Unparseable date: '{token}'"),
            Self::InvalidCommand(command) => {
                write!(f, "Invalid command '{command}'. Must be 'add' or 'cancel'")
            }
            Self::InvalidSpan(span) => write!(f, "Invalid leave span: '{span}'"),
            Self::InvalidTimezone(msg) => write!(f, "Invalid timezone: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
