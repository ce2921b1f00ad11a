// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ledger::PartitionId;
use thiserror::Error;

/// Errors that can occur while turning an extractor reply into ledger changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The extractor reply is not a JSON array of intents.
    MalformedExtractorOutput(String),
    /// The ledger could not be read or written.
    Ledger(LedgerError),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedExtractorOutput(msg) => {
                write!(f, "Malformed extractor output: {msg}")
            }
            Self::Ledger(err) => write!(f, "Ledger failure: {err}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<LedgerError> for CoreError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

/// Failures reported by a ledger store.
///
/// Every store call is attempted once; callers decide how to report it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A partition could not be read.
    #[error("failed to read ledger partition {partition}: {message}")]
    ReadFailed {
        /// The partition being read.
        partition: PartitionId,
        /// Backend error text.
        message: String,
    },

    /// Rows could not be appended, or the partition could not be created.
    #[error("failed to write ledger partition {partition}: {message}")]
    WriteFailed {
        /// The partition being written.
        partition: PartitionId,
        /// Backend error text.
        message: String,
    },

    /// A row could not be deleted.
    #[error("failed to delete row {row_position} of ledger partition {partition}: {message}")]
    DeleteFailed {
        /// The partition holding the row.
        partition: PartitionId,
        /// 1-based data row position.
        row_position: usize,
        /// Backend error text.
        message: String,
    },

    /// The row at a resolved position no longer holds the expected record.
    #[error("row {row_position} of ledger partition {partition} changed since it was located")]
    StaleRow {
        /// The partition holding the row.
        partition: PartitionId,
        /// 1-based data row position.
        row_position: usize,
    },

    /// The ledger backend is not reachable at all.
    #[error("ledger partition {0} is unavailable")]
    PartitionUnavailable(PartitionId),
}
