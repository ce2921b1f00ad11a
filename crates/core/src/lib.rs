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

mod apply;
mod error;
mod feedback;
mod intent;
mod ledger;
mod reconcile;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{apply_to_ledger, reconcile_and_apply};
pub use error::{CoreError, LedgerError};
pub use feedback::{REQUEST_FAILED_MESSAGE, Reply, ThreadTarget, compose_feedback, rejection_message};
pub use intent::{
    ExtractorOutput, IntakeBatch, IntakeContext, RawIntent, classify_intents,
    parse_extractor_output,
};
pub use ledger::{
    LEDGER_COLUMNS, LedgerStore, PartitionId, RowLocation, StoredRecord, fetch_user_records,
    find_record,
};
pub use reconcile::{
    Cancellation, ReconciliationResult, Rejection, RejectionReason, group_by_partition, reconcile,
};
