// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side view over the leave ledger.
//!
//! The ledger is partitioned by civil year: one sheet per Buddhist Era year,
//! each starting with a header row followed by data rows in the fixed
//! [`LEDGER_COLUMNS`] order. Row positions are 1-based data rows, so row 1
//! is the first record beneath the header.

use crate::error::LedgerError;
use leave_intake_domain::{CivilDate, LeaveRecord};

/// Header row written once when a partition is created.
pub const LEDGER_COLUMNS: [&str; 9] = [
    "วันที่แจ้ง (time stamp)",
    "user_id",
    "ชื่อ-นามสกุล",
    "ชื่อเล่น",
    "ประเภทลา",
    "วันที่ลา",
    "ลาเต็มวันหรือครึ่งวัน",
    "รายละเอียด",
    "slack",
];

/// Identifies one year partition of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionId {
    /// The Buddhist Era year this partition holds.
    civil_year: i32,
}

impl PartitionId {
    /// Creates a partition identifier for a civil year.
    #[must_use]
    pub const fn new(civil_year: i32) -> Self {
        Self { civil_year }
    }

    /// Returns the partition a date's record belongs in.
    #[must_use]
    pub fn of(date: CivilDate) -> Self {
        Self::new(date.civil_year())
    }

    /// Returns the civil year.
    #[must_use]
    pub const fn civil_year(&self) -> i32 {
        self.civil_year
    }

    /// Returns the sheet name used by the backing store (e.g. `2567`).
    #[must_use]
    pub fn sheet_name(&self) -> String {
        self.civil_year.to_string()
    }
}

impl std::fmt::Display for PartitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.civil_year)
    }
}

/// Where a record lives in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowLocation {
    /// The year partition.
    pub partition: PartitionId,
    /// 1-based data row position within the partition.
    pub row_position: usize,
}

/// A record read back from the ledger together with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// 1-based data row position within the partition.
    pub row_position: usize,
    /// The decoded record.
    pub record: LeaveRecord,
}

/// Storage backend for the leave ledger.
///
/// Implementations are external shared state with no transactions; every
/// call is a single best-effort attempt.
pub trait LedgerStore {
    /// Reads every data row of a partition in row order.
    ///
    /// Returns `Ok(None)` when the partition does not exist.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ReadFailed` if the backend cannot be read.
    fn read_partition(
        &mut self,
        partition: PartitionId,
    ) -> Result<Option<Vec<StoredRecord>>, LedgerError>;

    /// Creates the partition with its header row if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::WriteFailed` if the partition cannot be created.
    fn ensure_partition(&mut self, partition: PartitionId) -> Result<(), LedgerError>;

    /// Appends records as new rows at the end of an existing partition.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::WriteFailed` on the first row that fails;
    /// earlier rows stay written.
    fn append_records(
        &mut self,
        partition: PartitionId,
        records: &[LeaveRecord],
    ) -> Result<(), LedgerError>;

    /// Deletes the row at `location` if it still holds `(user_id, date)`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StaleRow` when the row no longer matches and
    /// `LedgerError::DeleteFailed` when the backend rejects the delete.
    fn delete_record(
        &mut self,
        location: RowLocation,
        user_id: &str,
        date: CivilDate,
    ) -> Result<(), LedgerError>;
}

/// Fetches every record a user holds in the previous, current and next
/// civil year relative to `today`.
///
/// A missing partition contributes no rows.
///
/// # Errors
///
/// Returns the store's error if any existing partition cannot be read.
pub fn fetch_user_records<S: LedgerStore + ?Sized>(
    store: &mut S,
    user_id: &str,
    today: CivilDate,
) -> Result<Vec<LeaveRecord>, LedgerError> {
    let current_year: i32 = today.civil_year();
    let mut records: Vec<LeaveRecord> = Vec::new();

    for civil_year in [current_year - 1, current_year, current_year + 1] {
        let Some(rows) = store.read_partition(PartitionId::new(civil_year))? else {
            continue;
        };
        records.extend(
            rows.into_iter()
                .map(|row| row.record)
                .filter(|record| record.user_id == user_id),
        );
    }

    Ok(records)
}

/// Locates a user's record for `date` in the current or next civil year.
///
/// Cancellation targets are always today or later, so earlier partitions
/// are never searched.
///
/// # Errors
///
/// Returns the store's error if any existing partition cannot be read.
pub fn find_record<S: LedgerStore + ?Sized>(
    store: &mut S,
    user_id: &str,
    date: CivilDate,
    today: CivilDate,
) -> Result<Option<RowLocation>, LedgerError> {
    let current_year: i32 = today.civil_year();

    for civil_year in [current_year, current_year + 1] {
        let partition: PartitionId = PartitionId::new(civil_year);
        let Some(rows) = store.read_partition(partition)? else {
            continue;
        };
        if let Some(row) = rows.iter().find(|row| row.record.occupies(user_id, date)) {
            return Ok(Some(RowLocation {
                partition,
                row_position: row.row_position,
            }));
        }
    }

    Ok(None)
}
