// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite`-backed leave ledger.
//!
//! The ledger is a named spreadsheet of year partitions. Each partition has
//! a header row, written once on creation, and data rows in insertion
//! order. A row's position is its 1-based index among the partition's data
//! rows, so deleting a row shifts every later position down by one.
//!
//! ## Testing
//!
//! [`SqliteLedger::new_in_memory`] gives every caller an isolated shared
//! in-memory database with migrations applied.

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use leave_intake::{LEDGER_COLUMNS, LedgerError, LedgerStore, PartitionId, RowLocation, StoredRecord};
use leave_intake_domain::{CivilDate, LeaveRecord};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use backend::sqlite::MIGRATIONS;
pub use error::PersistenceError;

use data_models::LedgerRow;
use mutations::RowDeletion;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Ledger name used when none is configured.
pub const DEFAULT_SPREADSHEET: &str = "พนักงานลาประจำเดือน";

/// The leave ledger stored in `SQLite`.
pub struct SqliteLedger {
    conn: SqliteConnection,
    spreadsheet: String,
}

impl std::fmt::Debug for SqliteLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteLedger")
            .field("spreadsheet", &self.spreadsheet)
            .finish_non_exhaustive()
    }
}

impl SqliteLedger {
    /// Creates a ledger in a fresh in-memory database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Arguments
    ///
    /// * `spreadsheet` - The ledger name partitions are filed under
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory(spreadsheet: &str) -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:leave_ledger_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            spreadsheet: spreadsheet.to_string(),
        })
    }

    /// Creates a ledger backed by a database file, creating it if needed.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    /// * `spreadsheet` - The ledger name partitions are filed under
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P, spreadsheet: &str) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            spreadsheet: spreadsheet.to_string(),
        })
    }

    /// Returns the ledger name.
    #[must_use]
    pub fn spreadsheet(&self) -> &str {
        &self.spreadsheet
    }

    /// Returns a partition's header row, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn header(&mut self, partition: PartitionId) -> Result<Option<Vec<String>>, PersistenceError> {
        let Some(partition_id) = self.partition_id(partition)? else {
            return Ok(None);
        };
        queries::partition_header(&mut self.conn, partition_id).map(Some)
    }

    fn partition_id(&mut self, partition: PartitionId) -> Result<Option<i64>, PersistenceError> {
        queries::find_partition_id(&mut self.conn, &self.spreadsheet, &partition.sheet_name())
    }

    fn require_partition(&mut self, partition: PartitionId) -> Result<i64, LedgerError> {
        self.partition_id(partition)
            .map_err(|e| LedgerError::WriteFailed {
                partition,
                message: e.to_string(),
            })?
            .ok_or(LedgerError::PartitionUnavailable(partition))
    }
}

/// Decodes rows, keeping each row's position even when a neighbour is
/// skipped as corrupt.
fn stored_records(partition: PartitionId, rows: &[LedgerRow]) -> Vec<StoredRecord> {
    rows.iter()
        .enumerate()
        .filter_map(|(idx, row)| match row.to_record() {
            Ok(record) => Some(StoredRecord {
                row_position: idx + 1,
                record,
            }),
            Err(e) => {
                warn!(%partition, row_position = idx + 1, error = %e, "Skipping unreadable ledger row");
                None
            }
        })
        .collect()
}

impl LedgerStore for SqliteLedger {
    fn read_partition(
        &mut self,
        partition: PartitionId,
    ) -> Result<Option<Vec<StoredRecord>>, LedgerError> {
        let read_failed = |e: PersistenceError| LedgerError::ReadFailed {
            partition,
            message: e.to_string(),
        };

        let Some(partition_id) = self.partition_id(partition).map_err(read_failed)? else {
            return Ok(None);
        };
        let rows: Vec<LedgerRow> =
            queries::partition_rows(&mut self.conn, partition_id).map_err(read_failed)?;

        Ok(Some(stored_records(partition, &rows)))
    }

    fn ensure_partition(&mut self, partition: PartitionId) -> Result<(), LedgerError> {
        let write_failed = |e: PersistenceError| LedgerError::WriteFailed {
            partition,
            message: e.to_string(),
        };

        if self.partition_id(partition).map_err(write_failed)?.is_some() {
            return Ok(());
        }
        mutations::create_partition(
            &mut self.conn,
            &self.spreadsheet,
            &partition.sheet_name(),
            &LEDGER_COLUMNS,
        )
        .map_err(write_failed)?;

        Ok(())
    }

    fn append_records(
        &mut self,
        partition: PartitionId,
        records: &[LeaveRecord],
    ) -> Result<(), LedgerError> {
        let partition_id: i64 = self.require_partition(partition)?;

        for record in records {
            mutations::append_row(&mut self.conn, partition_id, record).map_err(|e| {
                LedgerError::WriteFailed {
                    partition,
                    message: e.to_string(),
                }
            })?;
        }

        Ok(())
    }

    fn delete_record(
        &mut self,
        location: RowLocation,
        user_id: &str,
        date: CivilDate,
    ) -> Result<(), LedgerError> {
        let delete_failed = |e: PersistenceError| LedgerError::DeleteFailed {
            partition: location.partition,
            row_position: location.row_position,
            message: e.to_string(),
        };

        let partition_id: i64 = self
            .partition_id(location.partition)
            .map_err(delete_failed)?
            .ok_or(LedgerError::PartitionUnavailable(location.partition))?;

        match mutations::delete_row_at_position(
            &mut self.conn,
            partition_id,
            location.row_position,
            user_id,
            date,
        )
        .map_err(delete_failed)?
        {
            RowDeletion::Deleted => Ok(()),
            RowDeletion::Mismatch => Err(LedgerError::StaleRow {
                partition: location.partition,
                row_position: location.row_position,
            }),
        }
    }
}
