// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_intake_domain::{CivilDate, LeaveRecord};
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{LedgerRow, NewLedgerRow};
use crate::diesel_schema::{ledger_partitions, ledger_rows};
use crate::error::PersistenceError;
use crate::queries::row_at_position;

/// Outcome of a guarded row delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDeletion {
    /// The row held the expected record and was removed.
    Deleted,
    /// The position is empty or holds a different record.
    Mismatch,
}

/// Creates a partition with its header row.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `spreadsheet` - The ledger name the partition belongs to
/// * `sheet_name` - The partition's name, its civil year
/// * `header` - Column headings, stored once
///
/// # Errors
///
/// Returns an error if the partition cannot be inserted, including when it
/// already exists.
pub fn create_partition(
    conn: &mut SqliteConnection,
    spreadsheet: &str,
    sheet_name: &str,
    header: &[&str],
) -> Result<i64, PersistenceError> {
    let header_json: String = serde_json::to_string(header)?;

    diesel::insert_into(ledger_partitions::table)
        .values((
            ledger_partitions::spreadsheet.eq(spreadsheet),
            ledger_partitions::sheet_name.eq(sheet_name),
            ledger_partitions::header_json.eq(&header_json),
        ))
        .execute(conn)?;

    let partition_id: i64 = get_last_insert_rowid(conn)?;
    info!(spreadsheet, sheet_name, partition_id, "Created ledger partition");

    Ok(partition_id)
}

/// Appends one record as the last row of a partition.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn append_row(
    conn: &mut SqliteConnection,
    partition_id: i64,
    record: &LeaveRecord,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(ledger_rows::table)
        .values(NewLedgerRow::from_record(partition_id, record))
        .execute(conn)?;

    let row_id: i64 = get_last_insert_rowid(conn)?;
    debug!(partition_id, row_id, user_id = %record.user_id, date = %record.date, "Appended ledger row");

    Ok(row_id)
}

/// Deletes the row at a 1-based position if it still holds
/// `(user_id, date)`.
///
/// # Errors
///
/// Returns an error if the lookup or the delete fails.
pub fn delete_row_at_position(
    conn: &mut SqliteConnection,
    partition_id: i64,
    row_position: usize,
    user_id: &str,
    date: CivilDate,
) -> Result<RowDeletion, PersistenceError> {
    let Some(row) = row_at_position(conn, partition_id, row_position)? else {
        return Ok(RowDeletion::Mismatch);
    };
    if !holds(&row, user_id, date) {
        return Ok(RowDeletion::Mismatch);
    }

    diesel::delete(ledger_rows::table.filter(ledger_rows::row_id.eq(row.row_id)))
        .execute(conn)?;
    info!(partition_id, row_position, row_id = row.row_id, user_id, "Deleted ledger row");

    Ok(RowDeletion::Deleted)
}

fn holds(row: &LedgerRow, user_id: &str, date: CivilDate) -> bool {
    row.user_id == user_id
        && CivilDate::parse(&row.leave_date).is_ok_and(|stored| stored == date)
}
