// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::LedgerRow;
use crate::diesel_schema::{ledger_partitions, ledger_rows};
use crate::error::PersistenceError;

/// Looks up a partition's id by spreadsheet and sheet name.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the partition does not exist.
pub fn find_partition_id(
    conn: &mut SqliteConnection,
    spreadsheet: &str,
    sheet_name: &str,
) -> Result<Option<i64>, PersistenceError> {
    debug!(spreadsheet, sheet_name, "Looking up ledger partition");

    let partition_id: Option<i64> = ledger_partitions::table
        .filter(ledger_partitions::spreadsheet.eq(spreadsheet))
        .filter(ledger_partitions::sheet_name.eq(sheet_name))
        .select(ledger_partitions::partition_id)
        .first(conn)
        .optional()?;

    Ok(partition_id)
}

/// Returns a partition's header row.
///
/// # Errors
///
/// Returns an error if the query fails or the stored header is not a JSON
/// list of strings.
pub fn partition_header(
    conn: &mut SqliteConnection,
    partition_id: i64,
) -> Result<Vec<String>, PersistenceError> {
    let header_json: String = ledger_partitions::table
        .filter(ledger_partitions::partition_id.eq(partition_id))
        .select(ledger_partitions::header_json)
        .first(conn)?;

    Ok(serde_json::from_str(&header_json)?)
}

/// Returns every data row of a partition in row order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn partition_rows(
    conn: &mut SqliteConnection,
    partition_id: i64,
) -> Result<Vec<LedgerRow>, PersistenceError> {
    let rows: Vec<LedgerRow> = ledger_rows::table
        .filter(ledger_rows::partition_id.eq(partition_id))
        .order(ledger_rows::row_id.asc())
        .select(LedgerRow::as_select())
        .load(conn)?;

    debug!(partition_id, row_count = rows.len(), "Loaded ledger rows");
    Ok(rows)
}

/// Returns the data row at a 1-based position within a partition.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the partition has fewer rows.
pub fn row_at_position(
    conn: &mut SqliteConnection,
    partition_id: i64,
    row_position: usize,
) -> Result<Option<LedgerRow>, PersistenceError> {
    let Some(offset) = row_position
        .checked_sub(1)
        .and_then(|offset| i64::try_from(offset).ok())
    else {
        return Ok(None);
    };

    let row: Option<LedgerRow> = ledger_rows::table
        .filter(ledger_rows::partition_id.eq(partition_id))
        .order(ledger_rows::row_id.asc())
        .offset(offset)
        .select(LedgerRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row)
}
