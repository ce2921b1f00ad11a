// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use leave_intake_domain::{CivilDate, LeaveRecord, LeaveSpan};

use crate::diesel_schema::ledger_rows;
use crate::error::PersistenceError;

/// Diesel Queryable struct for ledger data rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ledger_rows)]
pub struct LedgerRow {
    pub row_id: i64,
    pub request_timestamp: String,
    pub user_id: String,
    pub user_real_name: String,
    pub user_display_name: String,
    pub leave_type: String,
    pub leave_date: String,
    pub leave_span: String,
    pub detail: String,
    pub source_link: String,
}

impl LedgerRow {
    /// Decodes the stored cells into a leave record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRow` if the date or span cell
    /// cannot be read.
    pub fn to_record(&self) -> Result<LeaveRecord, PersistenceError> {
        let date: CivilDate =
            CivilDate::parse(&self.leave_date).map_err(|e| PersistenceError::CorruptRow {
                row_id: self.row_id,
                reason: e.to_string(),
            })?;
        let span: LeaveSpan =
            LeaveSpan::recognize(&self.leave_span).ok_or_else(|| PersistenceError::CorruptRow {
                row_id: self.row_id,
                reason: format!("unknown leave span '{}'", self.leave_span),
            })?;

        Ok(LeaveRecord {
            request_timestamp: self.request_timestamp.clone(),
            user_id: self.user_id.clone(),
            user_real_name: self.user_real_name.clone(),
            user_display_name: self.user_display_name.clone(),
            leave_type: self.leave_type.clone(),
            date,
            span,
            detail: self.detail.clone(),
            source_link: self.source_link.clone(),
        })
    }
}

/// Diesel Insertable struct for new ledger data rows.
#[derive(Debug, Insertable)]
#[diesel(table_name = ledger_rows)]
pub struct NewLedgerRow<'a> {
    pub partition_id: i64,
    pub request_timestamp: &'a str,
    pub user_id: &'a str,
    pub user_real_name: &'a str,
    pub user_display_name: &'a str,
    pub leave_type: &'a str,
    pub leave_date: String,
    pub leave_span: &'static str,
    pub detail: &'a str,
    pub source_link: &'a str,
}

impl<'a> NewLedgerRow<'a> {
    /// Encodes a record in ledger column form.
    ///
    /// The date is written as `DD/MM/YYYY` in the civil calendar and the span
    /// as `full_day` or `half_day`.
    #[must_use]
    pub fn from_record(partition_id: i64, record: &'a LeaveRecord) -> Self {
        Self {
            partition_id,
            request_timestamp: &record.request_timestamp,
            user_id: &record.user_id,
            user_real_name: &record.user_real_name,
            user_display_name: &record.user_display_name,
            leave_type: &record.leave_type,
            leave_date: record.date.to_string(),
            leave_span: record.span.as_str(),
            detail: &record.detail,
            source_link: &record.source_link,
        }
    }
}
