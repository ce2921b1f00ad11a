// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{IntakeContext, LedgerError, LedgerStore, PartitionId, RowLocation, StoredRecord};
use leave_intake_domain::{CivilDate, LeaveRecord, LeaveSpan, Requester};
use std::collections::{BTreeMap, HashSet};

pub const USER_ID: &str = "U123";

pub fn date(text: &str) -> CivilDate {
    CivilDate::parse(text).unwrap()
}

pub fn today() -> CivilDate {
    date("24/07/2567")
}

pub fn create_test_requester() -> Requester {
    Requester::new(USER_ID, "Somchai Jaidee", "Chai")
}

pub fn create_test_context() -> IntakeContext {
    IntakeContext {
        requester: create_test_requester(),
        today: today(),
        request_timestamp: String::from("24/07/2567 09:15:00"),
        detail: String::from("ขอลา 27/07/2567"),
        source_link: String::from("https://example.slack.com/archives/C1/p1"),
    }
}

pub fn create_test_record(user_id: &str, on: &str) -> LeaveRecord {
    LeaveRecord {
        request_timestamp: String::from("01/07/2567 10:00:00"),
        user_id: user_id.to_string(),
        user_real_name: String::from("Somchai Jaidee"),
        user_display_name: String::from("Chai"),
        leave_type: String::from("ลาพักร้อน"),
        date: date(on),
        span: LeaveSpan::FullDay,
        detail: String::from("earlier request"),
        source_link: String::new(),
    }
}

/// Ledger held in memory, counting writer calls and failing on demand.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    pub partitions: BTreeMap<PartitionId, Vec<LeaveRecord>>,
    pub reads: usize,
    pub appends: usize,
    pub deletes: usize,
    pub ensures: usize,
    pub fail_reads: HashSet<PartitionId>,
    pub fail_writes: HashSet<PartitionId>,
    pub fail_deletes: HashSet<PartitionId>,
}

impl MemoryLedger {
    pub fn with_records(records: &[LeaveRecord]) -> Self {
        let mut ledger: Self = Self::default();
        for record in records {
            ledger
                .partitions
                .entry(PartitionId::of(record.date))
                .or_default()
                .push(record.clone());
        }
        ledger
    }

    pub fn rows(&self, civil_year: i32) -> Vec<LeaveRecord> {
        self.partitions
            .get(&PartitionId::new(civil_year))
            .cloned()
            .unwrap_or_default()
    }

    pub fn writer_calls(&self) -> usize {
        self.appends + self.deletes + self.ensures
    }
}

impl LedgerStore for MemoryLedger {
    fn read_partition(
        &mut self,
        partition: PartitionId,
    ) -> Result<Option<Vec<StoredRecord>>, LedgerError> {
        self.reads += 1;
        if self.fail_reads.contains(&partition) {
            return Err(LedgerError::ReadFailed {
                partition,
                message: String::from("read refused"),
            });
        }
        Ok(self.partitions.get(&partition).map(|rows| {
            rows.iter()
                .enumerate()
                .map(|(idx, record)| StoredRecord {
                    row_position: idx + 1,
                    record: record.clone(),
                })
                .collect()
        }))
    }

    fn ensure_partition(&mut self, partition: PartitionId) -> Result<(), LedgerError> {
        self.ensures += 1;
        if self.fail_writes.contains(&partition) {
            return Err(LedgerError::WriteFailed {
                partition,
                message: String::from("write refused"),
            });
        }
        self.partitions.entry(partition).or_default();
        Ok(())
    }

    fn append_records(
        &mut self,
        partition: PartitionId,
        records: &[LeaveRecord],
    ) -> Result<(), LedgerError> {
        self.appends += 1;
        let rows: &mut Vec<LeaveRecord> = self
            .partitions
            .get_mut(&partition)
            .ok_or(LedgerError::PartitionUnavailable(partition))?;
        rows.extend_from_slice(records);
        Ok(())
    }

    fn delete_record(
        &mut self,
        location: RowLocation,
        user_id: &str,
        date: CivilDate,
    ) -> Result<(), LedgerError> {
        self.deletes += 1;
        if self.fail_deletes.contains(&location.partition) {
            return Err(LedgerError::DeleteFailed {
                partition: location.partition,
                row_position: location.row_position,
                message: String::from("delete refused"),
            });
        }
        let rows: &mut Vec<LeaveRecord> = self
            .partitions
            .get_mut(&location.partition)
            .ok_or(LedgerError::PartitionUnavailable(location.partition))?;
        let idx: usize = location.row_position - 1;
        if rows.get(idx).is_none_or(|row| !row.occupies(user_id, date)) {
            return Err(LedgerError::StaleRow {
                partition: location.partition,
                row_position: location.row_position,
            });
        }
        rows.remove(idx);
        Ok(())
    }
}
