// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    MemoryLedger, USER_ID, create_test_context, create_test_record, date, today,
};
use crate::{
    Cancellation, CoreError, IntakeBatch, LedgerError, PartitionId, RawIntent,
    ReconciliationResult, RejectionReason, RowLocation, apply_to_ledger, classify_intents,
    reconcile_and_apply,
};
use leave_intake_domain::{LeaveRecord, LeaveSpan};

fn add_batch(dates: &[&str]) -> IntakeBatch {
    IntakeBatch {
        user_id: USER_ID.to_string(),
        additions: dates
            .iter()
            .map(|on| create_test_record(USER_ID, on))
            .collect(),
        ..IntakeBatch::default()
    }
}

fn cancellation(on: &str, partition: i32, row_position: usize) -> Cancellation {
    Cancellation {
        user_id: USER_ID.to_string(),
        date: date(on),
        location: RowLocation {
            partition: PartitionId::new(partition),
            row_position,
        },
    }
}

#[test]
fn test_request_for_held_date_writes_nothing() {
    let mut ledger: MemoryLedger =
        MemoryLedger::with_records(&[create_test_record(USER_ID, "27/07/2567")]);
    let intents: Vec<RawIntent> = vec![RawIntent {
        command: String::from("add"),
        leave_type: String::from("ลาพักร้อน"),
        date: vec![String::from("27/07/2567")],
    }];
    let batch: IntakeBatch = classify_intents(&intents, &create_test_context());

    let result: ReconciliationResult = reconcile_and_apply(batch, &mut ledger, today()).unwrap();

    assert!(result.additions.is_empty());
    assert_eq!(result.rejections.len(), 1);
    assert_eq!(result.rejections[0].reason, RejectionReason::AlreadyRequested);
    assert_eq!(ledger.writer_calls(), 0);
    assert_eq!(ledger.rows(2567).len(), 1);
}

#[test]
fn test_duplicate_additions_on_held_date_write_nothing() {
    let mut ledger: MemoryLedger =
        MemoryLedger::with_records(&[create_test_record(USER_ID, "27/07/2567")]);

    let result: ReconciliationResult =
        reconcile_and_apply(add_batch(&["27/07/2567", "27/07/2567"]), &mut ledger, today())
            .unwrap();

    assert_eq!(result.rejections.len(), 2);
    assert!(
        result
            .rejections
            .iter()
            .all(|r| r.reason == RejectionReason::AlreadyRequested)
    );
    assert_eq!(ledger.writer_calls(), 0);
}

#[test]
fn test_additions_are_appended_per_year() {
    let mut ledger: MemoryLedger = MemoryLedger::default();

    let result: ReconciliationResult = reconcile_and_apply(
        add_batch(&["30/12/2567", "02/01/2568", "31/12/2567"]),
        &mut ledger,
        today(),
    )
    .unwrap();

    assert_eq!(result.additions.len(), 3);
    assert_eq!(ledger.appends, 2);
    assert_eq!(ledger.ensures, 2);
    let current: Vec<String> = ledger.rows(2567).iter().map(|r| r.date.to_string()).collect();
    assert_eq!(current, vec!["30/12/2567", "31/12/2567"]);
    assert_eq!(ledger.rows(2568).len(), 1);
}

#[test]
fn test_second_run_is_idempotent() {
    let mut ledger: MemoryLedger = MemoryLedger::default();

    let first: ReconciliationResult =
        reconcile_and_apply(add_batch(&["01/08/2567"]), &mut ledger, today()).unwrap();
    let second: ReconciliationResult =
        reconcile_and_apply(add_batch(&["01/08/2567"]), &mut ledger, today()).unwrap();

    assert_eq!(first.additions.len(), 1);
    assert!(second.additions.is_empty());
    assert_eq!(second.rejections[0].reason, RejectionReason::AlreadyRequested);
    assert_eq!(ledger.rows(2567).len(), 1);
}

#[test]
fn test_deletes_run_highest_row_first() {
    let records: Vec<LeaveRecord> = vec![
        create_test_record(USER_ID, "26/07/2567"),
        create_test_record("U999", "27/07/2567"),
        create_test_record(USER_ID, "30/07/2567"),
    ];
    let mut ledger: MemoryLedger = MemoryLedger::with_records(&records);
    let result: ReconciliationResult = ReconciliationResult {
        cancellations: vec![
            cancellation("26/07/2567", 2567, 1),
            cancellation("30/07/2567", 2567, 3),
        ],
        ..ReconciliationResult::default()
    };

    let applied: ReconciliationResult = apply_to_ledger(result, &mut ledger);

    assert_eq!(applied.cancellations.len(), 2);
    assert!(applied.rejections.is_empty());
    let remaining: Vec<LeaveRecord> = ledger.rows(2567);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].user_id, "U999");
}

#[test]
fn test_cancel_round_trip_removes_record() {
    let mut ledger: MemoryLedger =
        MemoryLedger::with_records(&[create_test_record(USER_ID, "30/07/2567")]);
    let batch: IntakeBatch = IntakeBatch {
        user_id: USER_ID.to_string(),
        cancellations: vec![date("30/07/2567")],
        ..IntakeBatch::default()
    };

    let result: ReconciliationResult = reconcile_and_apply(batch, &mut ledger, today()).unwrap();

    assert_eq!(result.cancellations.len(), 1);
    assert!(ledger.rows(2567).is_empty());
}

#[test]
fn test_failed_delete_becomes_rejection() {
    let mut ledger: MemoryLedger =
        MemoryLedger::with_records(&[create_test_record(USER_ID, "30/07/2567")]);
    ledger.fail_deletes.insert(PartitionId::new(2567));
    let result: ReconciliationResult = ReconciliationResult {
        cancellations: vec![cancellation("30/07/2567", 2567, 1)],
        ..ReconciliationResult::default()
    };

    let applied: ReconciliationResult = apply_to_ledger(result, &mut ledger);

    assert!(applied.cancellations.is_empty());
    assert_eq!(applied.rejections.len(), 1);
    assert_eq!(applied.rejections[0].subject, "30/07/2567");
    assert_eq!(applied.rejections[0].reason, RejectionReason::CancellationFailed);
    assert!(applied.failures.is_empty());
}

#[test]
fn test_stale_row_is_not_deleted() {
    let mut ledger: MemoryLedger =
        MemoryLedger::with_records(&[create_test_record("U999", "30/07/2567")]);
    let result: ReconciliationResult = ReconciliationResult {
        cancellations: vec![cancellation("30/07/2567", 2567, 1)],
        ..ReconciliationResult::default()
    };

    let applied: ReconciliationResult = apply_to_ledger(result, &mut ledger);

    assert_eq!(applied.rejections[0].reason, RejectionReason::CancellationFailed);
    assert_eq!(ledger.rows(2567).len(), 1);
}

#[test]
fn test_failed_partition_write_is_isolated() {
    let mut ledger: MemoryLedger = MemoryLedger::default();
    ledger.fail_writes.insert(PartitionId::new(2568));

    let result: ReconciliationResult = reconcile_and_apply(
        add_batch(&["30/12/2567", "02/01/2568"]),
        &mut ledger,
        today(),
    )
    .unwrap();

    assert_eq!(result.additions.len(), 1);
    assert_eq!(result.additions[0].date, date("30/12/2567"));
    assert_eq!(result.failures.len(), 1);
    assert!(matches!(
        result.failures[0],
        LedgerError::WriteFailed { partition, .. } if partition == PartitionId::new(2568)
    ));
    assert_eq!(ledger.rows(2567).len(), 1);
}

#[test]
fn test_unreadable_ledger_aborts_before_writing() {
    let mut ledger: MemoryLedger = MemoryLedger::default();
    ledger.fail_reads.insert(PartitionId::new(2566));

    let result: Result<ReconciliationResult, CoreError> =
        reconcile_and_apply(add_batch(&["01/08/2567"]), &mut ledger, today());

    assert!(matches!(result, Err(CoreError::Ledger(LedgerError::ReadFailed { .. }))));
    assert_eq!(ledger.writer_calls(), 0);
}

fn span_change_intents() -> Vec<RawIntent> {
    vec![
        RawIntent {
            command: String::from("cancel"),
            leave_type: String::from("ลาพักร้อน"),
            date: vec![String::from("30/07/2567 เต็มวัน")],
        },
        RawIntent {
            command: String::from("add"),
            leave_type: String::from("ลาพักร้อน"),
            date: vec![String::from("30/07/2567 ครึ่งวัน")],
        },
    ]
}

#[test]
fn test_cancel_and_add_on_same_date_changes_the_span() {
    let mut ledger: MemoryLedger =
        MemoryLedger::with_records(&[create_test_record(USER_ID, "30/07/2567")]);
    let batch: IntakeBatch = classify_intents(&span_change_intents(), &create_test_context());

    let result: ReconciliationResult = reconcile_and_apply(batch, &mut ledger, today()).unwrap();

    assert!(result.rejections.is_empty());
    assert_eq!(result.cancellations.len(), 1);
    assert_eq!(result.additions.len(), 1);
    let rows: Vec<LeaveRecord> = ledger.rows(2567);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, date("30/07/2567"));
    assert_eq!(rows[0].span, LeaveSpan::HalfDay);
}

#[test]
fn test_failed_delete_keeps_the_old_span() {
    let mut ledger: MemoryLedger =
        MemoryLedger::with_records(&[create_test_record(USER_ID, "30/07/2567")]);
    ledger.fail_deletes.insert(PartitionId::new(2567));
    let batch: IntakeBatch = classify_intents(&span_change_intents(), &create_test_context());

    let result: ReconciliationResult = reconcile_and_apply(batch, &mut ledger, today()).unwrap();

    assert!(result.additions.is_empty());
    assert!(result.cancellations.is_empty());
    let reasons: Vec<RejectionReason> = result.rejections.iter().map(|r| r.reason).collect();
    assert_eq!(
        reasons,
        vec![RejectionReason::CancellationFailed, RejectionReason::AlreadyRequested]
    );
    let rows: Vec<LeaveRecord> = ledger.rows(2567);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].span, LeaveSpan::FullDay);
}
