// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    MemoryLedger, USER_ID, create_test_context, create_test_record, date, today,
};
use crate::{
    IntakeBatch, PartitionId, RawIntent, ReconciliationResult, Rejection, RejectionReason,
    RowLocation, classify_intents, group_by_partition, reconcile,
};
use leave_intake_domain::LeaveRecord;

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

fn cancel_batch(dates: &[&str]) -> IntakeBatch {
    IntakeBatch {
        user_id: USER_ID.to_string(),
        cancellations: dates.iter().map(|on| date(on)).collect(),
        ..IntakeBatch::default()
    }
}

fn reasons(result: &ReconciliationResult) -> Vec<RejectionReason> {
    result.rejections.iter().map(|r| r.reason).collect()
}

#[test]
fn test_existing_date_is_rejected_for_single_record() {
    let existing: Vec<LeaveRecord> = vec![create_test_record(USER_ID, "27/07/2567")];
    let mut ledger: MemoryLedger = MemoryLedger::with_records(&existing);

    let result: ReconciliationResult =
        reconcile(add_batch(&["27/07/2567"]), &existing, &mut ledger, today());

    assert!(result.additions.is_empty());
    assert_eq!(
        result.rejections,
        vec![Rejection::new("27/07/2567", RejectionReason::AlreadyRequested)]
    );
}

#[test]
fn test_existing_date_is_rejected_regardless_of_snapshot_size() {
    for count in [1_usize, 2, 7] {
        let mut existing: Vec<LeaveRecord> = (0..count)
            .map(|offset| create_test_record(USER_ID, &format!("{:02}/09/2567", offset + 1)))
            .collect();
        existing.push(create_test_record(USER_ID, "27/07/2567"));
        let mut ledger: MemoryLedger = MemoryLedger::with_records(&existing);

        let result: ReconciliationResult =
            reconcile(add_batch(&["27/07/2567"]), &existing, &mut ledger, today());

        assert!(result.additions.is_empty(), "snapshot of {count}");
        assert_eq!(reasons(&result), vec![RejectionReason::AlreadyRequested]);
    }
}

#[test]
fn test_other_users_records_do_not_block_additions() {
    let existing: Vec<LeaveRecord> = vec![create_test_record("U999", "27/07/2567")];
    let mut ledger: MemoryLedger = MemoryLedger::with_records(&existing);

    let result: ReconciliationResult =
        reconcile(add_batch(&["27/07/2567"]), &existing, &mut ledger, today());

    assert_eq!(result.additions.len(), 1);
    assert!(result.rejections.is_empty());
}

#[test]
fn test_repeated_date_in_one_request_is_rejected_once() {
    let mut ledger: MemoryLedger = MemoryLedger::default();

    let result: ReconciliationResult = reconcile(
        add_batch(&["27/07/2567", "28/07/2567", "27/07/2567"]),
        &[],
        &mut ledger,
        today(),
    );

    let dates: Vec<String> = result.additions.iter().map(|r| r.date.to_string()).collect();
    assert_eq!(dates, vec!["27/07/2567", "28/07/2567"]);
    assert_eq!(
        result.rejections,
        vec![Rejection::new("27/07/2567", RejectionReason::AlreadyRequested)]
    );
}

#[test]
fn test_past_dates_are_rejected_and_today_is_accepted() {
    let mut ledger: MemoryLedger = MemoryLedger::default();

    let result: ReconciliationResult = reconcile(
        add_batch(&["23/07/2567", "24/07/2567", "25/07/2567"]),
        &[],
        &mut ledger,
        today(),
    );

    let dates: Vec<String> = result.additions.iter().map(|r| r.date.to_string()).collect();
    assert_eq!(dates, vec!["24/07/2567", "25/07/2567"]);
    assert_eq!(
        result.rejections,
        vec![Rejection::new("23/07/2567", RejectionReason::AlreadyElapsed)]
    );
}

#[test]
fn test_existing_check_runs_before_elapsed_check() {
    let existing: Vec<LeaveRecord> = vec![create_test_record(USER_ID, "20/07/2567")];
    let mut ledger: MemoryLedger = MemoryLedger::with_records(&existing);

    let result: ReconciliationResult =
        reconcile(add_batch(&["20/07/2567"]), &existing, &mut ledger, today());

    assert_eq!(reasons(&result), vec![RejectionReason::AlreadyRequested]);
}

#[test]
fn test_future_cancellation_is_located() {
    let existing: Vec<LeaveRecord> = vec![
        create_test_record(USER_ID, "26/07/2567"),
        create_test_record(USER_ID, "30/07/2567"),
    ];
    let mut ledger: MemoryLedger = MemoryLedger::with_records(&existing);

    let result: ReconciliationResult =
        reconcile(cancel_batch(&["30/07/2567"]), &existing, &mut ledger, today());

    assert_eq!(result.cancellations.len(), 1);
    assert_eq!(
        result.cancellations[0].location,
        RowLocation {
            partition: PartitionId::new(2567),
            row_position: 2,
        }
    );
    assert!(result.rejections.is_empty());
}

#[test]
fn test_cancellation_in_next_year_is_located() {
    let existing: Vec<LeaveRecord> = vec![create_test_record(USER_ID, "03/01/2568")];
    let mut ledger: MemoryLedger = MemoryLedger::with_records(&existing);

    let result: ReconciliationResult =
        reconcile(cancel_batch(&["03/01/2568"]), &existing, &mut ledger, today());

    assert_eq!(result.cancellations[0].location.partition, PartitionId::new(2568));
    assert_eq!(result.cancellations[0].location.row_position, 1);
}

#[test]
fn test_cancellation_today_or_earlier_is_never_located() {
    let existing: Vec<LeaveRecord> = vec![
        create_test_record(USER_ID, "24/07/2567"),
        create_test_record(USER_ID, "20/07/2567"),
    ];
    let mut ledger: MemoryLedger = MemoryLedger::with_records(&existing);

    let result: ReconciliationResult = reconcile(
        cancel_batch(&["24/07/2567", "20/07/2567"]),
        &existing,
        &mut ledger,
        today(),
    );

    assert!(result.cancellations.is_empty());
    assert!(result.rejections.is_empty());
    assert_eq!(ledger.reads, 0);
}

#[test]
fn test_cancellation_without_record_is_reported() {
    let mut ledger: MemoryLedger = MemoryLedger::default();

    let result: ReconciliationResult =
        reconcile(cancel_batch(&["02/08/2567"]), &[], &mut ledger, today());

    assert!(result.cancellations.is_empty());
    assert_eq!(
        result.rejections,
        vec![Rejection::new("02/08/2567", RejectionReason::NothingToCancel)]
    );
    assert_eq!(ledger.writer_calls(), 0);
}

#[test]
fn test_cancellation_read_failure_becomes_rejection() {
    let mut ledger: MemoryLedger = MemoryLedger::default();
    ledger.fail_reads.insert(PartitionId::new(2567));

    let result: ReconciliationResult =
        reconcile(cancel_batch(&["02/08/2567"]), &[], &mut ledger, today());

    assert_eq!(result.rejections.len(), 1);
    assert_eq!(result.rejections[0].reason, RejectionReason::CancellationFailed);
    assert!(result.rejections[0].detail.is_some());
}

#[test]
fn test_repeated_cancellation_is_located_once() {
    let existing: Vec<LeaveRecord> = vec![create_test_record(USER_ID, "30/07/2567")];
    let mut ledger: MemoryLedger = MemoryLedger::with_records(&existing);

    let result: ReconciliationResult = reconcile(
        cancel_batch(&["30/07/2567", "30/07/2567"]),
        &existing,
        &mut ledger,
        today(),
    );

    assert_eq!(result.cancellations.len(), 1);
}

#[test]
fn test_reconcile_is_deterministic() {
    let existing: Vec<LeaveRecord> = vec![
        create_test_record(USER_ID, "27/07/2567"),
        create_test_record(USER_ID, "30/07/2567"),
    ];
    let batch: IntakeBatch = IntakeBatch {
        cancellations: vec![date("30/07/2567"), date("02/08/2567")],
        ..add_batch(&["27/07/2567", "01/08/2567", "20/07/2567"])
    };

    let mut first_ledger: MemoryLedger = MemoryLedger::with_records(&existing);
    let mut second_ledger: MemoryLedger = MemoryLedger::with_records(&existing);
    let first: ReconciliationResult =
        reconcile(batch.clone(), &existing, &mut first_ledger, today());
    let second: ReconciliationResult = reconcile(batch, &existing, &mut second_ledger, today());

    assert_eq!(first, second);
    assert_eq!(
        reasons(&first),
        vec![
            RejectionReason::AlreadyRequested,
            RejectionReason::AlreadyElapsed,
            RejectionReason::NothingToCancel,
        ]
    );
}

#[test]
fn test_accepted_additions_clear_the_snapshot() {
    let existing: Vec<LeaveRecord> = vec![create_test_record(USER_ID, "27/07/2567")];
    let mut ledger: MemoryLedger = MemoryLedger::with_records(&existing);

    let result: ReconciliationResult = reconcile(
        add_batch(&["01/08/2567", "05/08/2567"]),
        &existing,
        &mut ledger,
        today(),
    );

    for record in &result.additions {
        assert!(!existing.iter().any(|e| e.occupies(&record.user_id, record.date)));
        assert!(record.date >= today());
    }
}

#[test]
fn test_early_rejections_are_kept_first() {
    let intents: Vec<RawIntent> = vec![RawIntent {
        command: String::from("add"),
        leave_type: String::from("ลาป่วย"),
        date: vec![String::from("wrong"), String::from("20/07/2567")],
    }];
    let batch: IntakeBatch = classify_intents(&intents, &create_test_context());
    let mut ledger: MemoryLedger = MemoryLedger::default();

    let result: ReconciliationResult = reconcile(batch, &[], &mut ledger, today());

    assert_eq!(
        reasons(&result),
        vec![RejectionReason::UnparseableDate, RejectionReason::AlreadyElapsed]
    );
}

#[test]
fn test_group_by_partition_keeps_first_seen_order() {
    let records: Vec<LeaveRecord> = vec![
        create_test_record(USER_ID, "30/12/2567"),
        create_test_record(USER_ID, "02/01/2568"),
        create_test_record(USER_ID, "31/12/2567"),
    ];

    let groups: Vec<(PartitionId, Vec<LeaveRecord>)> = group_by_partition(&records);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].0, PartitionId::new(2567));
    assert_eq!(groups[0].1.len(), 2);
    assert_eq!(groups[0].1[1].date, date("31/12/2567"));
    assert_eq!(groups[1].0, PartitionId::new(2568));
}

#[test]
fn test_date_cancelled_in_same_request_is_not_held() {
    let existing: Vec<LeaveRecord> = vec![create_test_record(USER_ID, "30/07/2567")];
    let mut ledger: MemoryLedger = MemoryLedger::with_records(&existing);
    let batch: IntakeBatch = IntakeBatch {
        cancellations: vec![date("30/07/2567")],
        ..add_batch(&["30/07/2567", "30/07/2567"])
    };

    let result: ReconciliationResult = reconcile(batch, &existing, &mut ledger, today());

    assert_eq!(result.cancellations.len(), 1);
    assert_eq!(result.additions.len(), 1);
    assert_eq!(result.additions[0].date, date("30/07/2567"));
    assert_eq!(
        result.rejections,
        vec![Rejection::new("30/07/2567", RejectionReason::AlreadyRequested)]
    );
}
