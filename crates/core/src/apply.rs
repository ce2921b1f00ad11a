// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::{CoreError, LedgerError};
use crate::intent::IntakeBatch;
use crate::ledger::{LedgerStore, PartitionId, fetch_user_records};
use crate::reconcile::{
    Cancellation, ReconciliationResult, Rejection, RejectionReason, group_by_partition, reconcile,
};
use leave_intake_domain::{CivilDate, LeaveRecord};
use std::collections::HashSet;

/// Writes a reconciliation result to the ledger.
///
/// Deletions run first, highest row first within each partition so that
/// positions resolved during reconciliation stay valid. A failed delete
/// becomes a `CancellationFailed` rejection, and any addition for the same
/// user and date is rejected as `AlreadyRequested` since the old record
/// stays. Additions are then appended per year partition, creating the partition on first use; a partition
/// whose write fails is recorded in `failures` and its records are removed
/// from `additions`.
///
/// # Arguments
///
/// * `result` - The reconciliation result to carry out
/// * `store` - The ledger to write to
///
/// # Returns
///
/// The result reduced to what was actually written, with failures attached.
pub fn apply_to_ledger<S: LedgerStore + ?Sized>(
    result: ReconciliationResult,
    store: &mut S,
) -> ReconciliationResult {
    let ReconciliationResult {
        additions,
        cancellations,
        mut rejections,
        mut failures,
    } = result;

    let outcomes: Vec<Result<(), LedgerError>> = delete_highest_first(&cancellations, store);
    let mut deleted: Vec<Cancellation> = Vec::with_capacity(cancellations.len());
    let mut retained: HashSet<(String, CivilDate)> = HashSet::new();
    for (cancellation, outcome) in cancellations.into_iter().zip(outcomes) {
        match outcome {
            Ok(()) => deleted.push(cancellation),
            Err(err) => {
                rejections.push(Rejection::with_detail(
                    cancellation.date.to_string(),
                    RejectionReason::CancellationFailed,
                    err.to_string(),
                ));
                retained.insert((cancellation.user_id, cancellation.date));
            }
        }
    }

    let additions: Vec<LeaveRecord> = additions
        .into_iter()
        .filter(|record| {
            let held: bool = retained.contains(&(record.user_id.clone(), record.date));
            if held {
                rejections.push(Rejection::new(
                    record.date.to_string(),
                    RejectionReason::AlreadyRequested,
                ));
            }
            !held
        })
        .collect();

    let mut failed_partitions: HashSet<PartitionId> = HashSet::new();
    for (partition, records) in group_by_partition(&additions) {
        if let Err(err) = write_partition(store, partition, &records) {
            failed_partitions.insert(partition);
            failures.push(err);
        }
    }
    let written: Vec<LeaveRecord> = additions
        .into_iter()
        .filter(|record| !failed_partitions.contains(&PartitionId::of(record.date)))
        .collect();

    ReconciliationResult {
        additions: written,
        cancellations: deleted,
        rejections,
        failures,
    }
}

/// Deletes every cancellation, returning outcomes in input order.
fn delete_highest_first<S: LedgerStore + ?Sized>(
    cancellations: &[Cancellation],
    store: &mut S,
) -> Vec<Result<(), LedgerError>> {
    let mut order: Vec<usize> = (0..cancellations.len()).collect();
    order.sort_by(|&a, &b| cancellations[b].location.cmp(&cancellations[a].location));

    let mut outcomes: Vec<Result<(), LedgerError>> = vec![Ok(()); cancellations.len()];
    for idx in order {
        let cancellation: &Cancellation = &cancellations[idx];
        outcomes[idx] = store.delete_record(
            cancellation.location,
            &cancellation.user_id,
            cancellation.date,
        );
    }
    outcomes
}

fn write_partition<S: LedgerStore + ?Sized>(
    store: &mut S,
    partition: PartitionId,
    records: &[LeaveRecord],
) -> Result<(), LedgerError> {
    store.ensure_partition(partition)?;
    store.append_records(partition, records)
}

/// Reconciles a classified request and writes the outcome.
///
/// Reads the requester's records across the three-year window, reconciles
/// the batch against them and applies the result.
///
/// # Errors
///
/// Returns `CoreError::Ledger` only if the requester's records cannot be
/// read; later ledger failures are reported inside the result.
pub fn reconcile_and_apply<S: LedgerStore + ?Sized>(
    batch: IntakeBatch,
    store: &mut S,
    today: CivilDate,
) -> Result<ReconciliationResult, CoreError> {
    let existing: Vec<LeaveRecord> = fetch_user_records(store, &batch.user_id, today)?;
    let result: ReconciliationResult = reconcile(batch, &existing, store, today);
    Ok(apply_to_ledger(result, store))
}
