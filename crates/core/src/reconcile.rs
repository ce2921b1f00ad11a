// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reconciliation of leave intents against the ledger.
//!
//! Given the candidates produced by [`classify_intents`](crate::classify_intents)
//! and the requester's existing records, reconciliation decides which
//! additions are written, which records are deleted, and why everything
//! else was turned away. Steps run in a fixed order:
//!
//! 1. additions whose date the user already holds are rejected
//! 2. additions dated before today are rejected (today is allowed)
//! 3. future cancellations are located in the ledger
//!
//! Cancellations are located before the additions are checked so that a
//! date cancelled and re-added in one request (a change of span) is not
//! counted as held. Their rejections are still reported after those of the
//! additions. Each step builds a new sequence; candidates are never removed
//! in place.
//! Given the same snapshot and candidates the result is identical and keeps
//! the input order.

use crate::error::LedgerError;
use crate::intent::IntakeBatch;
use crate::ledger::{LedgerStore, PartitionId, RowLocation, find_record};
use leave_intake_domain::{CivilDate, LeaveRecord};
use std::collections::HashSet;

/// Why an item of a request was not carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    /// The extractor emitted a command other than `add` or `cancel`.
    InvalidCommand,
    /// The date token was the invalid sentinel or not a `DD/MM/YYYY` date.
    UnparseableDate,
    /// The user already holds leave on this date.
    AlreadyRequested,
    /// The date is before today.
    AlreadyElapsed,
    /// No record exists for the date the user asked to cancel.
    NothingToCancel,
    /// The ledger failed while locating or deleting the record.
    CancellationFailed,
}

/// A rejected item together with the date or raw token it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// The civil date (`DD/MM/YYYY`) or the raw token or command.
    pub subject: String,
    /// Why it was rejected.
    pub reason: RejectionReason,
    /// Underlying error text, for logs only.
    pub detail: Option<String>,
}

impl Rejection {
    /// Creates a rejection without underlying error text.
    #[must_use]
    pub fn new(subject: impl Into<String>, reason: RejectionReason) -> Self {
        Self {
            subject: subject.into(),
            reason,
            detail: None,
        }
    }

    /// Creates a rejection carrying the error that caused it.
    #[must_use]
    pub fn with_detail(
        subject: impl Into<String>,
        reason: RejectionReason,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            reason,
            detail: Some(detail.into()),
        }
    }
}

/// A record marked for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancellation {
    /// The requester.
    pub user_id: String,
    /// The cancelled day.
    pub date: CivilDate,
    /// Where the record was found.
    pub location: RowLocation,
}

/// The outcome of reconciling one message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconciliationResult {
    /// Records to append, in request order.
    pub additions: Vec<LeaveRecord>,
    /// Records to delete, in request order.
    pub cancellations: Vec<Cancellation>,
    /// Everything turned away, in the order it was discovered.
    pub rejections: Vec<Rejection>,
    /// Ledger writes that failed after reconciliation.
    pub failures: Vec<LedgerError>,
}

impl ReconciliationResult {
    /// Groups additions by the year partition they belong in.
    #[must_use]
    pub fn additions_by_partition(&self) -> Vec<(PartitionId, Vec<LeaveRecord>)> {
        group_by_partition(&self.additions)
    }

    /// Returns true when nothing was accepted, rejected or attempted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty()
            && self.cancellations.is_empty()
            && self.rejections.is_empty()
            && self.failures.is_empty()
    }
}

/// Groups records by the year partition they belong in.
///
/// Partitions appear in the order their first record appears; records keep
/// their relative order within a partition.
#[must_use]
pub fn group_by_partition(records: &[LeaveRecord]) -> Vec<(PartitionId, Vec<LeaveRecord>)> {
    let mut groups: Vec<(PartitionId, Vec<LeaveRecord>)> = Vec::new();
    for record in records {
        let partition: PartitionId = PartitionId::of(record.date);
        match groups.iter_mut().find(|(id, _)| *id == partition) {
            Some((_, members)) => members.push(record.clone()),
            None => groups.push((partition, vec![record.clone()])),
        }
    }
    groups
}

/// Reconciles a classified request against the requester's ledger records.
///
/// # Arguments
///
/// * `batch` - Candidates and early rejections from intent classification
/// * `existing` - The requester's records from [`fetch_user_records`](crate::fetch_user_records)
/// * `store` - The ledger, consulted to locate cancellation targets
/// * `today` - The civil date the message was received on
///
/// Ledger failures while locating a cancellation become
/// `CancellationFailed` rejections; nothing is written here.
pub fn reconcile<S: LedgerStore + ?Sized>(
    batch: IntakeBatch,
    existing: &[LeaveRecord],
    store: &mut S,
    today: CivilDate,
) -> ReconciliationResult {
    let IntakeBatch {
        user_id,
        additions,
        cancellations,
        mut rejections,
    } = batch;

    let mut cancellation_rejections: Vec<Rejection> = Vec::new();
    let cancellations: Vec<Cancellation> = locate_cancellations(
        &user_id,
        cancellations,
        store,
        today,
        &mut cancellation_rejections,
    );
    let released: HashSet<CivilDate> = cancellations.iter().map(|c| c.date).collect();

    let additions: Vec<LeaveRecord> =
        exclude_existing_dates(additions, existing, &user_id, &released, &mut rejections);
    let additions: Vec<LeaveRecord> = exclude_before_today(additions, today, &mut rejections);
    rejections.extend(cancellation_rejections);

    ReconciliationResult {
        additions,
        cancellations,
        rejections,
        failures: Vec::new(),
    }
}

/// Drops candidates whose `(user, date)` is already held, including dates
/// repeated earlier in the same request. Dates in `released` are deleted by
/// this request and do not count as held.
fn exclude_existing_dates(
    candidates: Vec<LeaveRecord>,
    existing: &[LeaveRecord],
    user_id: &str,
    released: &HashSet<CivilDate>,
    rejections: &mut Vec<Rejection>,
) -> Vec<LeaveRecord> {
    let mut claimed: HashSet<(String, CivilDate)> = existing
        .iter()
        .filter(|record| !(record.user_id == user_id && released.contains(&record.date)))
        .map(|record| (record.user_id.clone(), record.date))
        .collect();

    candidates
        .into_iter()
        .filter(|candidate| {
            let fresh: bool = claimed.insert((candidate.user_id.clone(), candidate.date));
            if !fresh {
                rejections.push(Rejection::new(
                    candidate.date.to_string(),
                    RejectionReason::AlreadyRequested,
                ));
            }
            fresh
        })
        .collect()
}

fn exclude_before_today(
    candidates: Vec<LeaveRecord>,
    today: CivilDate,
    rejections: &mut Vec<Rejection>,
) -> Vec<LeaveRecord> {
    candidates
        .into_iter()
        .filter(|candidate| {
            let elapsed: bool = candidate.date < today;
            if elapsed {
                rejections.push(Rejection::new(
                    candidate.date.to_string(),
                    RejectionReason::AlreadyElapsed,
                ));
            }
            !elapsed
        })
        .collect()
}

/// Resolves each strictly-future cancellation date to a ledger row.
///
/// Today and past dates, and dates repeated in the request, are skipped
/// without a rejection.
fn locate_cancellations<S: LedgerStore + ?Sized>(
    user_id: &str,
    dates: Vec<CivilDate>,
    store: &mut S,
    today: CivilDate,
    rejections: &mut Vec<Rejection>,
) -> Vec<Cancellation> {
    let mut seen: HashSet<CivilDate> = HashSet::new();
    let mut located: Vec<Cancellation> = Vec::new();

    for date in dates {
        if date <= today || !seen.insert(date) {
            continue;
        }
        match find_record(store, user_id, date, today) {
            Ok(Some(location)) => located.push(Cancellation {
                user_id: user_id.to_string(),
                date,
                location,
            }),
            Ok(None) => rejections.push(Rejection::new(
                date.to_string(),
                RejectionReason::NothingToCancel,
            )),
            Err(err) => rejections.push(Rejection::with_detail(
                date.to_string(),
                RejectionReason::CancellationFailed,
                err.to_string(),
            )),
        }
    }

    located
}
