// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Thread replies describing a reconciliation outcome.

use crate::reconcile::{ReconciliationResult, Rejection, RejectionReason};

/// Sent once when any ledger write failed, or the request could not be
/// processed at all.
pub const REQUEST_FAILED_MESSAGE: &str = "คําขอล้มเหลว";

const ADDITIONS_SUMMARY_PREFIX: &str = "คุณได้ส่งคําขอลาในวันที่ ";
const CANCELLATIONS_SUMMARY_PREFIX: &str = "คุณได้ส่งคํายกเลิกลาในวันที่ ";

/// The thread a reply is posted into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadTarget {
    /// Channel identifier.
    pub channel_id: String,
    /// Timestamp of the thread's parent message.
    pub thread_ts: String,
}

impl ThreadTarget {
    /// Creates a new `ThreadTarget`.
    #[must_use]
    pub fn new(channel_id: &str, thread_ts: &str) -> Self {
        Self {
            channel_id: channel_id.to_string(),
            thread_ts: thread_ts.to_string(),
        }
    }
}

/// A message to post into a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Where to post.
    pub target: ThreadTarget,
    /// Message text.
    pub text: String,
}

impl Reply {
    /// Creates a new `Reply`.
    #[must_use]
    pub fn new(target: &ThreadTarget, text: impl Into<String>) -> Self {
        Self {
            target: target.clone(),
            text: text.into(),
        }
    }

    /// The generic failure reply.
    #[must_use]
    pub fn request_failed(target: &ThreadTarget) -> Self {
        Self::new(target, REQUEST_FAILED_MESSAGE)
    }
}

/// Renders the requester-facing text for one rejection.
#[must_use]
pub fn rejection_message(rejection: &Rejection) -> String {
    let subject: &str = &rejection.subject;
    match rejection.reason {
        RejectionReason::InvalidCommand => format!("ไม่รองรับคำสั่ง: {subject}"),
        RejectionReason::UnparseableDate => format!("ไม่สามารถอ่านวันที่ได้: {subject}"),
        RejectionReason::AlreadyRequested => format!("ไม่สามารถแจ้งวันที่ลาไปแล้วได้:{subject}"),
        RejectionReason::AlreadyElapsed => format!("ไม่สามารถแจ้งวันที่เลยไปแล้ว: {subject}"),
        RejectionReason::NothingToCancel => format!("ไม่พบวันลาที่ต้องการยกเลิก: {subject}"),
        RejectionReason::CancellationFailed => format!("ยกเลิกวันลาไม่สำเร็จ: {subject}"),
    }
}

/// Composes the replies for a reconciliation result.
///
/// One reply per rejection in discovery order, then one summary of accepted
/// addition dates, then one summary of cancelled dates, then a single
/// failure notice if any ledger write failed. Empty categories produce no
/// reply.
#[must_use]
pub fn compose_feedback(result: &ReconciliationResult, target: &ThreadTarget) -> Vec<Reply> {
    let mut replies: Vec<Reply> = result
        .rejections
        .iter()
        .map(|rejection| Reply::new(target, rejection_message(rejection)))
        .collect();

    if !result.additions.is_empty() {
        let dates: Vec<String> = result
            .additions
            .iter()
            .map(|record| record.date.to_string())
            .collect();
        replies.push(Reply::new(
            target,
            format!("{ADDITIONS_SUMMARY_PREFIX}{}", dates.join(", ")),
        ));
    }

    if !result.cancellations.is_empty() {
        let dates: Vec<String> = result
            .cancellations
            .iter()
            .map(|cancellation| cancellation.date.to_string())
            .collect();
        replies.push(Reply::new(
            target,
            format!("{CANCELLATIONS_SUMMARY_PREFIX}{}", dates.join(", ")),
        ));
    }

    if !result.failures.is_empty() {
        replies.push(Reply::request_failed(target));
    }

    replies
}
