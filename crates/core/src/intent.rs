// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Adapter from the extractor's reply to typed leave candidates.

use crate::error::CoreError;
use crate::reconcile::{Rejection, RejectionReason};
use leave_intake_domain::{
    CivilDate, DomainError, IntentCommand, LeaveRecord, NormalizedDate, Requester,
    normalize_date_token,
};
use serde::{Deserialize, Deserializer};

/// One intent object as emitted by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawIntent {
    /// Expected to be `add` or `cancel`.
    pub command: String,
    /// Leave category, e.g. ลาพักร้อน.
    #[serde(default)]
    pub leave_type: String,
    /// Date tokens such as `"27/07/2567 เต็มวัน"`.
    #[serde(default, alias = "dates", deserialize_with = "one_or_many")]
    pub date: Vec<String>,
}

/// Extractors occasionally emit a bare string where a list is expected.
fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(token) => vec![token],
        OneOrMany::Many(tokens) => tokens,
    })
}

/// What the extractor said about a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorOutput {
    /// The message is not a leave request.
    NotALeaveRequest,
    /// One or more intents were found.
    Intents(Vec<RawIntent>),
}

/// Parses the extractor's text reply.
///
/// The reply may be wrapped in a Markdown code fence with a `json` tag.
/// An empty reply, `{}`, `[]` or `{[]}` means the message is not a leave
/// request. A single intent object is accepted as a one-element list.
///
/// # Errors
///
/// Returns `CoreError::MalformedExtractorOutput` when the reply is not
/// intent-shaped JSON.
pub fn parse_extractor_output(reply: &str) -> Result<ExtractorOutput, CoreError> {
    let cleaned: &str = strip_code_fence(reply);
    if matches!(cleaned, "" | "{}" | "[]" | "{[]}") {
        return Ok(ExtractorOutput::NotALeaveRequest);
    }

    let value: serde_json::Value = serde_json::from_str(cleaned)
        .map_err(|e| CoreError::MalformedExtractorOutput(e.to_string()))?;

    let intents: Vec<RawIntent> = match value {
        serde_json::Value::Array(ref items) if items.is_empty() => {
            return Ok(ExtractorOutput::NotALeaveRequest);
        }
        serde_json::Value::Object(ref map) if map.is_empty() => {
            return Ok(ExtractorOutput::NotALeaveRequest);
        }
        serde_json::Value::Array(_) => serde_json::from_value(value)
            .map_err(|e| CoreError::MalformedExtractorOutput(e.to_string()))?,
        serde_json::Value::Object(_) => vec![
            serde_json::from_value(value)
                .map_err(|e| CoreError::MalformedExtractorOutput(e.to_string()))?,
        ],
        other => {
            return Err(CoreError::MalformedExtractorOutput(format!(
                "expected a JSON array of intents, got {other}"
            )));
        }
    };

    Ok(ExtractorOutput::Intents(intents))
}

fn strip_code_fence(reply: &str) -> &str {
    let mut text: &str = reply.trim();
    text = text.strip_prefix("```").unwrap_or(text);
    text = text.strip_suffix("```").unwrap_or(text);
    text = text.trim_start();
    text = text.strip_prefix("json").unwrap_or(text);
    text.trim()
}

/// Message metadata stamped onto every record the message produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeContext {
    /// Who sent the message.
    pub requester: Requester,
    /// Civil date the message was received on.
    pub today: CivilDate,
    /// Formatted receipt timestamp for the ledger.
    pub request_timestamp: String,
    /// The original message text.
    pub detail: String,
    /// Permalink to the message, empty when unavailable.
    pub source_link: String,
}

/// Candidates extracted from one message, before reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntakeBatch {
    /// The requester all candidates belong to.
    pub user_id: String,
    /// Leave records to add.
    pub additions: Vec<LeaveRecord>,
    /// Strictly-future dates to cancel.
    pub cancellations: Vec<CivilDate>,
    /// Items dropped during classification.
    pub rejections: Vec<Rejection>,
}

/// Turns raw intents into addition and cancellation candidates.
///
/// Every date token is normalized individually. A token that fails is
/// reported as `UnparseableDate` and the rest of the item still counts, so an
/// `add` item with no valid tokens contributes nothing. Cancellation dates
/// that are today or earlier are skipped without a rejection. Commands other
/// than `add` and `cancel` drop the whole item.
#[must_use]
pub fn classify_intents(intents: &[RawIntent], context: &IntakeContext) -> IntakeBatch {
    let mut batch: IntakeBatch = IntakeBatch {
        user_id: context.requester.user_id.clone(),
        ..IntakeBatch::default()
    };

    for intent in intents {
        let command: IntentCommand = match intent.command.parse() {
            Ok(command) => command,
            Err(err) => {
                batch.rejections.push(Rejection::with_detail(
                    intent.command.clone(),
                    RejectionReason::InvalidCommand,
                    err.to_string(),
                ));
                continue;
            }
        };

        for token in &intent.date {
            let normalized: NormalizedDate = match normalize_date_token(token, context.today) {
                Ok(normalized) => normalized,
                Err(err) => {
                    batch.rejections.push(token_rejection(token, &err));
                    continue;
                }
            };

            match command {
                IntentCommand::Add => batch
                    .additions
                    .push(build_record(intent, normalized, context)),
                IntentCommand::Cancel => {
                    if normalized.date > context.today {
                        batch.cancellations.push(normalized.date);
                    }
                }
            }
        }
    }

    batch
}

fn token_rejection(token: &str, err: &DomainError) -> Rejection {
    Rejection::with_detail(token, RejectionReason::UnparseableDate, err.to_string())
}

fn build_record(intent: &RawIntent, normalized: NormalizedDate, context: &IntakeContext) -> LeaveRecord {
    LeaveRecord {
        request_timestamp: context.request_timestamp.clone(),
        user_id: context.requester.user_id.clone(),
        user_real_name: context.requester.real_name.clone(),
        user_display_name: context.requester.display_name.clone(),
        leave_type: intent.leave_type.trim().to_string(),
        date: normalized.date,
        span: normalized.span,
        detail: context.detail.clone(),
        source_link: context.source_link.clone(),
    }
}
