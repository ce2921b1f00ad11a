// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The per-message intake pipeline.
//!
//! One inbound message is verified, de-duplicated, resolved to a requester,
//! sent to the extractor, reconciled against the ledger and answered in its
//! thread. The ledger lock is held from the first read to the last write,
//! so two messages never interleave their ledger work within one process.

use chrono::{DateTime, Utc};
use leave_intake::{
    CoreError, ExtractorOutput, IntakeBatch, IntakeContext, LedgerStore, RawIntent,
    ReconciliationResult, Reply, ThreadTarget, classify_intents, compose_feedback,
    parse_extractor_output, reconcile_and_apply,
};
use leave_intake_domain::{CivilDate, Requester, Tz, format_civil_timestamp};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::auth::verify_token;
use crate::collaborators::{ChatPlatform, IntentExtractor, UserProfile};
use crate::error::{ApiError, translate_core_error};
use crate::idempotency::IdempotencyCache;
use crate::prompt::ExtractionPrompt;
use crate::request_response::{
    EventAck, EventEnvelope, InboundMessage, LEAVE_CONDITION_MARKER, MessageEvent,
    URL_VERIFICATION,
};

/// Static settings of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeSettings {
    /// Shared secret every inbound request must carry.
    pub verification_token: String,
    /// Zone the civil calendar is evaluated in.
    pub timezone: Tz,
}

/// Everything the pipeline needs to process a message.
pub struct IntakeService<S> {
    pub platform: Arc<dyn ChatPlatform>,
    pub extractor: Arc<dyn IntentExtractor>,
    pub ledger: Arc<Mutex<S>>,
    pub dedup: Arc<dyn IdempotencyCache>,
    pub settings: IntakeSettings,
}

impl<S> Clone for IntakeService<S> {
    fn clone(&self) -> Self {
        Self {
            platform: Arc::clone(&self.platform),
            extractor: Arc::clone(&self.extractor),
            ledger: Arc::clone(&self.ledger),
            dedup: Arc::clone(&self.dedup),
            settings: self.settings.clone(),
        }
    }
}

/// What happened to an inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// A handshake; the challenge must be echoed back.
    Challenge(String),
    /// Not a plain user message, or a leave-condition query.
    Ignored,
    /// The delivery was seen before.
    Duplicate,
    /// The requester could not be resolved.
    UnknownUser,
    /// The extractor found no leave request in the message.
    NotALeaveRequest,
    /// The message was reconciled and answered.
    Processed {
        /// What was written and rejected.
        result: ReconciliationResult,
        /// Replies that were posted, in order.
        replies: Vec<Reply>,
    },
    /// The message could not be processed; a failure reply was posted.
    Failed {
        /// Why, for logs.
        reason: String,
    },
}

impl EventOutcome {
    /// The acknowledgement body for every outcome except `Challenge`.
    #[must_use]
    pub fn ack(&self) -> EventAck {
        match self {
            Self::Duplicate => EventAck::ok_with("duplicate detected"),
            Self::UnknownUser => EventAck::ok_with("user not found"),
            Self::NotALeaveRequest => EventAck::status("not really request leave"),
            Self::Challenge(_) | Self::Ignored | Self::Processed { .. } | Self::Failed { .. } => {
                EventAck::ok()
            }
        }
    }
}

/// Parses a platform message timestamp (`seconds.fraction`).
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if the timestamp is not a number of
/// seconds since the epoch.
pub fn parse_message_ts(ts: &str) -> Result<DateTime<Utc>, ApiError> {
    let invalid = || ApiError::InvalidInput {
        field: String::from("ts"),
        message: format!("'{ts}' is not a message timestamp"),
    };

    let (seconds, fraction) = ts.split_once('.').unwrap_or((ts, ""));
    let seconds: i64 = seconds.parse().map_err(|_| invalid())?;
    let nanos: u32 = if fraction.is_empty() {
        0
    } else {
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let digits: String = fraction.chars().take(9).collect();
        format!("{digits:0<9}").parse().map_err(|_| invalid())?
    };

    DateTime::from_timestamp(seconds, nanos).ok_or_else(invalid)
}

/// Processes one events callback.
///
/// # Arguments
///
/// * `service` - Collaborators, ledger and settings
/// * `envelope` - The decoded request body
///
/// # Errors
///
/// Returns `ApiError::AuthRejected` if the verification token does not
/// match, and `ApiError::InvalidInput` for a handshake without a challenge
/// or a message with an unreadable timestamp. Failures after that point are
/// answered in the thread and reported as `EventOutcome::Failed`.
pub async fn handle_event<S>(
    service: &IntakeService<S>,
    envelope: EventEnvelope,
) -> Result<EventOutcome, ApiError>
where
    S: LedgerStore + Send,
{
    if envelope.kind == URL_VERIFICATION {
        let challenge: String = envelope.challenge.ok_or_else(|| ApiError::InvalidInput {
            field: String::from("challenge"),
            message: String::from("url_verification without a challenge"),
        })?;
        debug!("Answering url_verification handshake");
        return Ok(EventOutcome::Challenge(challenge));
    }

    if let Err(e) = verify_token(
        &service.settings.verification_token,
        envelope.token.as_deref(),
    ) {
        warn!(event_id = ?envelope.event_id, "Rejected event with invalid token");
        return Err(e);
    }

    let Some(message) = envelope.event.as_ref().and_then(MessageEvent::as_user_message) else {
        debug!(event_id = ?envelope.event_id, "Ignoring event that is not a user message");
        return Ok(EventOutcome::Ignored);
    };
    let received_at: DateTime<Utc> = parse_message_ts(&message.ts)?;

    let delivery_key: String = envelope
        .event_id
        .clone()
        .unwrap_or_else(|| format!("{}:{}", message.channel_id, message.ts));
    if !service.dedup.first_sighting(&delivery_key) {
        info!(delivery_key = %delivery_key, "Duplicate delivery acknowledged");
        return Ok(EventOutcome::Duplicate);
    }

    if message.text.contains(LEAVE_CONDITION_MARKER) {
        debug!(channel = %message.channel_id, "Ignoring leave-condition query");
        return Ok(EventOutcome::Ignored);
    }

    Ok(process_message(service, &message, received_at).await)
}

async fn process_message<S>(
    service: &IntakeService<S>,
    message: &InboundMessage,
    received_at: DateTime<Utc>,
) -> EventOutcome
where
    S: LedgerStore + Send,
{
    let target: ThreadTarget = ThreadTarget::new(&message.channel_id, &message.thread_ts);

    let profile: UserProfile = match service.platform.user_info(&message.user_id).await {
        Ok(Some(profile)) if !profile.display_name.is_empty() => profile,
        Ok(_) => {
            info!(user_id = %message.user_id, "User not found");
            return EventOutcome::UnknownUser;
        }
        Err(e) => return fail(service, &target, e.to_string()).await,
    };

    let source_link: String = match service
        .platform
        .permalink(&message.channel_id, &message.ts)
        .await
    {
        Ok(link) => link.unwrap_or_default(),
        Err(e) => {
            warn!(channel = %message.channel_id, ts = %message.ts, error = %e, "Permalink unavailable");
            String::new()
        }
    };

    let answer: String = match service
        .extractor
        .extract(&ExtractionPrompt::for_message(&message.text))
        .await
    {
        Ok(answer) => answer,
        Err(e) => return fail(service, &target, e.to_string()).await,
    };
    let intents: Vec<RawIntent> = match parse_extractor_output(&answer) {
        Ok(ExtractorOutput::NotALeaveRequest) => {
            info!(user_id = %message.user_id, "Message is not a leave request");
            return EventOutcome::NotALeaveRequest;
        }
        Ok(ExtractorOutput::Intents(intents)) => intents,
        Err(e) => return fail(service, &target, translate_core_error(e).to_string()).await,
    };

    let zone: Tz = service.settings.timezone;
    let context: IntakeContext = IntakeContext {
        requester: Requester::new(&message.user_id, &profile.real_name, &profile.display_name),
        today: CivilDate::on(received_at, zone),
        request_timestamp: format_civil_timestamp(received_at, zone),
        detail: message.text.clone(),
        source_link,
    };
    let batch: IntakeBatch = classify_intents(&intents, &context);

    let reconciled: Result<ReconciliationResult, CoreError> = {
        let mut ledger: MutexGuard<'_, S> = service.ledger.lock().await;
        reconcile_and_apply(batch, &mut *ledger, context.today)
    };
    let result: ReconciliationResult = match reconciled {
        Ok(result) => result,
        Err(e) => return fail(service, &target, translate_core_error(e).to_string()).await,
    };

    for failure in &result.failures {
        error!(user_id = %message.user_id, error = %failure, "Ledger write failed");
    }
    for rejection in result.rejections.iter().filter(|r| r.detail.is_some()) {
        warn!(
            user_id = %message.user_id,
            subject = %rejection.subject,
            reason = ?rejection.reason,
            detail = rejection.detail.as_deref().unwrap_or_default(),
            "Item rejected"
        );
    }

    let replies: Vec<Reply> = compose_feedback(&result, &target);
    post_all(service.platform.as_ref(), &replies).await;

    info!(
        user_id = %message.user_id,
        added = result.additions.len(),
        cancelled = result.cancellations.len(),
        rejected = result.rejections.len(),
        failed = result.failures.len(),
        "Processed leave request"
    );

    EventOutcome::Processed { result, replies }
}

/// Posts the generic failure reply and reports the outcome.
async fn fail<S: Send>(
    service: &IntakeService<S>,
    target: &ThreadTarget,
    reason: String,
) -> EventOutcome {
    error!(
        channel = %target.channel_id,
        thread_ts = %target.thread_ts,
        reason = %reason,
        "Request failed"
    );
    post_all(service.platform.as_ref(), &[Reply::request_failed(target)]).await;
    EventOutcome::Failed { reason }
}

async fn post_all(platform: &dyn ChatPlatform, replies: &[Reply]) {
    for reply in replies {
        if let Err(e) = platform.post_reply(reply).await {
            warn!(channel = %reply.target.channel_id, error = %e, "Failed to post reply");
        }
    }
}
