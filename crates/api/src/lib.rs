// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod auth;
mod collaborators;
mod error;
mod handlers;
mod idempotency;
mod policy;
mod prompt;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::verify_token;
pub use collaborators::{ChatPlatform, IntentExtractor, UserProfile};
pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use handlers::{
    EventOutcome, IntakeService, IntakeSettings, handle_event, parse_message_ts,
};
pub use idempotency::{DEFAULT_DEDUP_CAPACITY, IdempotencyCache, LruIdempotencyCache};
pub use policy::{LEAVE_CONDITION_TEXT, leave_condition};
pub use prompt::ExtractionPrompt;
pub use request_response::{
    ChallengeResponse, EventAck, EventEnvelope, InboundMessage, LEAVE_CONDITION_MARKER,
    MESSAGE_EVENT, MessageEvent, SlashCommandForm, SlashCommandResponse, URL_VERIFICATION,
};
