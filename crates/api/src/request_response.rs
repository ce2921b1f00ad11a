// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Inbound event and slash-command contracts, and their acknowledgements.

use serde::{Deserialize, Serialize};

/// Envelope type of the platform's endpoint handshake.
pub const URL_VERIFICATION: &str = "url_verification";

/// Inner event type the pipeline processes.
pub const MESSAGE_EVENT: &str = "message";

/// Text marking a message as a leave-condition query rather than a request.
pub const LEAVE_CONDITION_MARKER: &str = "/leave-condition";

/// The outer payload of an events callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Shared verification token.
    #[serde(default)]
    pub token: Option<String>,
    /// `url_verification` or `event_callback`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Handshake challenge, echoed back unchanged.
    #[serde(default)]
    pub challenge: Option<String>,
    /// Delivery identifier, stable across retries.
    #[serde(default)]
    pub event_id: Option<String>,
    /// The inner event.
    #[serde(default)]
    pub event: Option<MessageEvent>,
}

/// The inner event of an events callback.
///
/// Every field except the type is optional on the wire; bot and system
/// messages omit some of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A plain user message, with every field the pipeline needs present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Channel the message was posted in.
    pub channel_id: String,
    /// Author.
    pub user_id: String,
    /// Message timestamp (`seconds.micros`).
    pub ts: String,
    /// Thread to reply into; the message's own `ts` when it is not a reply.
    pub thread_ts: String,
    /// Raw message text.
    pub text: String,
}

impl MessageEvent {
    /// Returns the message if this is a plain user message.
    ///
    /// Events of another type, events with a subtype (edits, joins, bot
    /// posts) and events missing a channel, user or timestamp yield `None`.
    #[must_use]
    pub fn as_user_message(&self) -> Option<InboundMessage> {
        if self.kind != MESSAGE_EVENT || self.subtype.is_some() {
            return None;
        }
        let ts: String = self.ts.clone()?;
        Some(InboundMessage {
            channel_id: self.channel.clone()?,
            user_id: self.user.clone()?,
            thread_ts: self.thread_ts.clone().unwrap_or_else(|| ts.clone()),
            ts,
            text: self.text.clone().unwrap_or_default(),
        })
    }
}

/// Form body of a slash command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SlashCommandForm {
    /// Shared verification token.
    #[serde(default)]
    pub token: Option<String>,
    /// The command, e.g. `/leave-condition`.
    #[serde(default)]
    pub command: Option<String>,
    /// Text typed after the command.
    #[serde(default)]
    pub text: Option<String>,
}

/// Synchronous answer to a slash command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashCommandResponse {
    /// `in_channel` makes the answer visible to everyone in the channel.
    pub response_type: String,
    /// The answer text.
    pub text: String,
}

/// Handshake answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub challenge: String,
}

/// Acknowledgement body for an events callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAck {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EventAck {
    /// A bare `{"status":"ok"}`.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: String::from("ok"),
            message: None,
        }
    }

    /// `{"status":"ok","message":…}`.
    #[must_use]
    pub fn ok_with(message: &str) -> Self {
        Self {
            status: String::from("ok"),
            message: Some(message.to_string()),
        }
    }

    /// A non-`ok` status, e.g. for messages that are not leave requests.
    #[must_use]
    pub fn status(status: &str) -> Self {
        Self {
            status: status.to_string(),
            message: None,
        }
    }
}
