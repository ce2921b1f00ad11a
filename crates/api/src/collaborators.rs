// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! External services the intake pipeline depends on.

use async_trait::async_trait;
use leave_intake::Reply;

use crate::error::ApiError;
use crate::prompt::ExtractionPrompt;

/// Profile fields the ledger records for a requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub real_name: String,
    pub display_name: String,
}

/// The chat platform messages arrive from and replies go to.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Looks up a user's profile. `Ok(None)` when the platform does not
    /// know the user.
    async fn user_info(&self, user_id: &str) -> Result<Option<UserProfile>, ApiError>;

    /// Returns a link to a message, `Ok(None)` when the platform has none.
    async fn permalink(&self, channel_id: &str, message_ts: &str)
    -> Result<Option<String>, ApiError>;

    /// Posts a reply into a thread.
    async fn post_reply(&self, reply: &Reply) -> Result<(), ApiError>;
}

/// The language model that turns free text into intents.
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    /// Sends the prompt and returns the model's text answer verbatim.
    async fn extract(&self, prompt: &ExtractionPrompt) -> Result<String, ApiError>;
}
