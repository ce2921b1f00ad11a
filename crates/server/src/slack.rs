// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slack Web API client.
//!
//! Every method answers HTTP 200 with an `ok` flag; a refusal carries an
//! `error` code instead of the payload.

use async_trait::async_trait;
use leave_intake::Reply;
use leave_intake_api::{ApiError, ChatPlatform, UserProfile};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client_error::ClientError;

const SERVICE: &str = "slack";

/// Refusal code for an unknown user id.
const USER_NOT_FOUND: &str = "user_not_found";

#[derive(Debug, Clone)]
pub struct SlackClient {
    client: Client,
    base_url: String,
    bot_token: String,
}

impl SlackClient {
    /// Creates a client for the Web API rooted at `base_url`.
    #[must_use]
    pub fn new(client: Client, base_url: &str, bot_token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bot_token: bot_token.to_string(),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response: reqwest::Response = request
            .bearer_auth(&self.bot_token)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                service: SERVICE,
                method,
                source,
            })?;

        let status: reqwest::StatusCode = response.status();
        let body: String = response
            .text()
            .await
            .map_err(|source| ClientError::Transport {
                service: SERVICE,
                method,
                source,
            })?;

        if !status.is_success() {
            return Err(ClientError::Status {
                service: SERVICE,
                method,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Payload {
            service: SERVICE,
            method,
            message: e.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct UsersInfoResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user: Option<SlackUser>,
}

#[derive(Debug, Deserialize)]
struct SlackUser {
    #[serde(default)]
    real_name: String,
    #[serde(default)]
    profile: SlackProfile,
}

#[derive(Debug, Default, Deserialize)]
struct SlackProfile {
    #[serde(default)]
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct PermalinkResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    permalink: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    thread_ts: &'a str,
}

fn refused(method: &'static str, error: Option<String>) -> ClientError {
    ClientError::Refused {
        service: SERVICE,
        method,
        error: error.unwrap_or_else(|| String::from("unknown_error")),
    }
}

#[async_trait]
impl ChatPlatform for SlackClient {
    async fn user_info(&self, user_id: &str) -> Result<Option<UserProfile>, ApiError> {
        const METHOD: &str = "users.info";
        let request: RequestBuilder = self
            .client
            .get(self.endpoint(METHOD))
            .query(&[("user", user_id)]);
        let response: UsersInfoResponse = self.call(METHOD, request).await?;

        if !response.ok {
            if response.error.as_deref() == Some(USER_NOT_FOUND) {
                return Ok(None);
            }
            return Err(refused(METHOD, response.error).into());
        }

        Ok(response.user.map(|user| UserProfile {
            real_name: user.real_name,
            display_name: user.profile.display_name,
        }))
    }

    async fn permalink(
        &self,
        channel_id: &str,
        message_ts: &str,
    ) -> Result<Option<String>, ApiError> {
        const METHOD: &str = "chat.getPermalink";
        let request: RequestBuilder = self
            .client
            .get(self.endpoint(METHOD))
            .query(&[("channel", channel_id), ("message_ts", message_ts)]);
        let response: PermalinkResponse = self.call(METHOD, request).await?;

        if !response.ok {
            debug!(channel = %channel_id, ts = %message_ts, error = ?response.error, "No permalink");
            return Ok(None);
        }
        Ok(response.permalink)
    }

    async fn post_reply(&self, reply: &Reply) -> Result<(), ApiError> {
        const METHOD: &str = "chat.postMessage";
        let request: RequestBuilder =
            self.client
                .post(self.endpoint(METHOD))
                .json(&PostMessageRequest {
                    channel: &reply.target.channel_id,
                    text: &reply.text,
                    thread_ts: &reply.target.thread_ts,
                });
        let response: PostMessageResponse = self.call(METHOD, request).await?;

        if !response.ok {
            return Err(refused(METHOD, response.error).into());
        }
        Ok(())
    }
}
