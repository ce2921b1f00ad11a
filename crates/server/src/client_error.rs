// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Failures talking to the chat platform or the extractor.

use leave_intake_api::ApiError;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Builds the HTTP client shared by the outbound clients.
///
/// Every request, including reading the body, gives up after `timeout`
/// and surfaces as a `Transport` error.
///
/// # Errors
///
/// Returns the builder error if the TLS backend cannot be initialised.
pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error calling {method}: {source}")]
    Transport {
        service: &'static str,
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        method: &'static str,
        status: u16,
        body: String,
    },

    #[error("{method} returned an unreadable payload: {message}")]
    Payload {
        service: &'static str,
        method: &'static str,
        message: String,
    },

    #[error("{method} was refused: {error}")]
    Refused {
        service: &'static str,
        method: &'static str,
        error: String,
    },
}

impl ClientError {
    const fn service(&self) -> &'static str {
        match self {
            Self::Transport { service, .. }
            | Self::Status { service, .. }
            | Self::Payload { service, .. }
            | Self::Refused { service, .. } => *service,
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        Self::upstream(err.service(), err.to_string())
    }
}
