// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Gemini `generateContent` client used as the intent extractor.

use async_trait::async_trait;
use leave_intake_api::{ApiError, ExtractionPrompt, IntentExtractor};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::client_error::ClientError;

const SERVICE: &str = "extractor";
const METHOD: &str = "generateContent";

/// Endpoint the API key is appended to.
pub const DEFAULT_EXTRACTOR_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent?key=";

#[derive(Debug, Clone)]
pub struct GeminiExtractor {
    client: Client,
    url: String,
    api_key: String,
}

impl GeminiExtractor {
    #[must_use]
    pub fn new(client: Client, url: &str, api_key: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

fn payload_error(message: impl Into<String>) -> ClientError {
    ClientError::Payload {
        service: SERVICE,
        method: METHOD,
        message: message.into(),
    }
}

/// Pulls the first candidate's first text part out of a response body.
fn answer_text(body: &str) -> Result<String, ClientError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| payload_error(e.to_string()))?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .map(|part| part.text)
        .ok_or_else(|| payload_error("response has no candidate text"))
}

#[async_trait]
impl IntentExtractor for GeminiExtractor {
    async fn extract(&self, prompt: &ExtractionPrompt) -> Result<String, ApiError> {
        let request: GenerateContentRequest<'_> = GenerateContentRequest {
            contents: vec![Content {
                parts: prompt
                    .parts
                    .iter()
                    .map(|text| TextPart {
                        text: text.as_str(),
                    })
                    .collect(),
            }],
        };
        let transport = |source: reqwest::Error| ClientError::Transport {
            service: SERVICE,
            method: METHOD,
            source,
        };

        let response: reqwest::Response = self
            .client
            .post(format!("{}{}", self.url, self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(transport)?;
        let status: reqwest::StatusCode = response.status();
        let body: String = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(ClientError::Status {
                service: SERVICE,
                method: METHOD,
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Ok(answer_text(&body)?)
    }
}
