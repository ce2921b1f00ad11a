// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use async_trait::async_trait;
use leave_intake::Reply;
use leave_intake_domain::Tz;
use leave_intake_persistence::SqliteLedger;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{
    ApiError, ChatPlatform, EventEnvelope, ExtractionPrompt, IntakeService, IntakeSettings,
    IntentExtractor, LruIdempotencyCache, MessageEvent, UserProfile,
};

pub const TEST_TOKEN: &str = "verification-secret";
pub const TEST_USER: &str = "U123";
pub const TEST_CHANNEL: &str = "C0LEAVE";
/// 24/07/2567 09:15:00 in Bangkok.
pub const TEST_TS: &str = "1721787300.000100";
pub const TEST_PERMALINK: &str = "https://example.slack.com/archives/C0LEAVE/p1721787300000100";

#[derive(Debug, Default)]
pub struct MockPlatform {
    pub users: HashMap<String, UserProfile>,
    pub permalink: Option<String>,
    pub fail_lookups: bool,
    pub posted: Mutex<Vec<Reply>>,
    pub lookups: Mutex<usize>,
}

impl MockPlatform {
    pub fn with_test_user() -> Self {
        let mut users: HashMap<String, UserProfile> = HashMap::new();
        users.insert(
            TEST_USER.to_string(),
            UserProfile {
                real_name: String::from("Somchai Jaidee"),
                display_name: String::from("Chai"),
            },
        );
        Self {
            users,
            permalink: Some(TEST_PERMALINK.to_string()),
            ..Self::default()
        }
    }

    pub fn posted_texts(&self) -> Vec<String> {
        self.posted
            .lock()
            .unwrap()
            .iter()
            .map(|reply| reply.text.clone())
            .collect()
    }
}

#[async_trait]
impl ChatPlatform for MockPlatform {
    async fn user_info(&self, user_id: &str) -> Result<Option<UserProfile>, ApiError> {
        *self.lookups.lock().unwrap() += 1;
        if self.fail_lookups {
            return Err(ApiError::upstream("slack", "users.info timed out"));
        }
        Ok(self.users.get(user_id).cloned())
    }

    async fn permalink(
        &self,
        _channel_id: &str,
        _message_ts: &str,
    ) -> Result<Option<String>, ApiError> {
        Ok(self.permalink.clone())
    }

    async fn post_reply(&self, reply: &Reply) -> Result<(), ApiError> {
        self.posted.lock().unwrap().push(reply.clone());
        Ok(())
    }
}

#[derive(Debug)]
pub struct MockExtractor {
    pub answer: Result<String, ApiError>,
    pub prompts: Mutex<Vec<ExtractionPrompt>>,
}

impl MockExtractor {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Ok(answer.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: Err(ApiError::upstream("extractor", "quota exceeded")),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl IntentExtractor for MockExtractor {
    async fn extract(&self, prompt: &ExtractionPrompt) -> Result<String, ApiError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.answer.clone()
    }
}

pub struct TestHarness {
    pub service: IntakeService<SqliteLedger>,
    pub platform: Arc<MockPlatform>,
    pub extractor: Arc<MockExtractor>,
}

pub fn create_test_harness(platform: MockPlatform, extractor: MockExtractor) -> TestHarness {
    let platform: Arc<MockPlatform> = Arc::new(platform);
    let extractor: Arc<MockExtractor> = Arc::new(extractor);
    let ledger: SqliteLedger = SqliteLedger::new_in_memory("leave-test").unwrap();

    let service: IntakeService<SqliteLedger> = IntakeService {
        platform: platform.clone(),
        extractor: extractor.clone(),
        ledger: Arc::new(tokio::sync::Mutex::new(ledger)),
        dedup: Arc::new(LruIdempotencyCache::new(16)),
        settings: IntakeSettings {
            verification_token: TEST_TOKEN.to_string(),
            timezone: Tz::Asia__Bangkok,
        },
    };

    TestHarness {
        service,
        platform,
        extractor,
    }
}

pub fn message_envelope(text: &str, event_id: &str) -> EventEnvelope {
    EventEnvelope {
        token: Some(TEST_TOKEN.to_string()),
        kind: String::from("event_callback"),
        challenge: None,
        event_id: Some(event_id.to_string()),
        event: Some(MessageEvent {
            kind: String::from("message"),
            subtype: None,
            channel: Some(TEST_CHANNEL.to_string()),
            user: Some(TEST_USER.to_string()),
            ts: Some(TEST_TS.to_string()),
            thread_ts: None,
            text: Some(text.to_string()),
        }),
    }
}
