#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use roster_bot::bot::{AppContext, Invocation};
use roster_bot::error::PlatformError;
use roster_bot::platform::{ChatPlatform, ChatUser, Destination};
use roster_bot::roster::RosterStore;
use roster_bot::utils::pagination::DEFAULT_PAGE_SIZE;

/// One outbound call recorded by [`FakePlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Message {
        to: Destination,
        text: String,
    },
    Poll {
        to: Destination,
        question: String,
        choices: Vec<String>,
        anonymous: bool,
    },
}

/// In-memory platform that records what the bot sends.
#[derive(Default)]
pub struct FakePlatform {
    pub sent: Mutex<Vec<Sent>>,
    pub admins: Mutex<Vec<ChatUser>>,
    pub topics_enabled: Mutex<bool>,
    pub fail_admin_lookup: Mutex<bool>,
    pub fail_topic_lookup: Mutex<bool>,
    pub fail_polls: Mutex<bool>,
    /// Zero-based indexes of text messages that fail to send.
    pub failing_messages: Mutex<Vec<usize>>,
    message_attempts: Mutex<usize>,
}

impl FakePlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_admins(admins: Vec<ChatUser>) -> Arc<Self> {
        let platform = Self::default();
        *platform.admins.lock().unwrap() = admins;
        Arc::new(platform)
    }

    pub fn enable_topics(&self) {
        *self.topics_enabled.lock().unwrap() = true;
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Message { text, .. } => Some(text),
                Sent::Poll { .. } => None,
            })
            .collect()
    }

    pub fn polls(&self) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| matches!(s, Sent::Poll { .. }))
            .collect()
    }

    pub fn last_message(&self) -> String {
        self.messages().pop().unwrap_or_default()
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn send_html(&self, to: Destination, text: &str) -> Result<(), PlatformError> {
        let attempt = {
            let mut attempts = self.message_attempts.lock().unwrap();
            let current = *attempts;
            *attempts += 1;
            current
        };
        if self.failing_messages.lock().unwrap().contains(&attempt) {
            return Err(PlatformError::Request("message rejected".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Message {
            to,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_poll(
        &self,
        to: Destination,
        question: &str,
        choices: &[String],
        anonymous: bool,
    ) -> Result<(), PlatformError> {
        if *self.fail_polls.lock().unwrap() {
            return Err(PlatformError::Request("poll rejected".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Poll {
            to,
            question: question.to_string(),
            choices: choices.to_vec(),
            anonymous,
        });
        Ok(())
    }

    async fn administrators(&self, _chat_id: i64) -> Result<Vec<ChatUser>, PlatformError> {
        if *self.fail_admin_lookup.lock().unwrap() {
            return Err(PlatformError::Request("admin lookup failed".to_string()));
        }
        Ok(self.admins.lock().unwrap().clone())
    }

    async fn supports_topics(&self, _chat_id: i64) -> Result<bool, PlatformError> {
        if *self.fail_topic_lookup.lock().unwrap() {
            return Err(PlatformError::Request("chat lookup failed".to_string()));
        }
        Ok(*self.topics_enabled.lock().unwrap())
    }
}

pub fn user(id: i64, handle: Option<&str>, name: &str) -> ChatUser {
    ChatUser {
        id,
        handle: handle.map(str::to_string),
        display_name: name.to_string(),
        is_bot: false,
    }
}

pub fn bot_user(id: i64, handle: &str) -> ChatUser {
    ChatUser {
        id,
        handle: Some(handle.to_string()),
        display_name: handle.to_string(),
        is_bot: true,
    }
}

pub fn create_test_store() -> (Arc<RosterStore>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = RosterStore::open(temp_dir.path().join("members.json"));
    (Arc::new(store), temp_dir)
}

pub fn create_test_context(
    platform: Arc<FakePlatform>,
    store: Arc<RosterStore>,
) -> AppContext {
    AppContext {
        platform,
        store,
        page_size: DEFAULT_PAGE_SIZE,
        mention_all_admin_only: false,
        presets: Vec::new(),
        runner: None,
    }
}

pub fn invocation(chat_id: i64, user_id: i64) -> Invocation {
    Invocation {
        chat_id,
        topic_id: None,
        user_id,
        user_name: format!("user{user_id}"),
    }
}
