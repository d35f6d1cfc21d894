//! Boundary to the chat platform.
//!
//! [`ChatPlatform`] is the set of outbound calls the bot needs; command
//! handlers, the broadcast and poll services and the scheduler only talk to
//! the platform through it. [`TelegramPlatform`] implements it with teloxide.

pub mod telegram;

use async_trait::async_trait;

use crate::error::PlatformError;

pub use telegram::TelegramPlatform;

/// Where an outbound message or poll goes: a chat, optionally scoped to one
/// of its sub-topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Destination {
    pub chat_id: i64,
    pub topic_id: Option<i32>,
}

impl Destination {
    /// The chat's main stream.
    pub fn chat(chat_id: i64) -> Self {
        Self {
            chat_id,
            topic_id: None,
        }
    }

    pub fn in_topic(self, topic_id: Option<i32>) -> Self {
        Self { topic_id, ..self }
    }
}

/// Identity of a platform user as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUser {
    pub id: i64,
    pub handle: Option<String>,
    pub display_name: String,
    pub is_bot: bool,
}

/// Outbound operations consumed from the chat platform.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Sends an HTML-formatted text message.
    async fn send_html(&self, to: Destination, text: &str) -> Result<(), PlatformError>;
    /// Sends a regular (non-quiz) poll.
    async fn send_poll(
        &self,
        to: Destination,
        question: &str,
        choices: &[String],
        anonymous: bool,
    ) -> Result<(), PlatformError>;
    /// Current administrators of a chat.
    async fn administrators(&self, chat_id: i64) -> Result<Vec<ChatUser>, PlatformError>;
    /// Whether the chat has sub-topics enabled right now.
    async fn supports_topics(&self, chat_id: i64) -> Result<bool, PlatformError>;
}

/// Checks administrator status with a fresh query. A failed query counts as
/// not authorized.
pub async fn is_admin(platform: &dyn ChatPlatform, chat_id: i64, user_id: i64) -> bool {
    match platform.administrators(chat_id).await {
        Ok(admins) => admins.iter().any(|a| a.id == user_id),
        Err(e) => {
            tracing::warn!("Admin lookup failed in chat {}: {}", chat_id, e);
            false
        }
    }
}

/// Resolves where a message aimed at `topic_id` can actually go: the topic
/// when the chat supports topics, otherwise the main stream. Capability is
/// queried on every call.
pub async fn resolve_destination(
    platform: &dyn ChatPlatform,
    chat_id: i64,
    topic_id: Option<i32>,
) -> Destination {
    let Some(topic_id) = topic_id else {
        return Destination::chat(chat_id);
    };
    match platform.supports_topics(chat_id).await {
        Ok(true) => Destination::chat(chat_id).in_topic(Some(topic_id)),
        Ok(false) => Destination::chat(chat_id),
        Err(e) => {
            tracing::warn!(
                "Topic capability lookup failed in chat {}, using main stream: {}",
                chat_id,
                e
            );
            Destination::chat(chat_id)
        }
    }
}
