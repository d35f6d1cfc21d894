pub mod commands;
pub mod handlers;

use std::sync::Arc;

use teloxide::types::{Message, MessageCommon, MessageKind};

use crate::platform::{ChatPlatform, Destination};
use crate::roster::RosterStore;
use crate::services::scheduler::{PollPreset, PresetRunner};

/// Shared state handed to every handler.
pub struct AppContext {
    pub platform: Arc<dyn ChatPlatform>,
    pub store: Arc<RosterStore>,
    pub page_size: usize,
    pub mention_all_admin_only: bool,
    pub presets: Vec<PollPreset>,
    /// Present when a destination chat for recurring polls is configured.
    pub runner: Option<Arc<PresetRunner>>,
}

/// Who invoked a command, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub chat_id: i64,
    pub topic_id: Option<i32>,
    pub user_id: i64,
    pub user_name: String,
}

impl Invocation {
    pub fn from_message(msg: &Message) -> Self {
        let (user_id, user_name) = msg
            .from()
            .map(|u| {
                let name = u.username.clone().unwrap_or_else(|| u.full_name());
                (u.id.0 as i64, name)
            })
            .unwrap_or((0, "unknown".to_string()));

        let is_topic_message = matches!(
            &msg.kind,
            MessageKind::Common(MessageCommon {
                is_topic_message: true,
                ..
            })
        );

        Self {
            chat_id: msg.chat.id.0,
            topic_id: topic_of(msg.thread_id, is_topic_message),
            user_id,
            user_name,
        }
    }

    /// Where replies to this invocation go.
    pub fn reply_to(&self) -> Destination {
        Destination::chat(self.chat_id).in_topic(self.topic_id)
    }
}

/// Thread id of a message when it belongs to a forum topic. Replies in
/// ordinary groups also carry a thread id, which must not be used as a topic.
pub fn topic_of(thread_id: Option<i32>, is_topic_message: bool) -> Option<i32> {
    thread_id.filter(|_| is_topic_message)
}
