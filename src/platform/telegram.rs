use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    ChatKind, ChatPublic, ParseMode, PublicChatKind, PublicChatSupergroup, User,
};

use crate::error::PlatformError;
use crate::platform::{ChatPlatform, ChatUser, Destination};

/// Teloxide-based implementation of [`ChatPlatform`].
#[derive(Clone)]
pub struct TelegramPlatform {
    bot: Bot,
}

impl TelegramPlatform {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

impl From<&User> for ChatUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0 as i64,
            handle: user.username.clone(),
            display_name: user.full_name(),
            is_bot: user.is_bot,
        }
    }
}

fn request_error(e: teloxide::RequestError) -> PlatformError {
    PlatformError::Request(e.to_string())
}

#[async_trait]
impl ChatPlatform for TelegramPlatform {
    async fn send_html(&self, to: Destination, text: &str) -> Result<(), PlatformError> {
        let mut request = self
            .bot
            .send_message(ChatId(to.chat_id), text)
            .parse_mode(ParseMode::Html)
            .disable_web_page_preview(true);
        if let Some(topic_id) = to.topic_id {
            request = request.message_thread_id(topic_id);
        }
        request.await.map_err(request_error)?;
        Ok(())
    }

    async fn send_poll(
        &self,
        to: Destination,
        question: &str,
        choices: &[String],
        anonymous: bool,
    ) -> Result<(), PlatformError> {
        let mut request = self
            .bot
            .send_poll(ChatId(to.chat_id), question, choices.to_vec())
            .is_anonymous(anonymous);
        if let Some(topic_id) = to.topic_id {
            request = request.message_thread_id(topic_id);
        }
        request.await.map_err(request_error)?;
        Ok(())
    }

    async fn administrators(&self, chat_id: i64) -> Result<Vec<ChatUser>, PlatformError> {
        let admins = self
            .bot
            .get_chat_administrators(ChatId(chat_id))
            .await
            .map_err(request_error)?;
        Ok(admins.iter().map(|member| ChatUser::from(&member.user)).collect())
    }

    async fn supports_topics(&self, chat_id: i64) -> Result<bool, PlatformError> {
        let chat = self
            .bot
            .get_chat(ChatId(chat_id))
            .await
            .map_err(request_error)?;
        let is_forum = matches!(
            chat.kind,
            ChatKind::Public(ChatPublic {
                kind: PublicChatKind::Supergroup(PublicChatSupergroup { is_forum: true, .. }),
                ..
            })
        );
        Ok(is_forum)
    }
}
