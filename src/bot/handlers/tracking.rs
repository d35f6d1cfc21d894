//! Passive roster updates from ordinary traffic.

use std::sync::Arc;

use teloxide::prelude::*;

use crate::bot::handlers::HandlerResult;
use crate::bot::AppContext;
use crate::platform::ChatUser;
use crate::roster::RosterStore;

/// Records `user` in the chat's roster. Bots are skipped. Returns whether
/// the member was recorded in memory; a failed save is only logged.
pub async fn observe_member(store: &Arc<RosterStore>, chat_id: i64, user: &ChatUser) -> bool {
    if user.is_bot {
        return false;
    }
    let (member_id, handle, name) = (user.id, user.handle.clone(), user.display_name.clone());
    let saved = store
        .run_blocking(move |s| s.upsert(chat_id, member_id, handle.as_deref(), &name))
        .await
        .and_then(|saved| saved);
    if let Err(e) = saved {
        tracing::warn!(
            "Roster not saved after observing member {} in chat {}: {}",
            user.id,
            chat_id,
            e
        );
    }
    true
}

/// True for messages that start with a slash command.
pub fn is_command_message(msg: &Message) -> bool {
    msg.text().is_some_and(|text| text.starts_with('/'))
}

pub async fn track_message(ctx: Arc<AppContext>, msg: Message) -> HandlerResult {
    if let Some(user) = msg.from() {
        observe_member(&ctx.store, msg.chat.id.0, &ChatUser::from(user)).await;
    }
    Ok(())
}

pub async fn track_new_members(ctx: Arc<AppContext>, msg: Message) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    let joined = msg.new_chat_members().unwrap_or_default();
    let mut recorded = 0;
    for user in joined {
        if observe_member(&ctx.store, chat_id, &ChatUser::from(user)).await {
            recorded += 1;
        }
    }
    if recorded > 0 {
        tracing::info!("Recorded {} new members in chat {}", recorded, chat_id);
    }
    Ok(())
}
