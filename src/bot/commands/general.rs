use teloxide::utils::command::BotCommands;

use crate::bot::commands::Command;
use crate::bot::{AppContext, Invocation};
use crate::error::BotError;
use crate::utils::feedback::CommandFeedback;
use crate::utils::html::escape_html;

const PRIVACY_TIP: &str = "💡 Tip: the bot only remembers people it has seen. Turn off privacy mode in BotFather so it can see ordinary messages, and use /sync to add the admins.";

pub async fn handle_ping(ctx: &AppContext, inv: &Invocation) -> Result<(), BotError> {
    CommandFeedback::new(ctx.platform.as_ref(), inv.reply_to())
        .send_text("pong ✅")
        .await?;
    Ok(())
}

pub async fn handle_help(ctx: &AppContext, inv: &Invocation) -> Result<(), BotError> {
    let text = format!("{}\n\n{}", Command::descriptions(), PRIVACY_TIP);
    CommandFeedback::new(ctx.platform.as_ref(), inv.reply_to())
        .send_text(&text)
        .await?;
    Ok(())
}

pub async fn handle_chat_id(ctx: &AppContext, inv: &Invocation) -> Result<(), BotError> {
    let mut text = format!("Chat ID: <code>{}</code>", inv.chat_id);
    if let Some(topic_id) = inv.topic_id {
        text.push_str(&format!("\nTopic ID: <code>{topic_id}</code>"));
    }
    text.push_str(&format!("\nRequested by {}", escape_html(&inv.user_name)));

    CommandFeedback::new(ctx.platform.as_ref(), inv.reply_to())
        .send_html(&text)
        .await?;
    Ok(())
}
