use std::sync::Arc;

use teloxide::prelude::*;

use crate::bot::commands::{general, mention_all, poll, sync, Command};
use crate::bot::handlers::HandlerResult;
use crate::bot::{AppContext, Invocation};
use crate::error::BotError;

/// Runs one parsed command.
pub async fn dispatch_command(ctx: &AppContext, inv: &Invocation, cmd: Command) -> Result<(), BotError> {
    match cmd {
        Command::Ping => general::handle_ping(ctx, inv).await,
        Command::Help => general::handle_help(ctx, inv).await,
        Command::ChatId => general::handle_chat_id(ctx, inv).await,
        Command::Sync => sync::handle_sync(ctx, inv).await,
        Command::All => mention_all::handle_mention_all(ctx, inv).await,
        Command::Poll(body) => poll::handle_poll(ctx, inv, body).await,
        Command::Presets => poll::handle_presets(ctx, inv).await,
        Command::Preset(name) => poll::handle_preset(ctx, inv, name).await,
    }
}

pub async fn command_handler(ctx: Arc<AppContext>, msg: Message, cmd: Command) -> HandlerResult {
    let inv = Invocation::from_message(&msg);
    tracing::debug!(
        "Command {:?} from {} ({}) in chat {}",
        cmd,
        inv.user_name,
        inv.user_id,
        inv.chat_id
    );
    dispatch_command(&ctx, &inv, cmd).await?;
    Ok(())
}
