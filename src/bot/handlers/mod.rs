pub mod message;
pub mod tracking;

use std::sync::Arc;

use teloxide::{dispatching::UpdateHandler, prelude::*, types::Me};

use crate::bot::commands::{parse_command, Command};
use crate::bot::AppContext;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;

pub struct BotHandler {
    pub ctx: Arc<AppContext>,
}

impl BotHandler {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Known commands first, then join events, then every other
    /// non-command message for passive tracking.
    pub fn schema(&self) -> UpdateHandler<HandlerError> {
        use teloxide::dispatching::UpdateFilterExt;

        let ctx_command = self.ctx.clone();
        let ctx_joined = self.ctx.clone();
        let ctx_tracked = self.ctx.clone();

        Update::filter_message()
            .branch(
                dptree::filter_map(|msg: Message, me: Me| {
                    msg.text().and_then(|text| parse_command(text, me.username()))
                })
                .endpoint(move |msg: Message, cmd: Command| {
                    let ctx = ctx_command.clone();
                    async move { message::command_handler(ctx, msg, cmd).await }
                }),
            )
            .branch(
                dptree::filter(|msg: Message| msg.new_chat_members().is_some()).endpoint(
                    move |msg: Message| {
                        let ctx = ctx_joined.clone();
                        async move { tracking::track_new_members(ctx, msg).await }
                    },
                ),
            )
            .branch(
                dptree::filter(|msg: Message| !tracking::is_command_message(&msg)).endpoint(
                    move |msg: Message| {
                        let ctx = ctx_tracked.clone();
                        async move { tracking::track_message(ctx, msg).await }
                    },
                ),
            )
    }
}
