use crate::bot::{AppContext, Invocation};
use crate::error::BotError;
use crate::platform::is_admin;
use crate::services::broadcast::broadcast;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{
    log_auth_denied, log_command_error, log_command_start, log_command_success,
};

const MENTION_HEADER: &str = "🔔 <b>Mention all</b>";

pub async fn handle_mention_all(ctx: &AppContext, inv: &Invocation) -> Result<(), BotError> {
    log_command_start("all", &inv.user_name, inv.user_id, inv.chat_id, None);
    let feedback = CommandFeedback::new(ctx.platform.as_ref(), inv.reply_to());

    if ctx.mention_all_admin_only
        && !is_admin(ctx.platform.as_ref(), inv.chat_id, inv.user_id).await
    {
        log_auth_denied("all", &inv.user_name, inv.user_id, inv.chat_id);
        feedback.denied("Only admins can use /all.").await?;
        return Ok(());
    }

    let chat_id = inv.chat_id;
    let members = ctx.store.run_blocking(move |s| s.get_all(chat_id)).await?;
    if members.is_empty() {
        feedback
            .validation_error(
                "Nobody is on the roster for this chat yet",
                "Use /sync, or let people send a few messages, then try again.",
            )
            .await?;
        return Ok(());
    }

    let report = broadcast(
        ctx.platform.as_ref(),
        inv.reply_to(),
        MENTION_HEADER,
        &members,
        ctx.page_size,
    )
    .await;

    if report.is_complete() {
        log_command_success(
            "all",
            &inv.user_name,
            inv.user_id,
            inv.chat_id,
            Some(&format!("{} members in {} pages", members.len(), report.pages)),
        );
    } else {
        log_command_error(
            "all",
            &inv.user_name,
            inv.user_id,
            inv.chat_id,
            &format!("{}/{} pages delivered", report.delivered, report.pages),
        );
        feedback
            .warning(&format!(
                "Only {} of {} mention messages could be sent.",
                report.delivered, report.pages
            ))
            .await?;
    }
    Ok(())
}
