use crate::bot::{AppContext, Invocation};
use crate::error::BotError;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_auth_denied, log_command_start, log_command_success};

/// Adds every current human administrator of the chat to the roster.
///
/// The administrator list doubles as the authorization check: the invoker
/// must be in it, and a failed lookup is a denial.
pub async fn handle_sync(ctx: &AppContext, inv: &Invocation) -> Result<(), BotError> {
    log_command_start("sync", &inv.user_name, inv.user_id, inv.chat_id, None);
    let feedback = CommandFeedback::new(ctx.platform.as_ref(), inv.reply_to());

    let admins = match ctx.platform.administrators(inv.chat_id).await {
        Ok(admins) => admins,
        Err(e) => {
            tracing::warn!("Could not list admins of chat {}: {}", inv.chat_id, e);
            Vec::new()
        }
    };

    if !admins.iter().any(|a| a.id == inv.user_id) {
        log_auth_denied("sync", &inv.user_name, inv.user_id, inv.chat_id);
        feedback.denied("Only admins can use /sync.").await?;
        return Ok(());
    }

    let mut synced = 0;
    let mut unsaved = 0;
    for admin in admins.into_iter().filter(|a| !a.is_bot) {
        synced += 1;
        let (chat_id, admin_id) = (inv.chat_id, admin.id);
        let saved = ctx
            .store
            .run_blocking(move |s| {
                s.upsert(chat_id, admin.id, admin.handle.as_deref(), &admin.display_name)
            })
            .await
            .and_then(|saved| saved);
        if let Err(e) = saved {
            tracing::warn!("Roster not saved after syncing admin {}: {}", admin_id, e);
            unsaved += 1;
        }
    }

    if unsaved > 0 {
        feedback
            .warning(&format!(
                "Synced {synced} admins, but the roster file could not be saved. They will be tagged until the bot restarts."
            ))
            .await?;
    } else {
        feedback.success(&format!("Synced {synced} admins")).await?;
    }

    log_command_success(
        "sync",
        &inv.user_name,
        inv.user_id,
        inv.chat_id,
        Some(&format!("{synced} admins")),
    );
    Ok(())
}
