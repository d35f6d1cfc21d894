use crate::bot::{AppContext, Invocation};
use crate::error::{BotError, PollError};
use crate::platform::is_admin;
use crate::services::poll::{compose_and_send, PollOutcome, PollRequest};
use crate::utils::feedback::CommandFeedback;
use crate::utils::html::escape_html;
use crate::utils::logging::{
    log_auth_denied, log_command_error, log_command_start, log_command_success,
    log_validation_error,
};
use crate::utils::validation::parse_poll_body;

const POLL_USAGE: &str = "Use /poll Title | choice 1 | choice 2, or put the title and each choice on its own line. Start with 'anon' for an anonymous poll and 'tag' to mention everyone first.";

pub async fn handle_poll(ctx: &AppContext, inv: &Invocation, body: String) -> Result<(), BotError> {
    log_command_start("poll", &inv.user_name, inv.user_id, inv.chat_id, Some(&body));
    let feedback = CommandFeedback::new(ctx.platform.as_ref(), inv.reply_to());

    let request = PollRequest::from_draft(parse_poll_body(&body), inv.chat_id, inv.topic_id);
    let result = compose_and_send(ctx.platform.as_ref(), &ctx.store, &request, ctx.page_size).await;
    report_poll_result("poll", &feedback, inv, result).await
}

pub async fn handle_presets(ctx: &AppContext, inv: &Invocation) -> Result<(), BotError> {
    let feedback = CommandFeedback::new(ctx.platform.as_ref(), inv.reply_to());

    if ctx.presets.is_empty() {
        feedback.info("No recurring polls are configured.").await?;
        return Ok(());
    }

    let mut text = String::from("🗓 <b>Recurring polls</b>\n");
    for preset in &ctx.presets {
        text.push_str(&format!(
            "\n• <b>{}</b>: {}, {} at {:02}:{:02} UTC",
            escape_html(&preset.name),
            escape_html(&preset.title),
            preset.trigger.describe(),
            preset.hour,
            preset.minute
        ));
        if let Some(topic_id) = preset.topic_id {
            text.push_str(&format!(" (topic {topic_id})"));
        }
    }
    feedback.send_html(&text).await?;
    Ok(())
}

/// Posts a preset immediately. The invoker must administer the chat the
/// preset posts into.
pub async fn handle_preset(ctx: &AppContext, inv: &Invocation, name: String) -> Result<(), BotError> {
    let name = name.trim();
    log_command_start("preset", &inv.user_name, inv.user_id, inv.chat_id, Some(name));
    let feedback = CommandFeedback::new(ctx.platform.as_ref(), inv.reply_to());

    let Some(runner) = &ctx.runner else {
        feedback
            .info("Recurring polls are not configured for this bot.")
            .await?;
        return Ok(());
    };

    if !is_admin(ctx.platform.as_ref(), runner.chat_id(), inv.user_id).await {
        log_auth_denied("preset", &inv.user_name, inv.user_id, inv.chat_id);
        feedback.denied("Only admins of the poll chat can use /preset.").await?;
        return Ok(());
    }

    let Some(preset) = ctx.presets.iter().find(|p| p.name.eq_ignore_ascii_case(name)) else {
        let names: Vec<&str> = ctx.presets.iter().map(|p| p.name.as_str()).collect();
        log_validation_error("preset", &format!("unknown preset '{name}'"), &inv.user_name, inv.user_id, inv.chat_id);
        feedback
            .validation_error(
                &format!("Unknown preset '{name}'"),
                &format!("Available presets: {}", names.join(", ")),
            )
            .await?;
        return Ok(());
    };

    let result = runner.run_now(preset, runner.today()).await;
    let posted = result.is_ok();
    report_poll_result("preset", &feedback, inv, result).await?;
    if posted && runner.chat_id() != inv.chat_id {
        feedback
            .success(&format!("Posted '{}' to chat {}", preset.name, runner.chat_id()))
            .await?;
    }
    Ok(())
}

async fn report_poll_result(
    command: &str,
    feedback: &CommandFeedback<'_>,
    inv: &Invocation,
    result: Result<PollOutcome, PollError>,
) -> Result<(), BotError> {
    match result {
        Ok(outcome) => {
            if let Some(report) = outcome.announcement.as_ref().filter(|r| !r.is_complete()) {
                feedback
                    .warning(&format!(
                        "Poll sent, but only {} of {} mention messages went out.",
                        report.delivered, report.pages
                    ))
                    .await?;
            }
            log_command_success(command, &inv.user_name, inv.user_id, inv.chat_id, None);
        }
        Err(e) if e.is_validation() => {
            log_validation_error(command, &e.to_string(), &inv.user_name, inv.user_id, inv.chat_id);
            feedback.validation_error(&e.to_string(), POLL_USAGE).await?;
        }
        Err(e) => {
            log_command_error(command, &inv.user_name, inv.user_id, inv.chat_id, &e.to_string());
            feedback
                .error("The poll could not be sent. Please try again later.")
                .await?;
        }
    }
    Ok(())
}
