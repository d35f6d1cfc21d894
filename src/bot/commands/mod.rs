pub mod general;
pub mod mention_all;
pub mod poll;
pub mod sync;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Roster Bot commands:")]
pub enum Command {
    #[command(description = "Check that the bot is alive")]
    Ping,
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Show the id of this chat")]
    ChatId,
    #[command(description = "Add the chat administrators to the roster (admins only)")]
    Sync,
    #[command(description = "Mention everyone the bot has seen in this chat")]
    All,
    #[command(description = "Create a poll: /poll [anon] [tag] Title | choice 1 | choice 2")]
    Poll(String),
    #[command(description = "List the recurring polls")]
    Presets,
    #[command(description = "Post a recurring poll now: /preset <name> (admins only)")]
    Preset(String),
}

/// Parses a message into a [`Command`].
///
/// The derived parser only splits the command from its arguments on a space,
/// so `/poll` followed by a newline would be an unknown command. The first
/// whitespace run after the command token is collapsed to one space first.
pub fn parse_command(text: &str, bot_username: &str) -> Option<Command> {
    let text = text.trim_start();
    let normalized = match text.find(char::is_whitespace) {
        Some(end) => {
            let args = text[end..].trim_start();
            if args.is_empty() {
                text[..end].to_string()
            } else {
                format!("{} {}", &text[..end], args)
            }
        }
        None => text.to_string(),
    };
    Command::parse(&normalized, bot_username).ok()
}
