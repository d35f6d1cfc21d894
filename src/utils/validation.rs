use anyhow::{anyhow, Result};

use crate::error::PollError;

/// Longest poll question the platform accepts.
pub const MAX_TITLE_CHARS: usize = 300;
/// Longest single poll option the platform accepts.
pub const MAX_CHOICE_CHARS: usize = 100;
/// Most options a poll may carry.
pub const MAX_CHOICES: usize = 10;

const ANONYMOUS_MARKERS: [&str; 2] = ["anon", "anonymous"];
const MENTION_MARKERS: [&str; 2] = ["tag", "tagall"];

/// A poll as typed by the invoker, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollDraft {
    pub title: String,
    pub choices: Vec<String>,
    pub anonymous: bool,
    pub mention_all: bool,
}

/// Splits a `/poll` body into markers, title and choices.
///
/// Leading words `anon`/`anonymous` and `tag`/`tagall` (any case, any order)
/// set the flags. The rest is split on newlines when it has any, otherwise
/// on `|`. The first part is the title, the others are choices.
pub fn parse_poll_body(body: &str) -> PollDraft {
    let mut draft = PollDraft::default();
    let mut rest = body.trim_start();

    loop {
        let word_end = rest
            .find(char::is_whitespace)
            .unwrap_or(rest.len());
        let word = rest[..word_end].to_lowercase();
        if ANONYMOUS_MARKERS.contains(&word.as_str()) {
            draft.anonymous = true;
        } else if MENTION_MARKERS.contains(&word.as_str()) {
            draft.mention_all = true;
        } else {
            break;
        }
        rest = rest[word_end..].trim_start();
    }

    let parts: Vec<&str> = if rest.contains('\n') {
        rest.lines().collect()
    } else {
        rest.split('|').collect()
    };

    let mut parts = parts.into_iter().map(str::trim);
    draft.title = parts.next().unwrap_or_default().to_string();
    draft.choices = parts.map(str::to_string).collect();
    draft
}

pub fn validate_poll_title(title: &str) -> Result<(), PollError> {
    let title = title.trim();

    if title.is_empty() {
        return Err(PollError::EmptyTitle);
    }

    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(PollError::TitleTooLong {
            max: MAX_TITLE_CHARS,
        });
    }

    Ok(())
}

/// Trims choices, drops blank ones and checks the count and length limits.
pub fn validate_poll_choices(choices: &[String]) -> Result<Vec<String>, PollError> {
    let cleaned: Vec<String> = choices
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    if cleaned.len() < 2 {
        return Err(PollError::NotEnoughChoices {
            found: cleaned.len(),
        });
    }

    if cleaned.len() > MAX_CHOICES {
        return Err(PollError::TooManyChoices {
            max: MAX_CHOICES,
            found: cleaned.len(),
        });
    }

    if let Some(choice) = cleaned.iter().find(|c| c.chars().count() > MAX_CHOICE_CHARS) {
        return Err(PollError::ChoiceTooLong {
            choice: choice.clone(),
            max: MAX_CHOICE_CHARS,
        });
    }

    Ok(cleaned)
}

pub fn validate_telegram_chat_id(chat_id: i64) -> Result<()> {
    if chat_id == 0 {
        return Err(anyhow!("Chat ID cannot be zero"));
    }

    // Private chats are positive and fit in 32 bits
    if chat_id > 2147483647 {
        return Err(anyhow!("Invalid user chat ID range"));
    }

    // Supergroups sit around -100xxxxxxxxxx
    if chat_id < -2000000000000 {
        return Err(anyhow!("Chat ID out of valid range"));
    }

    Ok(())
}
