use std::sync::Arc;

use tracing::{info, warn};

use crate::error::PollError;
use crate::platform::{resolve_destination, ChatPlatform, Destination};
use crate::roster::RosterStore;
use crate::services::broadcast::{broadcast, BroadcastReport};
use crate::utils::html::escape_html;
use crate::utils::validation::{validate_poll_choices, validate_poll_title, PollDraft};

/// Everything needed to post one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollRequest {
    pub chat_id: i64,
    /// Sub-topic to post into, honoured only when the chat supports topics.
    pub topic_id: Option<i32>,
    pub title: String,
    pub choices: Vec<String>,
    pub anonymous: bool,
    /// Mention the whole roster before the poll.
    pub mention_first: bool,
}

impl PollRequest {
    pub fn from_draft(draft: PollDraft, chat_id: i64, topic_id: Option<i32>) -> Self {
        Self {
            chat_id,
            topic_id,
            title: draft.title,
            choices: draft.choices,
            anonymous: draft.anonymous,
            mention_first: draft.mention_all,
        }
    }
}

/// What a successful composition did.
#[derive(Debug)]
pub struct PollOutcome {
    pub destination: Destination,
    /// Present when an announcement was attempted.
    pub announcement: Option<BroadcastReport>,
}

/// Validates and sends a poll, optionally preceded by a roster mention.
///
/// Validation happens before anything is sent. A failed announcement is
/// logged and does not stop the poll; a failed poll is returned as
/// [`PollError::Platform`].
pub async fn compose_and_send(
    platform: &dyn ChatPlatform,
    store: &Arc<RosterStore>,
    request: &PollRequest,
    page_size: usize,
) -> Result<PollOutcome, PollError> {
    validate_poll_title(&request.title)?;
    let choices = validate_poll_choices(&request.choices)?;
    let title = request.title.trim();

    let destination = resolve_destination(platform, request.chat_id, request.topic_id).await;

    let announcement = if request.mention_first {
        let chat_id = request.chat_id;
        match store.run_blocking(move |s| s.get_all(chat_id)).await {
            Ok(members) if members.is_empty() => {
                warn!(
                    "No known members in chat {}, skipping announcement for poll '{}'",
                    chat_id, title
                );
                None
            }
            Ok(members) => {
                let header = format!("📣 <b>{}</b>", escape_html(title));
                Some(broadcast(platform, destination, &header, &members, page_size).await)
            }
            Err(e) => {
                warn!(
                    "Could not read roster of chat {}, skipping announcement for poll '{}': {}",
                    chat_id, title, e
                );
                None
            }
        }
    } else {
        None
    };

    platform
        .send_poll(destination, title, &choices, request.anonymous)
        .await?;

    info!(
        "Poll '{}' sent to chat {} (topic {:?}, {} choices, anonymous: {})",
        title,
        destination.chat_id,
        destination.topic_id,
        choices.len(),
        request.anonymous
    );

    Ok(PollOutcome {
        destination,
        announcement,
    })
}
