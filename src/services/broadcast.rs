use tracing::{error, info};

use crate::error::PlatformError;
use crate::platform::{ChatPlatform, Destination};
use crate::roster::Member;
use crate::utils::pagination::paginate;

/// Result of a paginated broadcast. Failed pages are logged and skipped.
#[derive(Debug, Default)]
pub struct BroadcastReport {
    pub pages: usize,
    pub delivered: usize,
    pub failures: Vec<PlatformError>,
}

impl BroadcastReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.delivered == self.pages
    }
}

/// Renders the broadcast messages for `members`, one per page.
///
/// `header` is HTML and is prefixed to every page, numbered when there is
/// more than one page. No members means no messages.
pub fn render_pages(header: &str, members: &[Member], page_size: usize) -> Vec<String> {
    let mentions: Vec<String> = members.iter().map(Member::mention).collect();
    let pages = paginate(&mentions, page_size);
    let total = pages.len();

    pages
        .into_iter()
        .enumerate()
        .map(|(i, page)| {
            if total == 1 {
                format!("{header}\n{page}")
            } else {
                format!("{header} (part {}/{}):\n{}", i + 1, total, page)
            }
        })
        .collect()
}

/// Sends every page in order, awaiting each one before the next.
pub async fn broadcast(
    platform: &dyn ChatPlatform,
    to: Destination,
    header: &str,
    members: &[Member],
    page_size: usize,
) -> BroadcastReport {
    let messages = render_pages(header, members, page_size);
    let mut report = BroadcastReport {
        pages: messages.len(),
        ..BroadcastReport::default()
    };

    for (i, text) in messages.iter().enumerate() {
        match platform.send_html(to, text).await {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                error!(
                    "Failed to deliver broadcast page {}/{} to chat {}: {}",
                    i + 1,
                    report.pages,
                    to.chat_id,
                    e
                );
                report.failures.push(e);
            }
        }
    }

    info!(
        "Broadcast to chat {} delivered {}/{} pages for {} members",
        to.chat_id,
        report.delivered,
        report.pages,
        members.len()
    );
    report
}
