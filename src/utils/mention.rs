use crate::utils::html::escape_html;

/// Name shown for members without a handle or a display name.
pub const FALLBACK_NAME: &str = "user";

/// Renders a member as a taggable reference.
///
/// A non-empty handle wins and renders as `@handle`. Otherwise an HTML
/// deep link to the member id is produced, labelled with the escaped
/// display name.
pub fn format_mention(member_id: i64, handle: Option<&str>, display_name: &str) -> String {
    if let Some(handle) = handle.filter(|h| !h.is_empty()) {
        return format!("@{handle}");
    }
    let name = if display_name.is_empty() {
        FALLBACK_NAME
    } else {
        display_name
    };
    format!(
        "<a href=\"tg://user?id={}\">{}</a>",
        member_id,
        escape_html(name)
    )
}
