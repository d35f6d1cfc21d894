//! Escaping for Telegram HTML parse mode.
//!
//! Every message the bot sends uses HTML parse mode, so any user-supplied
//! text (display names, poll titles) must be escaped before it is embedded.

/// Escapes `text` for use as HTML text content or inside a double-quoted
/// attribute.
///
/// teloxide's escaper covers `&`, `<` and `>`. Quotes are escaped on top of
/// that so the result also fits inside attribute values.
///
/// # Example
/// ```
/// use roster_bot::utils::html::escape_html;
///
/// assert_eq!(escape_html("<b>Al</b>"), "&lt;b&gt;Al&lt;/b&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    teloxide::utils::html::escape(text)
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
