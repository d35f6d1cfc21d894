use crate::error::PlatformError;
use crate::platform::{ChatPlatform, Destination};
use crate::utils::html::escape_html;

/// Feedback types for different command outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackType {
    Success,
    Warning,
    Error,
    Info,
    Denied,
}

impl FeedbackType {
    fn emoji(&self) -> &'static str {
        match self {
            FeedbackType::Success => "✅",
            FeedbackType::Warning => "⚠️",
            FeedbackType::Error => "❌",
            FeedbackType::Info => "ℹ️",
            FeedbackType::Denied => "⛔",
        }
    }
}

/// Formats a feedback line: emoji prefix plus escaped message.
pub fn format_feedback(feedback_type: FeedbackType, message: &str) -> String {
    format!("{} {}", feedback_type.emoji(), escape_html(message))
}

/// Replies to the chat (and topic) a command came from
pub struct CommandFeedback<'a> {
    platform: &'a dyn ChatPlatform,
    to: Destination,
}

impl<'a> CommandFeedback<'a> {
    pub fn new(platform: &'a dyn ChatPlatform, to: Destination) -> Self {
        Self { platform, to }
    }

    /// Send immediate feedback message
    pub async fn send(&self, feedback_type: FeedbackType, message: &str) -> Result<(), PlatformError> {
        self.platform
            .send_html(self.to, &format_feedback(feedback_type, message))
            .await
    }

    /// Send text that is already valid HTML
    pub async fn send_html(&self, html: &str) -> Result<(), PlatformError> {
        self.platform.send_html(self.to, html).await
    }

    /// Send plain text, escaped
    pub async fn send_text(&self, text: &str) -> Result<(), PlatformError> {
        self.platform.send_html(self.to, &escape_html(text)).await
    }

    pub async fn success(&self, message: &str) -> Result<(), PlatformError> {
        self.send(FeedbackType::Success, message).await
    }

    pub async fn error(&self, message: &str) -> Result<(), PlatformError> {
        self.send(FeedbackType::Error, message).await
    }

    pub async fn warning(&self, message: &str) -> Result<(), PlatformError> {
        self.send(FeedbackType::Warning, message).await
    }

    pub async fn info(&self, message: &str) -> Result<(), PlatformError> {
        self.send(FeedbackType::Info, message).await
    }

    /// Refuse a privileged command
    pub async fn denied(&self, message: &str) -> Result<(), PlatformError> {
        self.send(FeedbackType::Denied, message).await
    }

    /// Send validation error with helpful suggestion
    pub async fn validation_error(&self, error: &str, suggestion: &str) -> Result<(), PlatformError> {
        let message = format!(
            "{}\n\n💡 <b>Suggestion:</b> {}",
            format_feedback(FeedbackType::Error, error),
            escape_html(suggestion)
        );
        self.platform.send_html(self.to, &message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_type_emojis() {
        assert_eq!(FeedbackType::Success.emoji(), "✅");
        assert_eq!(FeedbackType::Warning.emoji(), "⚠️");
        assert_eq!(FeedbackType::Error.emoji(), "❌");
        assert_eq!(FeedbackType::Info.emoji(), "ℹ️");
        assert_eq!(FeedbackType::Denied.emoji(), "⛔");
    }

    #[test]
    fn test_format_feedback_escapes() {
        assert_eq!(
            format_feedback(FeedbackType::Error, "bad <input>"),
            "❌ bad &lt;input&gt;"
        );
    }
}
