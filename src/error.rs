//! Error types for the roster store, the chat platform boundary and poll composition.

use thiserror::Error;

/// Failures while loading, persisting or importing the roster file.
#[derive(Error, Debug)]
pub enum RosterError {
    /// Reading, writing or renaming a file failed.
    #[error("roster I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file contents are not a valid roster document.
    #[error("roster format error: {0}")]
    Format(#[from] serde_json::Error),

    /// A store operation running on the blocking pool did not finish.
    #[error("roster task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Failures reported by the external chat platform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The request reached the platform (or tried to) and failed.
    #[error("platform request failed: {0}")]
    Request(String),
}

/// Reasons a poll is rejected or could not be delivered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollError {
    /// Title missing or blank.
    #[error("Poll title cannot be empty")]
    EmptyTitle,

    /// Title above the platform limit.
    #[error("Poll title cannot be longer than {max} characters")]
    TitleTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// Fewer than two non-empty choices.
    #[error("A poll needs at least 2 choices, got {found}")]
    NotEnoughChoices {
        /// Number of non-empty choices supplied.
        found: usize,
    },

    /// More choices than the platform accepts.
    #[error("A poll cannot have more than {max} choices, got {found}")]
    TooManyChoices {
        /// Maximum accepted number of choices.
        max: usize,
        /// Number of choices supplied.
        found: usize,
    },

    /// A single choice above the platform limit.
    #[error("Choice '{choice}' is longer than {max} characters")]
    ChoiceTooLong {
        /// The offending choice.
        choice: String,
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// The poll itself could not be sent.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl PollError {
    /// True for errors caused by the invoker's input rather than the platform.
    pub fn is_validation(&self) -> bool {
        !matches!(self, PollError::Platform(_))
    }
}

/// Umbrella error returned by command handlers.
#[derive(Error, Debug)]
pub enum BotError {
    /// Roster persistence failed.
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// A platform call failed.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Poll composition failed.
    #[error(transparent)]
    Poll(#[from] PollError),
}
