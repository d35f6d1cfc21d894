use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use std::env;
use std::path::{Path, PathBuf};

use crate::services::scheduler::{default_presets, PollPreset};
use crate::utils::pagination::DEFAULT_PAGE_SIZE;
use crate::utils::validation::validate_telegram_chat_id;

const DEFAULT_ROSTER_FILE: &str = "./data/members.json";
const DEFAULT_IMPORT_FILE: &str = "./data/members_import.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub roster_file: PathBuf,
    pub import_file: PathBuf,
    pub http_port: u16,
    pub mention_page_size: usize,
    pub mention_all_admin_only: bool,
    pub poll_chat_id: Option<i64>,
    pub poll_topic_primary: Option<i32>,
    pub poll_topic_secondary: Option<i32>,
    pub presets_file: Option<PathBuf>,
    pub schedule_timezone: Tz,
}

/// Reads a variable, treating unset and blank the same.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match non_empty_var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {}", name)),
        None => Ok(None),
    }
}

fn parse_bool(name: &str) -> Result<bool> {
    match non_empty_var(name).map(|v| v.trim().to_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(anyhow!("Invalid {}", name)),
        },
    }
}

/// Roster file location without requiring the rest of the configuration.
pub fn roster_file_from_env() -> PathBuf {
    PathBuf::from(non_empty_var("ROSTER_FILE").unwrap_or_else(|| DEFAULT_ROSTER_FILE.to_string()))
}

/// Import file location without requiring the rest of the configuration.
pub fn import_file_from_env() -> PathBuf {
    PathBuf::from(non_empty_var("ROSTER_IMPORT_FILE").unwrap_or_else(|| DEFAULT_IMPORT_FILE.to_string()))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let http_port = parse_var::<u16>("HTTP_PORT")?.unwrap_or(3000);

        let mention_page_size = parse_var::<usize>("MENTION_PAGE_SIZE")?.unwrap_or(DEFAULT_PAGE_SIZE);
        if mention_page_size == 0 {
            return Err(anyhow!("Invalid MENTION_PAGE_SIZE"));
        }

        let poll_chat_id = parse_var::<i64>("POLL_CHAT_ID")?;
        if let Some(chat_id) = poll_chat_id {
            validate_telegram_chat_id(chat_id).context("Invalid POLL_CHAT_ID")?;
        }

        let schedule_timezone = match non_empty_var("SCHEDULE_TIMEZONE") {
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|_| anyhow!("Invalid SCHEDULE_TIMEZONE: {}", name.trim()))?,
            None => Tz::UTC,
        };

        Ok(Config {
            telegram_bot_token: token,
            roster_file: roster_file_from_env(),
            import_file: import_file_from_env(),
            http_port,
            mention_page_size,
            mention_all_admin_only: parse_bool("MENTION_ALL_ADMIN_ONLY")?,
            poll_chat_id,
            poll_topic_primary: parse_var::<i32>("POLL_TOPIC_PRIMARY")?,
            poll_topic_secondary: parse_var::<i32>("POLL_TOPIC_SECONDARY")?,
            presets_file: non_empty_var("POLL_PRESETS_FILE").map(PathBuf::from),
            schedule_timezone,
        })
    }

    /// Recurring presets: the presets file when configured, otherwise the
    /// built-in ones when a poll chat is set, otherwise none.
    pub fn presets(&self) -> Result<Vec<PollPreset>> {
        if let Some(path) = &self.presets_file {
            return load_presets(path);
        }
        if self.poll_chat_id.is_none() {
            return Ok(Vec::new());
        }
        Ok(default_presets(
            self.poll_topic_primary,
            self.poll_topic_secondary,
        ))
    }
}

/// Loads and validates a JSON array of presets. Names must be unique
/// ignoring ASCII case, matching how `/preset` looks them up.
pub fn load_presets(path: &Path) -> Result<Vec<PollPreset>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read presets file {}", path.display()))?;
    let presets: Vec<PollPreset> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse presets file {}", path.display()))?;

    for (i, preset) in presets.iter().enumerate() {
        preset.validate()?;
        if presets[..i]
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(&preset.name))
        {
            return Err(anyhow!("Duplicate preset name '{}'", preset.name));
        }
    }
    Ok(presets)
}
