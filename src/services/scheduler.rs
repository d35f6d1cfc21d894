use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

use crate::error::PollError;
use crate::platform::ChatPlatform;
use crate::roster::RosterStore;
use crate::services::poll::{compose_and_send, PollOutcome, PollRequest};
use crate::utils::datetime::{format_date, next_occurrence, today_in, weekday_from_index, weekday_index};
use crate::utils::validation::{validate_poll_choices, validate_poll_title};

/// Placeholder in a preset title replaced by the event date.
pub const DATE_PLACEHOLDER: &str = "{date}";

const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// The days a recurring poll fires on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// On each listed weekday, 0 = Monday.
    Weekly { weekdays: Vec<u32> },
    /// On one day of every month.
    Monthly { day: u32 },
}

impl Trigger {
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            Trigger::Weekly { weekdays } => weekdays.contains(&weekday_index(date)),
            Trigger::Monthly { day } => date.day() == *day,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Trigger::Weekly { weekdays } => {
                let days: Vec<&str> = weekdays
                    .iter()
                    .filter_map(|d| WEEKDAY_NAMES.get(*d as usize).copied())
                    .collect();
                format!("every {}", days.join(", "))
            }
            Trigger::Monthly { day } => format!("day {day} of each month"),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Trigger::Weekly { weekdays } => {
                if weekdays.is_empty() {
                    return Err(anyhow!("weekly trigger needs at least one weekday"));
                }
                if let Some(bad) = weekdays.iter().find(|d| **d > 6) {
                    return Err(anyhow!("weekday {} is out of range 0-6", bad));
                }
            }
            Trigger::Monthly { day } => {
                if !(1..=31).contains(day) {
                    return Err(anyhow!("day of month {} is out of range 1-31", day));
                }
            }
        }
        Ok(())
    }
}

/// A named recurring poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPreset {
    pub name: String,
    /// May contain `{date}`.
    pub title: String,
    pub choices: Vec<String>,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default)]
    pub mention_all: bool,
    #[serde(default)]
    pub topic_id: Option<i32>,
    /// Weekday (0 = Monday) the poll is about; `{date}` renders its next
    /// occurrence. Without it `{date}` renders the firing date.
    #[serde(default)]
    pub event_weekday: Option<u32>,
    pub trigger: Trigger,
    /// Firing time, UTC.
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
}

impl PollPreset {
    pub fn validate(&self) -> Result<()> {
        let context = |e: String| anyhow!("preset '{}': {}", self.name, e);

        if self.name.trim().is_empty() || self.name.contains(char::is_whitespace) {
            return Err(anyhow!("preset name '{}' must be a single word", self.name));
        }
        validate_poll_title(&self.title).map_err(|e| context(e.to_string()))?;
        validate_poll_choices(&self.choices).map_err(|e| context(e.to_string()))?;
        self.trigger.validate().map_err(|e| context(e.to_string()))?;
        if let Some(day) = self.event_weekday {
            if weekday_from_index(day).is_none() {
                return Err(context(format!("event weekday {day} is out of range 0-6")));
            }
        }
        if self.hour > 23 || self.minute > 59 {
            return Err(context(format!(
                "time {:02}:{:02} is not a valid time of day",
                self.hour, self.minute
            )));
        }
        Ok(())
    }

    /// Six-field cron expression firing daily at the preset's time.
    pub fn cron_expression(&self) -> String {
        format!("0 {} {} * * *", self.minute, self.hour)
    }

    pub fn render_title(&self, today: NaiveDate) -> String {
        let event_date = self
            .event_weekday
            .and_then(weekday_from_index)
            .map(|weekday| next_occurrence(today, weekday))
            .unwrap_or(today);
        self.title.replace(DATE_PLACEHOLDER, &format_date(event_date))
    }

    pub fn to_request(&self, chat_id: i64, today: NaiveDate) -> PollRequest {
        PollRequest {
            chat_id,
            topic_id: self.topic_id,
            title: self.render_title(today),
            choices: self.choices.clone(),
            anonymous: self.anonymous,
            mention_first: self.mention_all,
        }
    }
}

/// Built-in presets: one weekly sign-up per fixed topic plus a monthly poll.
pub fn default_presets(primary_topic: Option<i32>, secondary_topic: Option<i32>) -> Vec<PollPreset> {
    vec![
        PollPreset {
            name: "football".to_string(),
            title: "⚽ Football on Saturday {date}: are you in?".to_string(),
            choices: vec![
                "I'm in".to_string(),
                "Maybe".to_string(),
                "Can't make it".to_string(),
            ],
            anonymous: false,
            mention_all: true,
            topic_id: primary_topic,
            event_weekday: Some(5),
            trigger: Trigger::Weekly { weekdays: vec![2] },
            hour: 2,
            minute: 0,
        },
        PollPreset {
            name: "badminton".to_string(),
            title: "🏸 Badminton on Tuesday {date}: are you in?".to_string(),
            choices: vec!["I'm in".to_string(), "Can't make it".to_string()],
            anonymous: false,
            mention_all: false,
            topic_id: secondary_topic,
            event_weekday: Some(1),
            trigger: Trigger::Weekly { weekdays: vec![6] },
            hour: 2,
            minute: 0,
        },
        PollPreset {
            name: "monthly".to_string(),
            title: "📅 Monthly check-in {date}: still playing this month?".to_string(),
            choices: vec!["Yes".to_string(), "Taking a break".to_string()],
            anonymous: true,
            mention_all: true,
            topic_id: primary_topic,
            event_weekday: None,
            trigger: Trigger::Monthly { day: 1 },
            hour: 2,
            minute: 0,
        },
    ]
}

/// Runs presets against the configured destination chat. Runs are
/// serialised so two presets never post at the same time.
pub struct PresetRunner {
    platform: Arc<dyn ChatPlatform>,
    store: Arc<RosterStore>,
    chat_id: i64,
    timezone: Tz,
    page_size: usize,
    run_lock: Mutex<()>,
}

impl PresetRunner {
    pub fn new(
        platform: Arc<dyn ChatPlatform>,
        store: Arc<RosterStore>,
        chat_id: i64,
        timezone: Tz,
        page_size: usize,
    ) -> Self {
        Self {
            platform,
            store,
            chat_id,
            timezone,
            page_size,
            run_lock: Mutex::new(()),
        }
    }

    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    /// Today's date in the schedule time zone.
    pub fn today(&self) -> NaiveDate {
        today_in(self.timezone)
    }

    /// Posts the preset if its trigger matches `today`. `Ok(None)` when it
    /// does not.
    pub async fn run_if_due(
        &self,
        preset: &PollPreset,
        today: NaiveDate,
    ) -> Result<Option<PollOutcome>, PollError> {
        if !preset.trigger.matches(today) {
            tracing::debug!("Preset '{}' not due on {}", preset.name, today);
            return Ok(None);
        }
        self.run_now(preset, today).await.map(Some)
    }

    /// Posts the preset regardless of its trigger.
    pub async fn run_now(&self, preset: &PollPreset, today: NaiveDate) -> Result<PollOutcome, PollError> {
        let _guard = self.run_lock.lock().await;
        let request = preset.to_request(self.chat_id, today);
        tracing::info!("Running preset '{}' for {}", preset.name, today);
        compose_and_send(self.platform.as_ref(), &self.store, &request, self.page_size).await
    }
}

/// Cron-driven runner for the recurring presets.
pub struct PollScheduler {
    runner: Arc<PresetRunner>,
    presets: Vec<PollPreset>,
    scheduler: JobScheduler,
    job_ids: Vec<Uuid>,
}

impl PollScheduler {
    pub async fn new(
        runner: Arc<PresetRunner>,
        presets: Vec<PollPreset>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            runner,
            presets,
            scheduler,
            job_ids: Vec::new(),
        })
    }

    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        for preset in &self.presets {
            let runner = self.runner.clone();
            let job_preset = preset.clone();

            // Fires daily; the trigger decides whether today is a posting day.
            let job = Job::new_async(preset.cron_expression().as_str(), move |_uuid, _l| {
                let runner = runner.clone();
                let preset = job_preset.clone();
                Box::pin(async move {
                    let today = runner.today();
                    if let Err(e) = runner.run_if_due(&preset, today).await {
                        tracing::error!("Scheduled preset '{}' failed: {}", preset.name, e);
                    }
                })
            })?;

            let id = self.scheduler.add(job).await?;
            self.job_ids.push(id);
            tracing::info!(
                "Scheduled preset '{}' ({}, daily check at {:02}:{:02} UTC)",
                preset.name,
                preset.trigger.describe(),
                preset.hour,
                preset.minute
            );
        }

        self.scheduler.start().await?;

        tracing::info!(
            "Poll scheduler started with {} presets for chat {}",
            self.job_ids.len(),
            self.runner.chat_id()
        );
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        Ok(())
    }
}
