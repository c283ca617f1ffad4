use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Days, Local, NaiveDate};
use habit_core::{
    build_day_agenda, current_streak, AgendaEntry, CompletionStatus, HabitLogIndex,
    OccurrenceScheduler, Snapshot, WeekStart,
};
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub(crate) data_file: Option<PathBuf>,
    pub(crate) week_start: WeekStart,
    pub(crate) agenda_span_days: usize,
    pub(crate) agenda_start_offset_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            week_start: WeekStart::default(),
            agenda_span_days: 7,
            agenda_start_offset_days: 0,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }

    /// Builds a config from `lookup`; unparsable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = lookup("HABIT_DATA_FILE") {
            if !path.trim().is_empty() {
                config.data_file = Some(PathBuf::from(path.trim()));
            }
        }
        if let Some(start) = lookup("HABIT_WEEK_START") {
            match start.parse::<WeekStart>() {
                Ok(week_start) => config.week_start = week_start,
                Err(err) => warn!(%err, "ignoring HABIT_WEEK_START"),
            }
        }
        if let Some(span) = lookup("HABIT_AGENDA_SPAN_DAYS") {
            if let Ok(value) = span.trim().parse::<usize>() {
                if value > 0 {
                    config.agenda_span_days = value;
                }
            }
        }
        if let Some(offset) = lookup("HABIT_AGENDA_START_OFFSET_DAYS") {
            if let Ok(value) = offset.trim().parse::<i64>() {
                config.agenda_start_offset_days = value;
            }
        }
        config
    }

    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = Some(path.into());
        self
    }

    pub fn data_file(&self) -> Option<&Path> {
        self.data_file.as_deref()
    }

    pub fn scheduler(&self) -> OccurrenceScheduler {
        OccurrenceScheduler::new(self.week_start)
    }

    /// First day of the agenda, relative to `today`.
    pub fn agenda_start(&self, today: NaiveDate) -> NaiveDate {
        let magnitude = Days::new(self.agenda_start_offset_days.unsigned_abs());
        let shifted = if self.agenda_start_offset_days >= 0 {
            today.checked_add_days(magnitude)
        } else {
            today.checked_sub_days(magnitude)
        };
        shifted.unwrap_or(today)
    }
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading habit snapshot `{}`", path.display()))?;
    let snapshot = Snapshot::from_json_str(&raw)
        .with_context(|| format!("decoding habit snapshot `{}`", path.display()))?;
    for rejected in &snapshot.rejected {
        warn!(path = %path.display(), %rejected, "skipped record");
    }
    info!(
        path = %path.display(),
        habits = snapshot.habits.len(),
        logs = snapshot.logs.len(),
        "loaded habit snapshot"
    );
    Ok(snapshot)
}

/// Renders the configured span of days as plain text lines.
pub fn render_agenda(config: &AppConfig, snapshot: &Snapshot, today: NaiveDate) -> Vec<String> {
    let scheduler = config.scheduler();
    let index = HabitLogIndex::from_logs(snapshot.logs.iter().cloned());
    let start = config.agenda_start(today);

    let mut lines = Vec::new();
    for date in start.iter_days().take(config.agenda_span_days) {
        let entries = build_day_agenda(&snapshot.habits, &index, date, &scheduler);
        lines.push(date.format("%a %Y-%m-%d").to_string());
        if entries.is_empty() {
            lines.push("  (nothing due)".to_string());
            continue;
        }
        for entry in &entries {
            let streak = snapshot
                .habits
                .iter()
                .find(|habit| habit.id == entry.habit_id)
                .map(|habit| current_streak(habit, index.logs_for(&habit.id), date, &scheduler))
                .unwrap_or(0);
            lines.push(format_entry(entry, streak));
        }
    }
    debug!(lines = lines.len(), "rendered agenda");
    lines
}

fn format_entry(entry: &AgendaEntry, streak: u32) -> String {
    let mark = match entry.status.status {
        CompletionStatus::Done => "x",
        CompletionStatus::Partial => "~",
        CompletionStatus::None => " ",
    };
    let mut line = format!(
        "  [{mark}] {:<20} {:>3.0}%",
        entry.habit_id,
        entry.status.progress * 100.0
    );
    if streak > 0 {
        line.push_str(&format!("  streak {streak}"));
    }
    if !entry.due {
        line.push_str("  (not due)");
    }
    line
}

pub fn run(config: AppConfig) -> Result<()> {
    let path = config
        .data_file()
        .context("no habit snapshot configured; set HABIT_DATA_FILE or pass a path")?;
    let snapshot = load_snapshot(path)?;
    let today = Local::now().date_naive();
    for line in render_agenda(&config, &snapshot, today) {
        println!("{line}");
    }
    Ok(())
}
