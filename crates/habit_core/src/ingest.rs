//! Boundary between remote habit documents and the typed model.
//!
//! Remote records are written optimistically by several clients, so the
//! shapes here are loose: string enums with historical aliases, optional
//! dates, and timestamps in whatever form the writer used. Everything is
//! normalized once, here, and the rest of the crate only sees calendar dates
//! and canonical enums.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::dates::weekday_from_index;
use crate::error::IngestError;
use crate::habit::{normalize_key, Comparison, Frequency, Habit, HabitKind, HabitLog};

/// A date as found on a remote document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    /// Document-store timestamp object.
    Timestamp { seconds: i64, nanoseconds: i64 },
    /// Milliseconds since the Unix epoch.
    Millis(i64),
    Text(String),
}

impl RawDate {
    /// Calendar day this value names. Timestamps with an offset keep the day
    /// as seen in that offset; epoch values are read as UTC.
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            RawDate::Timestamp {
                seconds,
                nanoseconds,
            } => {
                let nanos = u32::try_from(*nanoseconds).ok()?;
                DateTime::from_timestamp(*seconds, nanos).map(|dt| dt.date_naive())
            }
            RawDate::Millis(millis) => {
                DateTime::from_timestamp_millis(*millis).map(|dt| dt.date_naive())
            }
            RawDate::Text(text) => parse_date_text(text),
        }
    }

    fn describe(&self) -> String {
        match self {
            RawDate::Timestamp {
                seconds,
                nanoseconds,
            } => format!("{seconds}s {nanoseconds}ns"),
            RawDate::Millis(millis) => millis.to_string(),
            RawDate::Text(text) => text.clone(),
        }
    }
}

impl From<NaiveDate> for RawDate {
    fn from(date: NaiveDate) -> Self {
        RawDate::Text(date.format("%Y-%m-%d").to_string())
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|dt| dt.date())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawChecklistItem {
    Id(String),
    Item { id: String },
}

impl RawChecklistItem {
    fn into_id(self) -> String {
        match self {
            RawChecklistItem::Id(id) | RawChecklistItem::Item { id } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFrequency {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHabit {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub frequency: RawFrequency,
    #[serde(default)]
    pub start_date: Option<RawDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<RawDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_target: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_target_comparison: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checklist: Vec<RawChecklistItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHabitLog {
    pub habit_id: String,
    #[serde(default)]
    pub date: Option<RawDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_checklist_items: Option<Vec<String>>,
}

impl TryFrom<RawHabit> for Habit {
    type Error = IngestError;

    fn try_from(raw: RawHabit) -> Result<Self, Self::Error> {
        let kind = raw
            .kind
            .parse::<HabitKind>()
            .map_err(|_| IngestError::UnknownHabitKind {
                habit_id: raw.id.clone(),
                value: raw.kind.clone(),
            })?;

        let start_date = match &raw.start_date {
            Some(value) => required_date(&raw.id, "start date", value)?,
            None => {
                return Err(IngestError::MissingStartDate {
                    habit_id: raw.id.clone(),
                })
            }
        };
        let end_date = raw
            .end_date
            .as_ref()
            .map(|value| required_date(&raw.id, "end date", value))
            .transpose()?;

        let daily_target_comparison = raw
            .daily_target_comparison
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                value
                    .parse::<Comparison>()
                    .map_err(|_| IngestError::UnknownComparison {
                        habit_id: raw.id.clone(),
                        value: value.to_string(),
                    })
            })
            .transpose()?;

        let frequency = frequency_from_raw(&raw.id, raw.frequency)?;

        Ok(Habit {
            id: raw.id,
            kind,
            frequency,
            start_date,
            end_date,
            daily_target: raw.daily_target,
            daily_target_comparison,
            checklist: raw
                .checklist
                .into_iter()
                .map(RawChecklistItem::into_id)
                .collect(),
        })
    }
}

fn required_date(
    record_id: &str,
    field: &'static str,
    value: &RawDate,
) -> Result<NaiveDate, IngestError> {
    value.to_date().ok_or_else(|| IngestError::InvalidDate {
        record_id: record_id.to_string(),
        field,
        value: value.describe(),
    })
}

fn frequency_from_raw(habit_id: &str, raw: RawFrequency) -> Result<Frequency, IngestError> {
    let times = raw.times.unwrap_or(1).max(1);
    let frequency = match normalize_key(&raw.kind).as_str() {
        "daily" | "everyday" => Frequency::Daily,
        "weekly" | "timesperweek" | "perweek" => Frequency::Weekly { times },
        "monthly" | "timespermonth" | "permonth" => Frequency::Monthly { times },
        "specificdays" | "daysofweek" | "weekdays" | "custom" => {
            let mut days = Vec::with_capacity(raw.days.len());
            for value in raw.days {
                let weekday = u8::try_from(value)
                    .ok()
                    .and_then(weekday_from_index)
                    .ok_or_else(|| IngestError::InvalidWeekday {
                        habit_id: habit_id.to_string(),
                        value,
                    })?;
                days.push(weekday);
            }
            Frequency::specific_days(days)
        }
        _ => {
            tracing::warn!(habit = %habit_id, kind = %raw.kind, "unrecognised habit frequency");
            Frequency::Unsupported { kind: raw.kind }
        }
    };
    Ok(frequency)
}

impl TryFrom<RawHabitLog> for HabitLog {
    type Error = IngestError;

    fn try_from(raw: RawHabitLog) -> Result<Self, Self::Error> {
        let date = match &raw.date {
            Some(value) => required_date(&raw.habit_id, "log date", value)?,
            None => {
                return Err(IngestError::MissingLogDate {
                    habit_id: raw.habit_id,
                })
            }
        };
        Ok(HabitLog {
            habit_id: raw.habit_id,
            date,
            value: raw.value,
            completed_checklist_items: raw.completed_checklist_items.unwrap_or_default(),
        })
    }
}

impl From<Habit> for RawHabit {
    fn from(habit: Habit) -> Self {
        let days: Vec<i64> = weekday_numbers(&habit.frequency)
            .into_iter()
            .map(i64::from)
            .collect();
        let frequency = match habit.frequency {
            Frequency::Daily => RawFrequency {
                kind: "daily".into(),
                times: None,
                days: Vec::new(),
            },
            Frequency::Weekly { times } => RawFrequency {
                kind: "weekly".into(),
                times: Some(times),
                days: Vec::new(),
            },
            Frequency::Monthly { times } => RawFrequency {
                kind: "monthly".into(),
                times: Some(times),
                days: Vec::new(),
            },
            Frequency::SpecificDays { .. } => RawFrequency {
                kind: "specific_days".into(),
                times: None,
                days,
            },
            Frequency::Unsupported { kind } => RawFrequency {
                kind,
                times: None,
                days: Vec::new(),
            },
        };
        RawHabit {
            id: habit.id,
            kind: habit.kind.as_str().to_string(),
            frequency,
            start_date: Some(habit.start_date.into()),
            end_date: habit.end_date.map(RawDate::from),
            daily_target: habit.daily_target,
            daily_target_comparison: habit
                .daily_target_comparison
                .map(|comparison| comparison.as_str().to_string()),
            checklist: habit
                .checklist
                .into_iter()
                .map(RawChecklistItem::Id)
                .collect(),
        }
    }
}

impl From<HabitLog> for RawHabitLog {
    fn from(log: HabitLog) -> Self {
        let completed = if log.completed_checklist_items.is_empty() {
            None
        } else {
            Some(log.completed_checklist_items)
        };
        RawHabitLog {
            habit_id: log.habit_id,
            date: Some(log.date.into()),
            value: log.value,
            completed_checklist_items: completed,
        }
    }
}

/// Top-level export document. Records stay untyped until each one is
/// decoded on its own, so one malformed document cannot sink the rest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSnapshot {
    #[serde(default)]
    pub habits: Vec<serde_json::Value>,
    #[serde(default)]
    pub logs: Vec<serde_json::Value>,
}

/// Validated habits and logs, plus every record that failed validation.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub habits: Vec<Habit>,
    pub logs: Vec<HabitLog>,
    pub rejected: Vec<IngestError>,
}

impl Snapshot {
    pub fn from_json_str(json: &str) -> Result<Self, IngestError> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_raw(raw: RawSnapshot) -> Self {
        let mut snapshot = Snapshot::default();

        for (index, value) in raw.habits.into_iter().enumerate() {
            let decoded =
                decode_record::<RawHabit>("habit", index, value).and_then(Habit::try_from);
            match decoded {
                Ok(habit) => snapshot.habits.push(habit),
                Err(err) => {
                    tracing::warn!(%err, "rejecting habit record");
                    snapshot.rejected.push(err);
                }
            }
        }

        for (index, value) in raw.logs.into_iter().enumerate() {
            let decoded =
                decode_record::<RawHabitLog>("habit log", index, value).and_then(HabitLog::try_from);
            match decoded {
                Ok(log) => snapshot.logs.push(log),
                Err(err) => {
                    tracing::warn!(%err, "rejecting habit log record");
                    snapshot.rejected.push(err);
                }
            }
        }

        tracing::debug!(
            habits = snapshot.habits.len(),
            logs = snapshot.logs.len(),
            rejected = snapshot.rejected.len(),
            "ingested habit snapshot"
        );
        snapshot
    }
}

fn decode_record<T: serde::de::DeserializeOwned>(
    record: &'static str,
    index: usize,
    value: serde_json::Value,
) -> Result<T, IngestError> {
    serde_json::from_value(value).map_err(|source| IngestError::Record {
        record,
        index,
        source,
    })
}

/// Weekday numbers (0 = Sunday) a specific-days habit is due on.
pub fn weekday_numbers(frequency: &Frequency) -> Vec<u8> {
    match frequency {
        Frequency::SpecificDays { days } => days
            .iter()
            .map(|day| day.num_days_from_sunday() as u8)
            .collect(),
        _ => Vec::new(),
    }
}
