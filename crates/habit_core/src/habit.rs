use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;
use crate::ingest::{RawHabit, RawHabitLog};

pub type HabitId = String;

/// Decides which progress rule applies to a habit's logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HabitKind {
    Binary,
    Count,
    Duration,
    Checklist,
}

impl HabitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HabitKind::Binary => "binary",
            HabitKind::Count => "count",
            HabitKind::Duration => "duration",
            HabitKind::Checklist => "checklist",
        }
    }
}

impl fmt::Display for HabitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "binary" | "yesno" | "boolean" | "check" => Ok(HabitKind::Binary),
            "count" | "numeric" | "number" | "quantity" => Ok(HabitKind::Count),
            "duration" | "timer" | "time" | "minutes" => Ok(HabitKind::Duration),
            "checklist" | "list" | "subtasks" => Ok(HabitKind::Checklist),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// How a logged value is held against `daily_target`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    GreaterThan,
    #[default]
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Equal,
    AnyNonZero,
}

impl Comparison {
    pub fn as_str(self) -> &'static str {
        match self {
            Comparison::GreaterThan => "greater_than",
            Comparison::GreaterOrEqual => "greater_or_equal",
            Comparison::LessThan => "less_than",
            Comparison::LessOrEqual => "less_or_equal",
            Comparison::Equal => "equal",
            Comparison::AnyNonZero => "any_non_zero",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collapses the historical comparator spellings into one variant each.
impl FromStr for Comparison {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.trim() {
            ">" => Some(Comparison::GreaterThan),
            ">=" => Some(Comparison::GreaterOrEqual),
            "<" => Some(Comparison::LessThan),
            "<=" => Some(Comparison::LessOrEqual),
            "=" | "==" => Some(Comparison::Equal),
            _ => None,
        };
        if let Some(comparison) = parsed {
            return Ok(comparison);
        }
        match normalize_key(s).as_str() {
            "greaterthan" | "morethan" | "over" | "gt" => Ok(Comparison::GreaterThan),
            "greaterorequal" | "greaterthanorequal" | "atleast" | "min" | "minimum" | "gte" => {
                Ok(Comparison::GreaterOrEqual)
            }
            "lessthan" | "fewerthan" | "under" | "lt" => Ok(Comparison::LessThan),
            "lessorequal" | "lessthanorequal" | "atmost" | "max" | "maximum" | "lte" => {
                Ok(Comparison::LessOrEqual)
            }
            "equal" | "equals" | "exactly" | "eq" => Ok(Comparison::Equal),
            "anynonzero" | "nonzero" | "any" | "anyvalue" => Ok(Comparison::AnyNonZero),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// Recurrence rule of a habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    /// Due until `times` completions land in the week containing the date.
    Weekly { times: u32 },
    /// Due until `times` completions land in the calendar month.
    Monthly { times: u32 },
    SpecificDays { days: Vec<Weekday> },
    /// A kind this build does not understand; never due.
    Unsupported { kind: String },
}

impl Frequency {
    pub fn specific_days(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut collected: Vec<Weekday> = Vec::new();
        for day in days {
            if !collected.contains(&day) {
                collected.push(day);
            }
        }
        collected.sort_by_key(|day| day.num_days_from_sunday());
        Frequency::SpecificDays { days: collected }
    }
}

/// A recurring commitment, as evaluated by the scheduler and status calculator.
///
/// Serialized through [`RawHabit`], so deserializing always runs ingestion
/// validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHabit", into = "RawHabit")]
pub struct Habit {
    pub id: HabitId,
    pub kind: HabitKind,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub daily_target: Option<f64>,
    pub daily_target_comparison: Option<Comparison>,
    pub checklist: Vec<String>,
}

impl Habit {
    pub fn new(
        id: impl Into<HabitId>,
        kind: HabitKind,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            frequency,
            start_date,
            end_date: None,
            daily_target: None,
            daily_target_comparison: None,
            checklist: Vec::new(),
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_target(mut self, target: f64, comparison: Comparison) -> Self {
        self.daily_target = Some(target);
        self.daily_target_comparison = Some(comparison);
        self
    }

    pub fn with_checklist<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.checklist = items.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `date` falls inside `[start_date, end_date]`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        if date < self.start_date {
            return false;
        }
        match self.end_date {
            Some(end) => date <= end,
            None => true,
        }
    }
}

/// One recorded instance of progress toward a habit on a specific day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHabitLog", into = "RawHabitLog")]
pub struct HabitLog {
    pub habit_id: HabitId,
    pub date: NaiveDate,
    pub value: Option<f64>,
    pub completed_checklist_items: Vec<String>,
}

impl HabitLog {
    pub fn new(habit_id: impl Into<HabitId>, date: NaiveDate) -> Self {
        Self {
            habit_id: habit_id.into(),
            date,
            value: None,
            completed_checklist_items: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_completed_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.completed_checklist_items = items.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompletionStatus {
    Done,
    Partial,
    None,
}

/// Derived completion state of one log. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedStatus {
    pub status: CompletionStatus,
    pub progress: f64,
    pub is_complete: bool,
}

impl CalculatedStatus {
    pub fn not_started() -> Self {
        Self {
            status: CompletionStatus::None,
            progress: 0.0,
            is_complete: false,
        }
    }

    pub fn done() -> Self {
        Self {
            status: CompletionStatus::Done,
            progress: 1.0,
            is_complete: true,
        }
    }

    /// Builds a status whose fields agree with each other: `is_complete` and
    /// `Done` always travel together and progress stays within `[0, 1]`.
    pub fn from_parts(is_complete: bool, has_progress: bool, progress: f64) -> Self {
        let status = if is_complete {
            CompletionStatus::Done
        } else if has_progress {
            CompletionStatus::Partial
        } else {
            CompletionStatus::None
        };
        Self {
            status,
            progress: clamp_progress(progress),
            is_complete,
        }
    }
}

pub(crate) fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Lowercases and drops separators so `AT_LEAST`, `at-least` and `atLeast` match.
pub(crate) fn normalize_key(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
