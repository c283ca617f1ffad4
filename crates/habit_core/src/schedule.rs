use chrono::{Datelike, NaiveDate};

use crate::dates::{month_window, week_window, DateWindow, WeekStart};
use crate::habit::{CompletionStatus, Frequency, Habit, HabitLog};
use crate::status::calculate_status;

/// Decides on which calendar days a habit is due.
///
/// Holds only the week-start policy, so it is `Copy` and can be shared freely
/// across render code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OccurrenceScheduler {
    week_start: WeekStart,
}

impl OccurrenceScheduler {
    pub fn new(week_start: WeekStart) -> Self {
        Self { week_start }
    }

    /// Whether `habit` should appear as actionable on `date`.
    ///
    /// `logs` is the habit's full history; quota habits count the `Done` logs
    /// inside the week or month containing `date`.
    pub fn should_show_on(&self, habit: &Habit, date: NaiveDate, logs: &[HabitLog]) -> bool {
        if !habit.is_active_on(date) {
            return false;
        }

        match &habit.frequency {
            Frequency::Daily => true,
            Frequency::SpecificDays { days } => days.contains(&date.weekday()),
            Frequency::Weekly { times } | Frequency::Monthly { times } => {
                let window = self.window_for(&habit.frequency, date);
                match window {
                    Some(window) => self.completions_in(habit, window, logs) < *times as usize,
                    None => false,
                }
            }
            Frequency::Unsupported { kind } => {
                tracing::trace!(habit = %habit.id, %kind, "unsupported frequency is never due");
                false
            }
        }
    }

    /// Quota window containing `date`, for weekly and monthly habits only.
    pub fn window_for(&self, frequency: &Frequency, date: NaiveDate) -> Option<DateWindow> {
        match frequency {
            Frequency::Weekly { .. } => Some(week_window(date, self.week_start)),
            Frequency::Monthly { .. } => Some(month_window(date)),
            _ => None,
        }
    }

    /// Number of logs inside `window` whose recomputed status is `Done`.
    pub fn completions_in(&self, habit: &Habit, window: DateWindow, logs: &[HabitLog]) -> usize {
        logs.iter()
            .filter(|log| window.contains(log.date))
            .filter(|log| calculate_status(habit, Some(log)).status == CompletionStatus::Done)
            .count()
    }
}

/// [`OccurrenceScheduler::should_show_on`] with Sunday-start weeks.
pub fn should_show_on(habit: &Habit, date: NaiveDate, logs: &[HabitLog]) -> bool {
    OccurrenceScheduler::default().should_show_on(habit, date, logs)
}
