use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::habit::{CompletionStatus, Frequency, Habit, HabitLog};
use crate::schedule::OccurrenceScheduler;
use crate::status::calculate_status;

/// Number of consecutive completed occurrences ending at `as_of`.
///
/// Day-based habits count scheduled days with a `Done` log; quota habits count
/// weeks or months whose quota was met. The occurrence containing `as_of` is
/// still open, so it extends the streak when already completed but never
/// breaks it.
pub fn current_streak(
    habit: &Habit,
    logs: &[HabitLog],
    as_of: NaiveDate,
    scheduler: &OccurrenceScheduler,
) -> u32 {
    let last = match habit.end_date {
        Some(end) if end < as_of => end,
        _ => as_of,
    };
    if last < habit.start_date {
        return 0;
    }

    match &habit.frequency {
        Frequency::Daily => day_streak(habit, logs, as_of, last, |_| true),
        Frequency::SpecificDays { days } => {
            day_streak(habit, logs, as_of, last, |date| days.contains(&date.weekday()))
        }
        Frequency::Weekly { times } | Frequency::Monthly { times } => {
            window_streak(habit, logs, as_of, last, *times, scheduler)
        }
        Frequency::Unsupported { .. } => 0,
    }
}

fn day_streak(
    habit: &Habit,
    logs: &[HabitLog],
    as_of: NaiveDate,
    last: NaiveDate,
    scheduled: impl Fn(NaiveDate) -> bool,
) -> u32 {
    let done_days: HashSet<NaiveDate> = logs
        .iter()
        .filter(|log| log.date >= habit.start_date && log.date <= last)
        .filter(|log| calculate_status(habit, Some(log)).status == CompletionStatus::Done)
        .map(|log| log.date)
        .collect();

    let mut streak = 0;
    let mut cursor = Some(last);
    while let Some(date) = cursor.filter(|date| *date >= habit.start_date) {
        if scheduled(date) {
            if done_days.contains(&date) {
                streak += 1;
            } else if date != as_of {
                break;
            }
        }
        cursor = date.pred_opt();
    }
    streak
}

fn window_streak(
    habit: &Habit,
    logs: &[HabitLog],
    as_of: NaiveDate,
    last: NaiveDate,
    times: u32,
    scheduler: &OccurrenceScheduler,
) -> u32 {
    let in_range: Vec<HabitLog> = logs
        .iter()
        .filter(|log| log.date >= habit.start_date && log.date <= last)
        .cloned()
        .collect();

    let mut streak = 0;
    let mut cursor = Some(last);
    while let Some(date) = cursor.filter(|date| *date >= habit.start_date) {
        let Some(window) = scheduler.window_for(&habit.frequency, date) else {
            break;
        };
        if scheduler.completions_in(habit, window, &in_range) >= times as usize {
            streak += 1;
        } else if !window.contains(as_of) {
            break;
        }
        cursor = window.day_before();
    }
    streak
}
