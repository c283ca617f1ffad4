use chrono::NaiveDate;
use serde::Serialize;

use crate::habit::{CalculatedStatus, Habit, HabitId};
use crate::index::HabitLogIndex;
use crate::schedule::OccurrenceScheduler;
use crate::status::calculate_status;

/// One habit's row on a day view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaEntry {
    pub habit_id: HabitId,
    pub date: NaiveDate,
    /// Scheduled on this day. Quota habits that were completed today stay
    /// listed with `due = false`.
    pub due: bool,
    pub status: CalculatedStatus,
}

/// Habits to list on `date`: every habit that is due, plus every habit with a
/// log on that day. Unfinished entries sort first, then by habit id.
pub fn build_day_agenda(
    habits: &[Habit],
    index: &HabitLogIndex,
    date: NaiveDate,
    scheduler: &OccurrenceScheduler,
) -> Vec<AgendaEntry> {
    let mut entries: Vec<AgendaEntry> = habits
        .iter()
        .filter_map(|habit| {
            let logs = index.logs_for(&habit.id);
            let due = scheduler.should_show_on(habit, date, logs);
            let log = index.log_on(&habit.id, date);
            if !due && log.is_none() {
                return None;
            }
            Some(AgendaEntry {
                habit_id: habit.id.clone(),
                date,
                due,
                status: calculate_status(habit, log),
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        a.status
            .is_complete
            .cmp(&b.status.is_complete)
            .then_with(|| a.habit_id.cmp(&b.habit_id))
    });
    tracing::debug!(%date, entries = entries.len(), "built day agenda");
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{Comparison, CompletionStatus, Frequency, HabitKind, HabitLog};
    use chrono::Weekday;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
    }

    fn habits() -> Vec<Habit> {
        vec![
            Habit::new("water", HabitKind::Count, Frequency::Daily, day(1))
                .with_target(8.0, Comparison::GreaterOrEqual),
            Habit::new(
                "gym",
                HabitKind::Binary,
                Frequency::Weekly { times: 1 },
                day(1),
            ),
            Habit::new(
                "lift",
                HabitKind::Binary,
                Frequency::specific_days([Weekday::Mon]),
                day(1),
            ),
        ]
    }

    #[test]
    fn lists_due_habits_with_status() {
        let index = HabitLogIndex::from_logs(vec![HabitLog::new("water", day(21)).with_value(3.0)]);
        // Tuesday: lift is not scheduled.
        let entries = build_day_agenda(&habits(), &index, day(21), &OccurrenceScheduler::default());
        let ids: Vec<&str> = entries.iter().map(|entry| entry.habit_id.as_str()).collect();
        assert_eq!(ids, vec!["gym", "water"]);
        let water = &entries[1];
        assert!(water.due);
        assert_eq!(water.status.status, CompletionStatus::Partial);
    }

    #[test]
    fn quota_met_today_still_lists_the_done_entry_last() {
        let index = HabitLogIndex::from_logs(vec![HabitLog::new("gym", day(21))]);
        let entries = build_day_agenda(&habits(), &index, day(21), &OccurrenceScheduler::default());
        let gym = entries
            .iter()
            .find(|entry| entry.habit_id == "gym")
            .expect("gym listed");
        assert!(!gym.due);
        assert!(gym.status.is_complete);
        assert_eq!(entries.last().map(|entry| entry.habit_id.as_str()), Some("gym"));

        // Later that week the habit drops off entirely.
        let later = build_day_agenda(&habits(), &index, day(23), &OccurrenceScheduler::default());
        assert!(later.iter().all(|entry| entry.habit_id != "gym"));
    }
}
