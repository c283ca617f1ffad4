use std::collections::HashMap;

use chrono::NaiveDate;

use crate::habit::{HabitId, HabitLog};

/// Log history grouped per habit and sorted by date.
///
/// Built once per render so that per-cell scheduling only scans the logs of
/// the habit being evaluated.
#[derive(Debug, Clone, Default)]
pub struct HabitLogIndex {
    by_habit: HashMap<HabitId, Vec<HabitLog>>,
}

impl HabitLogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_logs(logs: impl IntoIterator<Item = HabitLog>) -> Self {
        let mut index = Self::new();
        for log in logs {
            index.by_habit.entry(log.habit_id.clone()).or_default().push(log);
        }
        for logs in index.by_habit.values_mut() {
            // Stable: same-day logs keep their arrival order.
            logs.sort_by_key(|log| log.date);
        }
        index
    }

    pub fn insert(&mut self, log: HabitLog) {
        let logs = self.by_habit.entry(log.habit_id.clone()).or_default();
        let position = logs.partition_point(|existing| existing.date <= log.date);
        logs.insert(position, log);
    }

    pub fn logs_for(&self, habit_id: &str) -> &[HabitLog] {
        self.by_habit
            .get(habit_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The log recorded for `date`; when several exist the latest one wins.
    pub fn log_on(&self, habit_id: &str, date: NaiveDate) -> Option<&HabitLog> {
        let logs = self.logs_for(habit_id);
        let end = logs.partition_point(|log| log.date <= date);
        logs[..end].last().filter(|log| log.date == date)
    }

    pub fn len(&self) -> usize {
        self.by_habit.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_habit.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
    }

    #[test]
    fn groups_and_sorts_per_habit() {
        let index = HabitLogIndex::from_logs(vec![
            HabitLog::new("b", day(3)),
            HabitLog::new("a", day(5)),
            HabitLog::new("a", day(1)),
        ]);
        let dates: Vec<NaiveDate> = index.logs_for("a").iter().map(|log| log.date).collect();
        assert_eq!(dates, vec![day(1), day(5)]);
        assert_eq!(index.logs_for("b").len(), 1);
        assert!(index.logs_for("missing").is_empty());
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn latest_same_day_log_wins() {
        let mut index = HabitLogIndex::from_logs(vec![
            HabitLog::new("a", day(2)).with_value(1.0),
            HabitLog::new("a", day(2)).with_value(2.0),
        ]);
        assert_eq!(index.log_on("a", day(2)).and_then(|log| log.value), Some(2.0));

        index.insert(HabitLog::new("a", day(2)).with_value(3.0));
        assert_eq!(index.log_on("a", day(2)).and_then(|log| log.value), Some(3.0));
        assert!(index.log_on("a", day(3)).is_none());
        assert!(index.log_on("a", day(1)).is_none());
    }

    #[test]
    fn empty_index() {
        let index = HabitLogIndex::new();
        assert!(index.is_empty());
        assert!(index.log_on("a", day(1)).is_none());
    }
}
