use crate::habit::{clamp_progress, CalculatedStatus, Comparison, Habit, HabitKind, HabitLog};

/// Target used when a count or duration habit has none configured.
pub const DEFAULT_TARGET: f64 = 1.0;

/// Derives the completion state a single log represents for `habit`.
///
/// Always recomputed from the raw logged value; a missing log means the habit
/// has not been acted upon yet. Never fails: absent fields fall back to `0`
/// for values and [`DEFAULT_TARGET`] for targets.
pub fn calculate_status(habit: &Habit, log: Option<&HabitLog>) -> CalculatedStatus {
    let Some(log) = log else {
        return CalculatedStatus::not_started();
    };

    match habit.kind {
        HabitKind::Binary => CalculatedStatus::done(),
        HabitKind::Count | HabitKind::Duration => measured_status(habit, log),
        HabitKind::Checklist => checklist_status(habit, log),
    }
}

fn measured_status(habit: &Habit, log: &HabitLog) -> CalculatedStatus {
    let value = log.value.unwrap_or(0.0);
    let target = habit.daily_target.unwrap_or(DEFAULT_TARGET);
    let comparison = habit.daily_target_comparison.unwrap_or_default();

    CalculatedStatus::from_parts(
        meets_target(comparison, value, target),
        value > 0.0,
        progress_toward(comparison, value, target),
    )
}

pub fn meets_target(comparison: Comparison, value: f64, target: f64) -> bool {
    match comparison {
        Comparison::GreaterThan => value > target,
        Comparison::GreaterOrEqual => value >= target,
        Comparison::LessThan => value < target,
        Comparison::LessOrEqual => value <= target,
        Comparison::Equal => value == target,
        Comparison::AnyNonZero => value > 0.0,
    }
}

/// Progress fraction in `[0, 1]`. Stay-under comparisons carry no partial
/// scale: any logged amount counts as full progress.
pub fn progress_toward(comparison: Comparison, value: f64, target: f64) -> f64 {
    let logged = if value > 0.0 { 1.0 } else { 0.0 };
    let progress = match comparison {
        Comparison::GreaterThan | Comparison::GreaterOrEqual => ratio(value, target),
        Comparison::Equal if value > 0.0 => ratio(value, target),
        Comparison::Equal => 0.0,
        Comparison::LessThan | Comparison::LessOrEqual | Comparison::AnyNonZero => logged,
    };
    clamp_progress(progress)
}

fn ratio(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        // No meaningful scale below a non-positive target.
        return if value > 0.0 { 1.0 } else { 0.0 };
    }
    value / target
}

/// Counts entries as stored: `total` is the checklist length and `done` the
/// number of completed ids on the log.
fn checklist_status(habit: &Habit, log: &HabitLog) -> CalculatedStatus {
    let total = habit.checklist.len();
    if total == 0 {
        return CalculatedStatus::not_started();
    }

    let done = log.completed_checklist_items.len();
    CalculatedStatus::from_parts(done == total, done > 0, done as f64 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{CompletionStatus, Frequency};
    use chrono::NaiveDate;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    fn measured(kind: HabitKind, target: f64, comparison: Comparison) -> Habit {
        Habit::new("water", kind, Frequency::Daily, start()).with_target(target, comparison)
    }

    fn log(value: f64) -> HabitLog {
        HabitLog::new("water", start()).with_value(value)
    }

    const ALL_COMPARISONS: [Comparison; 6] = [
        Comparison::GreaterThan,
        Comparison::GreaterOrEqual,
        Comparison::LessThan,
        Comparison::LessOrEqual,
        Comparison::Equal,
        Comparison::AnyNonZero,
    ];

    #[test]
    fn missing_log_is_not_started() {
        for kind in [
            HabitKind::Binary,
            HabitKind::Count,
            HabitKind::Duration,
            HabitKind::Checklist,
        ] {
            let habit = Habit::new("h", kind, Frequency::Daily, start());
            assert_eq!(calculate_status(&habit, None), CalculatedStatus::not_started());
        }
    }

    #[test]
    fn binary_log_is_always_done() {
        let habit = Habit::new("stretch", HabitKind::Binary, Frequency::Daily, start())
            .with_target(10.0, Comparison::Equal);
        let bare = HabitLog::new("stretch", start());
        let odd = HabitLog::new("stretch", start())
            .with_value(-3.0)
            .with_completed_items(["x"]);
        assert_eq!(calculate_status(&habit, Some(&bare)), CalculatedStatus::done());
        assert_eq!(calculate_status(&habit, Some(&odd)), CalculatedStatus::done());
    }

    #[test]
    fn count_reaching_target_is_done() {
        let habit = measured(HabitKind::Count, 8.0, Comparison::GreaterOrEqual);
        let status = calculate_status(&habit, Some(&log(8.0)));
        assert_eq!(status.status, CompletionStatus::Done);
        assert_eq!(status.progress, 1.0);
        assert!(status.is_complete);
    }

    #[test]
    fn count_below_target_is_partial() {
        let habit = measured(HabitKind::Count, 8.0, Comparison::GreaterOrEqual);
        let status = calculate_status(&habit, Some(&log(3.0)));
        assert_eq!(status.status, CompletionStatus::Partial);
        assert!((status.progress - 0.375).abs() < f64::EPSILON);
        assert!(!status.is_complete);
    }

    #[test]
    fn stay_under_duration_over_limit_is_not_done() {
        let habit = measured(HabitKind::Duration, 30.0, Comparison::LessOrEqual);
        let status = calculate_status(&habit, Some(&log(45.0)));
        assert!(!status.is_complete);
        assert_ne!(status.status, CompletionStatus::Done);
        assert_eq!(status.progress, 1.0);
    }

    #[test]
    fn stay_under_within_limit_is_done() {
        let habit = measured(HabitKind::Duration, 30.0, Comparison::LessThan);
        let status = calculate_status(&habit, Some(&log(20.0)));
        assert_eq!(status, CalculatedStatus::done());
    }

    #[test]
    fn greater_than_needs_to_exceed_target() {
        let habit = measured(HabitKind::Count, 5.0, Comparison::GreaterThan);
        let at_target = calculate_status(&habit, Some(&log(5.0)));
        assert_eq!(at_target.status, CompletionStatus::Partial);
        assert_eq!(at_target.progress, 1.0);
        assert_eq!(calculate_status(&habit, Some(&log(6.0))), CalculatedStatus::done());
    }

    #[test]
    fn equal_requires_exact_value() {
        let habit = measured(HabitKind::Count, 4.0, Comparison::Equal);
        let over = calculate_status(&habit, Some(&log(6.0)));
        assert_eq!(over.status, CompletionStatus::Partial);
        assert_eq!(over.progress, 1.0);
        let half = calculate_status(&habit, Some(&log(2.0)));
        assert_eq!(half.progress, 0.5);
        assert_eq!(calculate_status(&habit, Some(&log(4.0))), CalculatedStatus::done());
        let zero = calculate_status(&habit, Some(&log(0.0)));
        assert_eq!(zero, CalculatedStatus::not_started());
    }

    #[test]
    fn any_non_zero_completes_on_first_unit() {
        let habit = measured(HabitKind::Count, 50.0, Comparison::AnyNonZero);
        assert_eq!(calculate_status(&habit, Some(&log(0.5))), CalculatedStatus::done());
        assert_eq!(
            calculate_status(&habit, Some(&log(0.0))),
            CalculatedStatus::not_started()
        );
    }

    #[test]
    fn missing_target_and_comparison_use_defaults() {
        let habit = Habit::new("read", HabitKind::Count, Frequency::Daily, start());
        let empty = HabitLog::new("read", start());
        assert_eq!(
            calculate_status(&habit, Some(&empty)),
            CalculatedStatus::not_started()
        );
        assert_eq!(
            calculate_status(&habit, Some(&log(1.0))),
            CalculatedStatus::done()
        );
    }

    #[test]
    fn progress_stays_in_bounds_for_odd_values() {
        for comparison in ALL_COMPARISONS {
            for target in [-2.0, 0.0, 0.5, 8.0] {
                for value in [-10.0, 0.0, 0.25, 8.0, 1e9] {
                    let habit = measured(HabitKind::Count, target, comparison);
                    let status = calculate_status(&habit, Some(&log(value)));
                    assert!(
                        (0.0..=1.0).contains(&status.progress),
                        "{comparison} target={target} value={value} -> {}",
                        status.progress
                    );
                    assert_eq!(
                        status.is_complete,
                        status.status == CompletionStatus::Done,
                        "{comparison} target={target} value={value}"
                    );
                }
            }
        }
    }

    #[test]
    fn checklist_half_done_is_partial() {
        let habit = Habit::new("morning", HabitKind::Checklist, Frequency::Daily, start())
            .with_checklist(["a", "b", "c", "d"]);
        let entry = HabitLog::new("morning", start()).with_completed_items(["a", "c"]);
        let status = calculate_status(&habit, Some(&entry));
        assert_eq!(status.status, CompletionStatus::Partial);
        assert_eq!(status.progress, 0.5);
        assert!(!status.is_complete);
    }

    #[test]
    fn checklist_all_done_is_done() {
        let habit = Habit::new("morning", HabitKind::Checklist, Frequency::Daily, start())
            .with_checklist(["a", "b"]);
        let entry = HabitLog::new("morning", start()).with_completed_items(["b", "a"]);
        assert_eq!(calculate_status(&habit, Some(&entry)), CalculatedStatus::done());
    }

    #[test]
    fn empty_checklist_cannot_complete() {
        let habit = Habit::new("morning", HabitKind::Checklist, Frequency::Daily, start());
        let entry = HabitLog::new("morning", start()).with_completed_items(["a"]);
        assert_eq!(
            calculate_status(&habit, Some(&entry)),
            CalculatedStatus::not_started()
        );
    }

    #[test]
    fn checklist_counts_completed_entries_as_logged() {
        let habit = Habit::new("morning", HabitKind::Checklist, Frequency::Daily, start())
            .with_checklist(["a", "b"]);
        let entry = HabitLog::new("morning", start()).with_completed_items(["a", "gone"]);
        assert_eq!(calculate_status(&habit, Some(&entry)), CalculatedStatus::done());

        let repeated = Habit::new("morning", HabitKind::Checklist, Frequency::Daily, start())
            .with_checklist(["a", "a"]);
        let one = HabitLog::new("morning", start()).with_completed_items(["a"]);
        let status = calculate_status(&repeated, Some(&one));
        assert_eq!(status.status, CompletionStatus::Partial);
        assert_eq!(status.progress, 0.5);
    }

    #[test]
    fn checklist_overfull_log_is_not_complete() {
        let habit = Habit::new("morning", HabitKind::Checklist, Frequency::Daily, start())
            .with_checklist(["a", "b"]);
        let entry = HabitLog::new("morning", start()).with_completed_items(["a", "b", "c"]);
        let status = calculate_status(&habit, Some(&entry));
        assert_eq!(status.status, CompletionStatus::Partial);
        assert_eq!(status.progress, 1.0);
        assert!(!status.is_complete);
    }
}
