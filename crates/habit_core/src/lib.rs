//! Habit occurrence and progress engine.
//!
//! [`calculate_status`] turns a habit and one of its logs into a completion
//! state; [`OccurrenceScheduler::should_show_on`] decides whether a habit is due
//! on a calendar day. Both are pure and only read their inputs. Remote
//! documents enter through [`ingest`].

pub mod agenda;
pub mod dates;
pub mod error;
pub mod habit;
pub mod index;
pub mod ingest;
pub mod schedule;
pub mod status;
pub mod streak;

pub use crate::agenda::{build_day_agenda, AgendaEntry};
pub use crate::dates::{DateWindow, WeekStart};
pub use crate::error::IngestError;
pub use crate::habit::{
    CalculatedStatus, Comparison, CompletionStatus, Frequency, Habit, HabitId, HabitKind, HabitLog,
};
pub use crate::index::HabitLogIndex;
pub use crate::ingest::Snapshot;
pub use crate::schedule::{should_show_on, OccurrenceScheduler};
pub use crate::status::calculate_status;
pub use crate::streak::current_streak;
