use thiserror::Error;

/// Reasons a remote habit or log record cannot become a typed value.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("habit `{habit_id}` has no start date")]
    MissingStartDate { habit_id: String },

    #[error("log for habit `{habit_id}` has no date")]
    MissingLogDate { habit_id: String },

    #[error("record `{record_id}` has an invalid {field}: `{value}`")]
    InvalidDate {
        record_id: String,
        field: &'static str,
        value: String,
    },

    #[error("habit `{habit_id}` has unknown type `{value}`")]
    UnknownHabitKind { habit_id: String, value: String },

    #[error("habit `{habit_id}` has unknown target comparison `{value}`")]
    UnknownComparison { habit_id: String, value: String },

    #[error("habit `{habit_id}` lists weekday {value}, expected 0 (Sunday) through 6")]
    InvalidWeekday { habit_id: String, value: i64 },

    #[error("{record} record #{index} is malformed: {source}")]
    Record {
        record: &'static str,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Returned by the `FromStr` impls of the wire enums.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised value `{0}`")]
pub struct UnknownVariant(pub String);
