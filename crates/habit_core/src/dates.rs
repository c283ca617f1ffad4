use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::error::UnknownVariant;

/// First day of a weekly quota window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }
}

impl FromStr for WeekStart {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" | "0" => Ok(WeekStart::Sunday),
            "monday" | "mon" | "1" => Ok(WeekStart::Monday),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// Inclusive span of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The day right before this window starts, if representable.
    pub fn day_before(&self) -> Option<NaiveDate> {
        self.start.pred_opt()
    }
}

/// The seven-day window containing `date`.
pub fn week_window(date: NaiveDate, week_start: WeekStart) -> DateWindow {
    let first = week_start.weekday().num_days_from_sunday();
    let offset = (date.weekday().num_days_from_sunday() + 7 - first) % 7;
    let start = date
        .checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(NaiveDate::MIN);
    let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
    DateWindow { start, end }
}

/// First through last day of the calendar month containing `date`.
pub fn month_window(date: NaiveDate) -> DateWindow {
    let start = date
        .checked_sub_days(Days::new(u64::from(date.day0())))
        .unwrap_or(NaiveDate::MIN);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    DateWindow { start, end }
}

/// Weekday for a stored weekday number, where 0 = Sunday.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    let weekday = match index {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        6 => Weekday::Sat,
        _ => return None,
    };
    Some(weekday)
}
