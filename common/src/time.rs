//! Calendar helpers for fiscal periods.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar month, used to bucket balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Month containing the date.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Months elapsed since `start`; negative when `self` is earlier.
    pub fn months_since(&self, start: MonthKey) -> i64 {
        i64::from(self.year - start.year) * 12 + i64::from(self.month) - i64::from(start.month)
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Inclusive date range of a fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// Create a new period.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Calendar year period.
    pub fn year(year: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }

    /// Check if the date fits into the period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Check if the period is non-empty.
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    /// Number of calendar months touched by the period.
    pub fn month_count(&self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        let count = MonthKey::of(self.end).months_since(MonthKey::of(self.start)) + 1;
        usize::try_from(count).unwrap_or(0)
    }

    /// Position of the date's month within the period, if the period touches it.
    pub fn month_index(&self, date: NaiveDate) -> Option<usize> {
        let index = MonthKey::of(date).months_since(MonthKey::of(self.start));
        usize::try_from(index)
            .ok()
            .filter(|index| *index < self.month_count())
    }

    /// Months touched by the period, in chronological order.
    pub fn months(&self) -> Vec<MonthKey> {
        let first = MonthKey::of(self.start).first_day();
        (0..self.month_count())
            .filter_map(|i| first.checked_add_months(Months::new(i as u32)))
            .map(MonthKey::of)
            .collect()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// The day before the date.
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.pred_opt().unwrap_or(date)
}

/// Last day of the date's month.
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    MonthKey::of(date)
        .first_day()
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// The later of two dates.
pub fn max_date(a: NaiveDate, b: NaiveDate) -> NaiveDate {
    a.max(b)
}

/// The earlier of two dates.
pub fn min_date(a: NaiveDate, b: NaiveDate) -> NaiveDate {
    a.min(b)
}
