//! Calendar months and the configured analysis range
//!
//! All per-month aggregation is keyed by [`MonthKey`], a `(year, month)` pair
//! ordered chronologically. The [`CalendarRange`] fixes which months exist at
//! all: matches outside it are invisible to the timeline.

use std::{fmt, iter, str::FromStr};

use chrono::{DateTime, Datelike as _};
use serde::{Deserialize, Serialize};

use crate::{config::ConfigError, record::MalformedRecord};

const MONTHS_PER_YEAR: u32 = 12;

/// Longest calendar range accepted, in years.
pub const MAX_CALENDAR_YEARS: u32 = 200;

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl MonthKey {
    /// Creates a month key, returning `None` if `month` is not in `1..=12`.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=MONTHS_PER_YEAR)
            .contains(&month)
            .then_some(Self { year, month })
    }

    /// Month (UTC) of a match starting at `timestamp` seconds since the epoch.
    pub fn from_timestamp(timestamp: i64) -> Result<Self, MalformedRecord> {
        let time = DateTime::from_timestamp(timestamp, 0)
            .ok_or(MalformedRecord::InvalidTimestamp { timestamp })?;
        Ok(Self {
            year: time.year(),
            month: time.month(),
        })
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.month
    }

    /// The following calendar month.
    #[must_use]
    pub fn next(self) -> Self {
        if self.month == MONTHS_PER_YEAR {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding calendar month.
    #[must_use]
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: MONTHS_PER_YEAR,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Iterates months from `self` up to and including `last`.
    ///
    /// Yields nothing if `last` precedes `self`.
    pub fn through(self, last: Self) -> impl Iterator<Item = Self> {
        let first = (self <= last).then_some(self);
        iter::successors(first, move |m| (*m < last).then(|| m.next()))
    }

    /// Iterates months from `self` down to and including `first`.
    ///
    /// Yields nothing if `first` follows `self`.
    pub fn back_through(self, first: Self) -> impl Iterator<Item = Self> {
        let last = (self >= first).then_some(self);
        iter::successors(last, move |m| (*m > first).then(|| m.prev()))
    }
}

/// Parses `YYYY-MM`, the month format of pre-bucketed match dates.
impl FromStr for MonthKey {
    type Err = MalformedRecord;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MalformedRecord::InvalidMonth {
            input: s.to_owned(),
        };
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

/// The months covered by an analysis: every month of `[start_year, end_year)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRange {
    start_year: i32,
    end_year: i32,
}

impl Default for CalendarRange {
    fn default() -> Self {
        Self {
            start_year: 2010,
            end_year: 2019,
        }
    }
}

impl fmt::Display for CalendarRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_year, self.end_year)
    }
}

impl CalendarRange {
    pub fn new(start_year: i32, end_year: i32) -> Result<Self, ConfigError> {
        let range = Self {
            start_year,
            end_year,
        };
        range.validate()?;
        Ok(range)
    }

    pub(crate) fn validate(self) -> Result<(), ConfigError> {
        let (start_year, end_year) = (self.start_year, self.end_year);
        if start_year >= end_year {
            return Err(ConfigError::EmptyCalendarRange {
                start_year,
                end_year,
            });
        }
        if self.years() > u64::from(MAX_CALENDAR_YEARS) {
            return Err(ConfigError::CalendarRangeTooLong {
                start_year,
                end_year,
                max_years: MAX_CALENDAR_YEARS,
            });
        }
        Ok(())
    }

    /// Number of years in the range, zero if it is empty.
    fn years(self) -> u64 {
        let years = i64::from(self.end_year) - i64::from(self.start_year);
        u64::try_from(years).unwrap_or(0)
    }

    #[must_use]
    pub fn start_year(self) -> i32 {
        self.start_year
    }

    /// First year *not* covered by the range.
    #[must_use]
    pub fn end_year(self) -> i32 {
        self.end_year
    }

    /// Number of months in the range.
    #[must_use]
    pub fn len(self) -> usize {
        usize::try_from(self.years())
            .ok()
            .and_then(|years| years.checked_mul(12))
            .unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Offset of `month` from the first month of the range.
    #[must_use]
    pub fn index_of(self, month: MonthKey) -> Option<usize> {
        if !(self.start_year..self.end_year).contains(&month.year) {
            return None;
        }
        let years = i64::from(month.year) - i64::from(self.start_year);
        let years = usize::try_from(years).ok()?;
        let months = usize::try_from(month.month - 1).ok()?;
        years.checked_mul(12)?.checked_add(months)
    }

    /// Month at `index` months after the first month of the range.
    #[must_use]
    pub fn month_at(self, index: usize) -> Option<MonthKey> {
        if index >= self.len() {
            return None;
        }
        let years = i32::try_from(index / 12).ok()?;
        let month = u32::try_from(index % 12).ok()? + 1;
        Some(MonthKey {
            year: self.start_year.checked_add(years)?,
            month,
        })
    }
}
