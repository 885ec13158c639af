//! Per-month activity timeline of a single player
//!
//! The [`Timeline`] is the input of every temporal analysis. It holds two
//! views of the player's in-range matches:
//!
//! - a dense game count for every month of the [`CalendarRange`]
//!   (zero for months without matches)
//! - the ordered outcome flags of each month that has matches,
//!   oldest-to-newest
//!
//! ```text
//! month   : 2014-01 2014-02 2014-03 2014-04 ...
//! count   :       0       6       1       0 ...
//! outcomes:       -  [TFTTFT]    [F]      - ...
//! ```
//!
//! Both views are updated together, so for every in-range month the count
//! equals the length of its outcome list.
//!
//! The [`ActivityWindow`] is the span from the first to the last month with
//! at least one match. Leading and trailing months without games are not
//! inactivity, they are simply before the player started or after they quit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    calendar::{CalendarRange, MonthKey},
    record::{MalformedRecord, MatchRecord, OutcomeKind},
};

/// Game counts and outcome flags of one player, bucketed by month.
#[derive(Debug, Clone)]
pub struct Timeline {
    calendar: CalendarRange,
    counts: Vec<u32>,
    outcomes: BTreeMap<MonthKey, Vec<bool>>,
    out_of_range: usize,
}

/// First and last month in which the player recorded at least one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityWindow {
    pub start: MonthKey,
    pub end: MonthKey,
}

impl Timeline {
    /// Creates an empty timeline covering every month of `calendar`.
    #[must_use]
    pub fn new(calendar: CalendarRange) -> Self {
        Self {
            calendar,
            counts: vec![0; calendar.len()],
            outcomes: BTreeMap::new(),
            out_of_range: 0,
        }
    }

    /// Builds a timeline from pre-bucketed `(YYYY-MM, outcome)` entries.
    ///
    /// Entries must be in chronological order. The first malformed date
    /// aborts the build.
    pub fn from_dated<'a, I>(calendar: CalendarRange, entries: I) -> Result<Self, MalformedRecord>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut timeline = Self::new(calendar);
        for (date, outcome) in entries {
            timeline.record(date.parse()?, outcome);
        }
        Ok(timeline)
    }

    /// Builds a timeline from match records in chronological order.
    ///
    /// Records unusable for `kind` are skipped. Returns the timeline together
    /// with the number of skipped records.
    pub fn from_records(
        calendar: CalendarRange,
        records: &[MatchRecord],
        kind: OutcomeKind,
    ) -> (Self, usize) {
        let mut timeline = Self::new(calendar);
        let mut malformed = 0;
        for record in records {
            match record.dated_outcome(kind) {
                Ok((month, outcome)) => {
                    timeline.record(month, outcome);
                }
                Err(e) => {
                    log::debug!("skipping match starting at {}: {e}", record.start_time);
                    malformed += 1;
                }
            }
        }
        (timeline, malformed)
    }

    /// Adds one match to the timeline.
    ///
    /// Returns `false` (and records nothing) if `month` lies outside the
    /// calendar range.
    pub fn record(&mut self, month: MonthKey, outcome: bool) -> bool {
        let Some(count) = self
            .calendar
            .index_of(month)
            .and_then(|index| self.counts.get_mut(index))
        else {
            self.out_of_range += 1;
            return false;
        };
        *count += 1;
        self.outcomes.entry(month).or_default().push(outcome);
        true
    }

    /// Number of games played in `month` (zero outside the calendar range).
    #[must_use]
    pub fn count(&self, month: MonthKey) -> u32 {
        self.calendar
            .index_of(month)
            .and_then(|index| self.counts.get(index).copied())
            .unwrap_or(0)
    }

    /// Outcomes of `month`, oldest first.
    #[must_use]
    pub fn outcomes(&self, month: MonthKey) -> &[bool] {
        self.outcomes
            .get(&month)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of in-range games.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.counts.iter().copied().map(u64::from).sum()
    }

    /// Number of matches that were dropped for falling outside the calendar range.
    #[must_use]
    pub fn out_of_range_count(&self) -> usize {
        self.out_of_range
    }

    /// Finds the span from the first to the last month with a game.
    ///
    /// Returns `None` if the player has no in-range matches; such a player
    /// has nothing to segment.
    #[must_use]
    pub fn activity_window(&self) -> Option<ActivityWindow> {
        let first = self.counts.iter().position(|&count| count > 0)?;
        let last = self.counts.iter().rposition(|&count| count > 0)?;
        Some(ActivityWindow {
            start: self.calendar.month_at(first)?,
            end: self.calendar.month_at(last)?,
        })
    }
}
