//! Detection of inactive periods in a player's timeline
//!
//! A month is *inactive* when the player recorded fewer games than the
//! activity threshold. A single inactive month is treated as noise; two or
//! more consecutive inactive months form an [`InactiveRun`].
//!
//! # State Machine
//!
//! Months of the activity window are visited in calendar order:
//!
//! ```text
//! state   | inactive month               | active month
//! --------+------------------------------+---------------------
//! Normal  | -> Pending (anchor = month)  | stay Normal
//! Pending | -> Running (score = 2)       | -> Normal (noise)
//! Running | score += 1                   | emit run, -> Normal
//! ```
//!
//! A run that is still open at the last month of the window is emitted as
//! well (force close).
//!
//! # Run Score
//!
//! The [`RunScore`] of a run starts at 2 when the second inactive month
//! confirms the run, crediting the pending month and the confirming month
//! together, and grows by one for every further inactive month. It therefore
//! equals the number of inactive months in the run, but only ever for runs
//! of two or more months that lie inside the activity window. Results are
//! keyed by score rather than by a raw month count so that this accounting
//! stays explicit.
//!
//! # Example
//!
//! ```
//! use dotapulse_analysis::{
//!     calendar::{CalendarRange, MonthKey},
//!     inactivity::InactiveRuns,
//!     timeline::Timeline,
//! };
//!
//! let mut timeline = Timeline::new(CalendarRange::new(2015, 2016).unwrap());
//! for (month, games) in [(1, 6), (2, 1), (3, 0), (4, 6)] {
//!     for _ in 0..games {
//!         timeline.record(MonthKey::new(2015, month).unwrap(), true);
//!     }
//! }
//! let window = timeline.activity_window().unwrap();
//! let runs = InactiveRuns::new(&timeline, window, 5).collect::<Vec<_>>();
//!
//! assert_eq!(runs.len(), 1);
//! assert_eq!(runs[0].anchor, MonthKey::new(2015, 2).unwrap());
//! assert_eq!(runs[0].score.get(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    calendar::MonthKey,
    timeline::{ActivityWindow, Timeline},
};

/// Detected-run score of an inactive run (see the [module docs](self)).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct RunScore(u32);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("run score must be at least 2, got {score}")]
pub struct InvalidRunScore {
    score: u32,
}

impl RunScore {
    /// Score of a run right after its second inactive month.
    pub const CONFIRMED: Self = Self(2);

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    fn extend(self) -> Self {
        Self(self.0 + 1)
    }
}

impl TryFrom<u32> for RunScore {
    type Error = InvalidRunScore;

    fn try_from(score: u32) -> Result<Self, Self::Error> {
        if score < Self::CONFIRMED.0 {
            return Err(InvalidRunScore { score });
        }
        Ok(Self(score))
    }
}

impl From<RunScore> for u32 {
    fn from(score: RunScore) -> Self {
        score.0
    }
}

/// A closed run of two or more inactive months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InactiveRun {
    /// First inactive month of the run
    pub anchor: MonthKey,
    pub score: RunScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Pending { anchor: MonthKey },
    Running { anchor: MonthKey, score: RunScore },
}

impl State {
    /// Advances the state by one month, returning the run closed by it, if any.
    fn step(self, month: MonthKey, inactive: bool, is_last: bool) -> (Self, Option<InactiveRun>) {
        let close_at_end = |anchor, score| {
            if is_last {
                (State::Normal, Some(InactiveRun { anchor, score }))
            } else {
                (State::Running { anchor, score }, None)
            }
        };

        match (self, inactive) {
            (State::Normal, false) => (State::Normal, None),
            (State::Normal, true) => (State::Pending { anchor: month }, None),
            // isolated inactive month, discarded
            (State::Pending { .. }, false) => (State::Normal, None),
            (State::Pending { anchor }, true) => close_at_end(anchor, RunScore::CONFIRMED),
            (State::Running { anchor, score }, false) => {
                (State::Normal, Some(InactiveRun { anchor, score }))
            }
            (State::Running { anchor, score }, true) => close_at_end(anchor, score.extend()),
        }
    }
}

/// Iterator over the inactive runs of a timeline, in chronological order.
#[derive(Debug, Clone)]
pub struct InactiveRuns<'a> {
    timeline: &'a Timeline,
    window: ActivityWindow,
    threshold: u32,
    cursor: Option<MonthKey>,
    state: State,
}

impl<'a> InactiveRuns<'a> {
    /// Scans the months of `window`; a month with fewer than `threshold`
    /// games is inactive.
    #[must_use]
    pub fn new(timeline: &'a Timeline, window: ActivityWindow, threshold: u32) -> Self {
        Self {
            timeline,
            window,
            threshold,
            cursor: (window.start <= window.end).then_some(window.start),
            state: State::Normal,
        }
    }
}

impl Iterator for InactiveRuns<'_> {
    type Item = InactiveRun;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(month) = self.cursor {
            let is_last = month == self.window.end;
            self.cursor = (!is_last).then(|| month.next());

            let inactive = self.timeline.count(month) < self.threshold;
            let (state, closed) = self.state.step(month, inactive, is_last);
            self.state = state;
            if closed.is_some() {
                return closed;
            }
        }
        None
    }
}
