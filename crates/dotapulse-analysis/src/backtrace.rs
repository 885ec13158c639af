//! Sampling of the games played right before an inactive run
//!
//! For every inactive run the analysis looks back from the run's anchor
//! month and collects the player's most recent outcomes:
//!
//! ```text
//!        window start                      anchor
//!             v                              v
//!   months:  M1 ──── M2 ──── M3 ──── M4 ──── M5 (inactive run begins)
//!   walk  :                          <──── newest first, anchor included
//! ```
//!
//! Months are walked from the anchor (inclusive) down to the activity
//! window's start (inclusive), each month's outcomes newest to oldest, until
//! `count` outcomes are collected. Near the start of the window fewer
//! outcomes may be available; the rate is computed over whatever was
//! collected.

use serde::{Deserialize, Serialize};

use crate::{calendar::MonthKey, timeline::Timeline};

/// Outcomes collected by a backtrace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktraceSample {
    /// Number of collected outcomes that were `true`
    pub positives: usize,
    /// Number of collected outcomes
    pub collected: usize,
}

impl BacktraceSample {
    /// Collects up to `count` outcomes preceding (and including) `anchor`,
    /// never looking before `window_start`.
    #[must_use]
    pub fn collect(
        timeline: &Timeline,
        anchor: MonthKey,
        window_start: MonthKey,
        count: usize,
    ) -> Self {
        anchor
            .back_through(window_start)
            .flat_map(|month| timeline.outcomes(month).iter().rev().copied())
            .take(count)
            .fold(Self::default(), |sample, outcome| Self {
                positives: sample.positives + usize::from(outcome),
                collected: sample.collected + 1,
            })
    }

    /// Fraction of positive outcomes, or `None` if nothing was collected.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn rate(self) -> Option<f64> {
        (self.collected > 0).then(|| self.positives as f64 / self.collected as f64)
    }
}
