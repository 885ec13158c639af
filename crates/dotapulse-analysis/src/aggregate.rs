//! Population-wide aggregation of backtrace rates by run score
//!
//! Each analysed player contributes a [`PlayerRunRates`]: for every run
//! score, the (optionally normalized) backtrace rates of that player's
//! inactive runs. These partial maps are merged into a single [`RunRates`]
//! accumulator, which is finally reduced to one mean per run score.
//!
//! # Normalization
//!
//! - [`Normalization::Raw`]: the backtrace rate as is.
//! - [`Normalization::Relative`]: the backtrace rate divided by the player's
//!   overall rate for the same outcome, so that a value above 1 means the
//!   player won (or left) more often than usual right before going inactive.
//!   Players whose overall rate is zero or unavailable yield no value.
//!
//! # Sample Unit
//!
//! - [`SampleUnit::Run`]: every inactive run is one sample.
//! - [`SampleUnit::Player`]: each player's values are first averaged per run
//!   score, so every player weighs the same regardless of how many runs they
//!   had.
//!
//! Merging only appends samples, so the finalized means do not depend on
//! the order or grouping in which players were merged.

use std::collections::BTreeMap;

use dotapulse_stats::descriptive;
use serde::{Deserialize, Serialize};

use crate::inactivity::RunScore;

/// How a run's backtrace rate is scaled before aggregation.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    Raw,
    /// Divide by the player's overall rate
    #[default]
    Relative,
}

impl Normalization {
    /// Applies the normalization to a backtrace `rate`.
    ///
    /// Returns `None` if the value is unavailable.
    #[must_use]
    pub fn apply(self, rate: Option<f64>, overall_rate: Option<f64>) -> Option<f64> {
        let rate = rate?;
        match self {
            Normalization::Raw => Some(rate),
            Normalization::Relative => {
                let overall_rate = overall_rate.filter(|r| *r > 0.0)?;
                Some(rate / overall_rate)
            }
        }
    }
}

/// What a single aggregated sample stands for.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum SampleUnit {
    /// One sample per inactive run
    Run,
    /// One sample per player and run score (the player's mean)
    #[default]
    Player,
}

/// Values of one player's inactive runs, grouped by run score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerRunRates {
    pub map: BTreeMap<RunScore, Vec<f64>>,
}

impl PlayerRunRates {
    pub fn push(&mut self, score: RunScore, value: f64) {
        self.map.entry(score).or_default().push(value);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Samples of all players grouped by run score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunRates {
    samples: BTreeMap<RunScore, Vec<f64>>,
}

/// Finalized result for one run score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunScoreMean {
    pub score: RunScore,
    pub mean: f64,
    pub samples: usize,
}

impl RunRates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one player's values according to `unit`.
    pub fn add_player(&mut self, player: PlayerRunRates, unit: SampleUnit) {
        for (score, values) in player.map {
            let samples = self.samples.entry(score).or_default();
            match unit {
                SampleUnit::Run => samples.extend(values),
                SampleUnit::Player => samples.extend(descriptive::mean(values)),
            }
        }
    }

    /// Appends every sample of `other`.
    pub fn merge(&mut self, other: RunRates) {
        for (score, values) in other.samples {
            self.samples.entry(score).or_default().extend(values);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Total number of samples across all run scores.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.samples.values().map(Vec::len).sum()
    }

    /// Samples of one run score, in merge order.
    #[must_use]
    pub fn samples(&self, score: RunScore) -> &[f64] {
        self.samples
            .get(&score)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every `(score, value)` pair, suitable for a scatter plot.
    pub fn points(&self) -> impl Iterator<Item = (RunScore, f64)> + '_ {
        self.samples
            .iter()
            .flat_map(|(score, values)| values.iter().map(|value| (*score, *value)))
    }

    /// Mean value per run score, in ascending score order.
    #[must_use]
    pub fn means(&self) -> Vec<RunScoreMean> {
        self.samples
            .iter()
            .filter_map(|(score, values)| {
                Some(RunScoreMean {
                    score: *score,
                    mean: descriptive::mean(values.iter().copied())?,
                    samples: values.len(),
                })
            })
            .collect()
    }
}
