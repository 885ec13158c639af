//! Whole-history behavior profile of players
//!
//! A [`PlayerProfile`] summarizes a player's entire match history with three
//! rates:
//!
//! - **win rate**: fraction of matches with `radiant_win` set
//! - **leaver rate**: fraction of matches with a nonzero `leaver_status`
//! - **hero diversity**: distinct heroes played divided by matches played
//!
//! Each rate is computed over the records that carry the corresponding
//! field, so a missing field in one record does not distort the others.
//!
//! A [`PopulationSummary`] then describes the distribution of each rate
//! across all profiled players and the pairwise correlation between them.

use std::{collections::BTreeSet, ops::Range};

use dotapulse_stats::{correlation, descriptive::DescriptiveStats, histogram::Histogram};
use serde::{Deserialize, Serialize};

use crate::record::MatchRecord;

const RATE_RANGE: Range<f64> = 0.0..1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player_id: String,
    pub num_matches: usize,
    pub win_rate: Option<f64>,
    pub leaver_rate: Option<f64>,
    pub hero_diversity: Option<f64>,
}

#[expect(clippy::cast_precision_loss)]
fn fraction(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

impl PlayerProfile {
    #[must_use]
    pub fn from_records(player_id: impl Into<String>, records: &[MatchRecord]) -> Self {
        let wins = records.iter().filter_map(|r| r.radiant_win).collect::<Vec<_>>();
        let leaves = records.iter().filter_map(MatchRecord::has_left).collect::<Vec<_>>();
        let heroes = records.iter().filter_map(|r| r.hero_id).collect::<Vec<_>>();
        let distinct_heroes = heroes.iter().collect::<BTreeSet<_>>().len();

        Self {
            player_id: player_id.into(),
            num_matches: records.len(),
            win_rate: fraction(wins.iter().filter(|w| **w).count(), wins.len()),
            leaver_rate: fraction(leaves.iter().filter(|l| **l).count(), leaves.len()),
            hero_diversity: fraction(distinct_heroes, heroes.len()),
        }
    }

    #[must_use]
    pub fn metric(&self, metric: ProfileMetric) -> Option<f64> {
        match metric {
            ProfileMetric::WinRate => self.win_rate,
            ProfileMetric::LeaverRate => self.leaver_rate,
            ProfileMetric::HeroDiversity => self.hero_diversity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProfileMetric {
    WinRate,
    LeaverRate,
    HeroDiversity,
}

impl ProfileMetric {
    pub const ALL: [Self; 3] = [Self::WinRate, Self::LeaverRate, Self::HeroDiversity];

    /// Metric pairs whose relationship is reported.
    pub const PAIRS: [(Self, Self); 3] = [
        (Self::HeroDiversity, Self::WinRate),
        (Self::HeroDiversity, Self::LeaverRate),
        (Self::WinRate, Self::LeaverRate),
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ProfileMetric::WinRate => "Win rate",
            ProfileMetric::LeaverRate => "Leaver rate",
            ProfileMetric::HeroDiversity => "Hero diversity",
        }
    }
}

/// Distribution of one metric across players.
#[derive(Debug, Clone)]
pub struct MetricSummary {
    pub metric: ProfileMetric,
    /// `None` when no player has a value for the metric
    pub stats: Option<DescriptiveStats>,
    pub histogram: Histogram,
}

#[derive(Debug, Clone)]
pub struct MetricCorrelation {
    pub x: ProfileMetric,
    pub y: ProfileMetric,
    /// Number of players with both metrics
    pub pairs: usize,
    pub pearson: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct PopulationSummary {
    pub players: usize,
    pub metrics: Vec<MetricSummary>,
    pub correlations: Vec<MetricCorrelation>,
}

impl PopulationSummary {
    #[must_use]
    pub fn from_profiles(profiles: &[PlayerProfile], num_bins: usize) -> Self {
        let metrics = ProfileMetric::ALL
            .into_iter()
            .map(|metric| {
                let values = profiles.iter().filter_map(|p| p.metric(metric));
                MetricSummary {
                    metric,
                    stats: DescriptiveStats::new(values.clone()),
                    histogram: Histogram::new(values, num_bins, RATE_RANGE),
                }
            })
            .collect();

        let correlations = ProfileMetric::PAIRS
            .into_iter()
            .map(|(x, y)| {
                let pairs = profiles
                    .iter()
                    .filter_map(|p| Some((p.metric(x)?, p.metric(y)?)))
                    .collect::<Vec<_>>();
                MetricCorrelation {
                    x,
                    y,
                    pairs: pairs.len(),
                    pearson: correlation::pearson(pairs),
                }
            })
            .collect();

        Self {
            players: profiles.len(),
            metrics,
            correlations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(radiant_win: Option<bool>, leaver_status: Option<i64>, hero_id: Option<u32>) -> MatchRecord {
        MatchRecord {
            start_time: 1_500_000_000,
            radiant_win,
            leaver_status,
            hero_id,
        }
    }

    #[test]
    fn test_profile_rates() {
        let records = [
            record(Some(true), Some(0), Some(1)),
            record(Some(false), Some(2), Some(1)),
            record(Some(true), Some(0), Some(7)),
            record(Some(true), Some(0), Some(7)),
        ];
        let profile = PlayerProfile::from_records("42", &records);
        assert_eq!(profile.player_id, "42");
        assert_eq!(profile.num_matches, 4);
        assert_eq!(profile.win_rate, Some(0.75));
        assert_eq!(profile.leaver_rate, Some(0.25));
        assert_eq!(profile.hero_diversity, Some(0.5));
    }

    #[test]
    fn test_profile_uses_per_field_denominators() {
        let records = [
            record(Some(true), None, None),
            record(None, Some(1), None),
        ];
        let profile = PlayerProfile::from_records("7", &records);
        assert_eq!(profile.win_rate, Some(1.0));
        assert_eq!(profile.leaver_rate, Some(1.0));
        assert_eq!(profile.hero_diversity, None);
    }

    #[test]
    fn test_empty_profile_is_unavailable() {
        let profile = PlayerProfile::from_records("0", &[]);
        assert_eq!(profile.num_matches, 0);
        assert_eq!(profile.win_rate, None);
        assert_eq!(profile.leaver_rate, None);
        assert_eq!(profile.hero_diversity, None);
    }

    #[test]
    fn test_population_summary() {
        let profiles = [
            PlayerProfile {
                player_id: "a".into(),
                num_matches: 60,
                win_rate: Some(0.4),
                leaver_rate: Some(0.1),
                hero_diversity: Some(0.2),
            },
            PlayerProfile {
                player_id: "b".into(),
                num_matches: 80,
                win_rate: Some(0.6),
                leaver_rate: Some(0.0),
                hero_diversity: Some(0.4),
            },
            PlayerProfile {
                player_id: "c".into(),
                num_matches: 55,
                win_rate: Some(0.5),
                leaver_rate: None,
                hero_diversity: Some(0.3),
            },
        ];
        let summary = PopulationSummary::from_profiles(&profiles, 10);
        assert_eq!(summary.players, 3);

        let win = &summary.metrics[0];
        assert_eq!(win.metric, ProfileMetric::WinRate);
        let stats = win.stats.as_ref().unwrap();
        assert_eq!(stats.count, 3);
        assert!((stats.mean - 0.5).abs() < 1e-12);
        assert_eq!(win.histogram.total_count(), 3);

        let leaver = &summary.metrics[1];
        assert_eq!(leaver.stats.as_ref().unwrap().count, 2);

        let diversity_vs_win = &summary.correlations[0];
        assert_eq!(diversity_vs_win.x, ProfileMetric::HeroDiversity);
        assert_eq!(diversity_vs_win.pairs, 3);
        assert!((diversity_vs_win.pearson.unwrap() - 1.0).abs() < 1e-9);

        let win_vs_leaver = &summary.correlations[2];
        assert_eq!(win_vs_leaver.pairs, 2);
    }

    #[test]
    fn test_population_summary_of_nobody() {
        let summary = PopulationSummary::from_profiles(&[], 10);
        assert_eq!(summary.players, 0);
        assert!(summary.metrics.iter().all(|m| m.stats.is_none()));
        assert!(summary.correlations.iter().all(|c| c.pearson.is_none()));
    }
}
