//! Inactivity analysis of a single player
//!
//! [`analyze`] runs the full per-player pipeline:
//!
//! 1. reject players with fewer than `min_matches` records
//! 2. build the [`Timeline`] for the configured outcome
//! 3. find the [`ActivityWindow`]
//! 4. segment the window into [`InactiveRun`]s
//! 5. sample the games before every run and normalize the rate
//!
//! The result keeps every observation, so callers can both aggregate the
//! values ([`PlayerAnalysis::run_rates`]) and export the raw runs.

use serde::Serialize;

use crate::{
    aggregate::PlayerRunRates,
    backtrace::BacktraceSample,
    config::{AnalysisConfig, ConfigError},
    inactivity::{InactiveRun, InactiveRuns},
    record::{self, MatchRecord},
    timeline::{ActivityWindow, Timeline},
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AnalyzePlayerError {
    #[display("invalid configuration: {_0}")]
    InvalidConfig(ConfigError),
    #[display("only {matches} matches, at least {min_matches} required")]
    TooFewMatches { matches: usize, min_matches: usize },
    #[display("no usable match inside the calendar range")]
    NoActivity,
}

/// One inactive run together with the games sampled before it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunObservation {
    #[serde(flatten)]
    pub run: InactiveRun,
    pub backtrace: BacktraceSample,
    /// Normalized backtrace rate, `None` if unavailable
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerAnalysis {
    pub player_id: String,
    pub num_matches: usize,
    /// Records that could not be used for the configured outcome
    pub malformed_records: usize,
    /// Usable records inside the calendar range
    pub in_range_matches: u64,
    /// Usable records outside the calendar range
    pub out_of_range_matches: usize,
    pub overall_rate: Option<f64>,
    pub window: ActivityWindow,
    pub runs: Vec<RunObservation>,
}

impl PlayerAnalysis {
    /// Available values grouped by run score.
    #[must_use]
    pub fn run_rates(&self) -> PlayerRunRates {
        let mut rates = PlayerRunRates::default();
        for observation in &self.runs {
            if let Some(value) = observation.value {
                rates.push(observation.run.score, value);
            }
        }
        rates
    }
}

/// Analyzes the chronologically ordered `records` of one player.
///
/// The calendar range is checked before any timeline is allocated.
pub fn analyze(
    player_id: impl Into<String>,
    records: &[MatchRecord],
    config: &AnalysisConfig,
) -> Result<PlayerAnalysis, AnalyzePlayerError> {
    config
        .calendar
        .validate()
        .map_err(AnalyzePlayerError::InvalidConfig)?;
    if records.len() < config.min_matches {
        return Err(AnalyzePlayerError::TooFewMatches {
            matches: records.len(),
            min_matches: config.min_matches,
        });
    }

    let (timeline, malformed_records) =
        Timeline::from_records(config.calendar, records, config.outcome);
    let window = timeline
        .activity_window()
        .ok_or(AnalyzePlayerError::NoActivity)?;
    let overall_rate = record::overall_rate(records, config.outcome);

    let runs = InactiveRuns::new(&timeline, window, config.activity_threshold)
        .map(|run| {
            let backtrace =
                BacktraceSample::collect(&timeline, run.anchor, window.start, config.backtrace_count);
            RunObservation {
                run,
                backtrace,
                value: config.normalization.apply(backtrace.rate(), overall_rate),
            }
        })
        .collect();

    Ok(PlayerAnalysis {
        player_id: player_id.into(),
        num_matches: records.len(),
        malformed_records,
        in_range_matches: timeline.total_count(),
        out_of_range_matches: timeline.out_of_range_count(),
        overall_rate,
        window,
        runs,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;
    use crate::{
        aggregate::Normalization, calendar::MonthKey, inactivity::RunScore, record::OutcomeKind,
    };

    fn timestamp(year: i32, month: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, 15, 12, 0, 0)
            .unwrap()
            .timestamp()
    }

    /// Records for 2016 with `games[i]` matches in month `i + 1`; `left(n)`
    /// decides whether the n-th match overall was abandoned.
    fn records(games: &[u32], left: impl Fn(usize) -> bool) -> Vec<MatchRecord> {
        let mut records = vec![];
        for (month, &count) in (1..).zip(games) {
            for _ in 0..count {
                let abandoned = left(records.len());
                records.push(MatchRecord {
                    start_time: timestamp(2016, month),
                    radiant_win: Some(!abandoned),
                    leaver_status: Some(i64::from(abandoned)),
                    hero_id: Some(1),
                });
            }
        }
        records
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            min_matches: 1,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_too_few_matches() {
        let records = records(&[3], |_| false);
        let config = AnalysisConfig::default();
        assert_eq!(
            analyze("1", &records, &config),
            Err(AnalyzePlayerError::TooFewMatches {
                matches: 3,
                min_matches: 50
            })
        );
    }

    #[test]
    fn test_no_activity_in_range() {
        let records = vec![MatchRecord {
            start_time: timestamp(2020, 1),
            radiant_win: Some(true),
            leaver_status: Some(0),
            hero_id: None,
        }];
        assert_eq!(
            analyze("1", &records, &config()),
            Err(AnalyzePlayerError::NoActivity)
        );
    }

    #[test]
    fn test_end_to_end_single_run() {
        // months 1..=7: [0, 0, 6, 6, 1, 1, 6]
        let records = records(&[0, 0, 6, 6, 1, 1, 6], |i| i == 11);
        let config = AnalysisConfig {
            normalization: Normalization::Raw,
            ..config()
        };
        let analysis = analyze("77", &records, &config).unwrap();

        assert_eq!(analysis.player_id, "77");
        assert_eq!(analysis.num_matches, 20);
        assert_eq!(analysis.in_range_matches, 20);
        assert_eq!(analysis.out_of_range_matches, 0);
        assert_eq!(analysis.window.start, MonthKey::new(2016, 3).unwrap());
        assert_eq!(analysis.window.end, MonthKey::new(2016, 7).unwrap());
        assert_eq!(analysis.runs.len(), 1);

        let observation = &analysis.runs[0];
        assert_eq!(observation.run.anchor, MonthKey::new(2016, 5).unwrap());
        assert_eq!(observation.run.score, RunScore::try_from(2).unwrap());
        // the single month 5 game, then the four newest of month 4
        assert_eq!(
            observation.backtrace,
            BacktraceSample {
                positives: 1,
                collected: 5
            }
        );
        assert_eq!(observation.value, Some(0.2));
    }

    #[test]
    fn test_relative_value_uses_overall_rate() {
        // 20 games, leaves at index 11 and 19: overall rate 0.1
        let records = records(&[0, 0, 6, 6, 1, 1, 6], |i| i == 11 || i == 19);
        let analysis = analyze("77", &records, &config()).unwrap();
        assert_eq!(analysis.overall_rate, Some(0.1));
        let value = analysis.runs[0].value.unwrap();
        assert!((value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_overall_rate_yields_no_value() {
        let records = records(&[6, 1, 1, 6], |_| false);
        let analysis = analyze("3", &records, &config()).unwrap();
        assert_eq!(analysis.overall_rate, Some(0.0));
        assert_eq!(analysis.runs.len(), 1);
        assert_eq!(analysis.runs[0].value, None);
        assert!(analysis.run_rates().is_empty());
    }

    #[test]
    fn test_win_outcome() {
        let records = records(&[2, 2, 1, 0, 2], |i| i % 2 == 0);
        let config = AnalysisConfig {
            outcome: OutcomeKind::Win,
            activity_threshold: 2,
            normalization: Normalization::Raw,
            ..config()
        };
        let analysis = analyze("5", &records, &config).unwrap();
        let runs = analysis
            .runs
            .iter()
            .map(|o| (o.run.anchor.month(), o.run.score.get()))
            .collect::<Vec<_>>();
        assert_eq!(runs, [(3, 2)]);
        // newest first: game 4 (leave), 3, 2 (leave), 1, 0 (leave): 2 wins of 5
        assert_eq!(analysis.runs[0].value, Some(0.4));
    }

    #[test]
    fn test_run_rates_group_by_score() {
        let records = records(&[6, 1, 1, 6, 0, 0, 0, 6], |i| i % 3 == 0);
        let config = AnalysisConfig {
            normalization: Normalization::Raw,
            ..config()
        };
        let analysis = analyze("9", &records, &config).unwrap();
        let rates = analysis.run_rates();
        let scores = rates.map.keys().map(|s| s.get()).collect::<Vec<_>>();
        assert_eq!(scores, [2, 3]);
        assert_eq!(rates.map[&RunScore::try_from(2).unwrap()].len(), 1);
    }

    #[test]
    fn test_malformed_records_are_counted() {
        let mut records = records(&[6, 6], |_| false);
        records[3].leaver_status = None;
        let analysis = analyze("9", &records, &config()).unwrap();
        assert_eq!(analysis.malformed_records, 1);
        assert_eq!(analysis.num_matches, 12);
        assert_eq!(analysis.in_range_matches, 11);
    }

    #[test]
    fn test_out_of_range_matches_are_counted() {
        let mut records = records(&[6, 1, 1, 6], |_| false);
        records.push(MatchRecord {
            start_time: timestamp(2020, 1),
            radiant_win: Some(true),
            leaver_status: Some(0),
            hero_id: None,
        });
        let analysis = analyze("4", &records, &config()).unwrap();
        assert_eq!(analysis.num_matches, 15);
        assert_eq!(analysis.in_range_matches, 14);
        assert_eq!(analysis.out_of_range_matches, 1);
    }

    #[test]
    fn test_overlong_calendar_is_rejected_before_analysis() {
        let records = records(&[6, 1, 1, 6], |_| false);
        let config = AnalysisConfig {
            calendar: serde_json::from_str(
                r#"{"start_year": -2000000000, "end_year": 2000000000}"#,
            )
            .unwrap(),
            ..config()
        };
        assert!(matches!(
            analyze("4", &records, &config),
            Err(AnalyzePlayerError::InvalidConfig(
                ConfigError::CalendarRangeTooLong { .. }
            ))
        ));
    }
}
