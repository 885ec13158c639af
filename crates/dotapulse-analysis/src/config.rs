//! Analysis parameters
//!
//! Every knob of the inactivity analysis lives in [`AnalysisConfig`]. The
//! defaults reproduce the leaver study (leave outcome, threshold 5,
//! backtrace 5, relative normalization, one sample per player); the win
//! study is the same analysis run with `outcome = win`, `activity_threshold
//! = 2`, `normalization = raw` and `sample_unit = run`.
//!
//! The config can be loaded from JSON. Missing fields take their defaults
//! and unknown fields are rejected:
//!
//! ```json
//! {
//!   "calendar": { "start_year": 2012, "end_year": 2019 },
//!   "outcome": "win",
//!   "activity_threshold": 2
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    aggregate::{Normalization, SampleUnit},
    calendar::CalendarRange,
    record::OutcomeKind,
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("calendar range {start_year}..{end_year} contains no month")]
    EmptyCalendarRange { start_year: i32, end_year: i32 },
    #[display("calendar range {start_year}..{end_year} spans more than {max_years} years")]
    CalendarRangeTooLong {
        start_year: i32,
        end_year: i32,
        max_years: u32,
    },
    #[display("activity threshold must be at least 1")]
    ZeroThreshold,
    #[display("backtrace count must be at least 1")]
    ZeroBacktraceCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Years covered by the timeline (end exclusive)
    pub calendar: CalendarRange,
    pub outcome: OutcomeKind,
    /// A month with fewer games than this is inactive
    pub activity_threshold: u32,
    /// Number of games sampled before each inactive run
    pub backtrace_count: usize,
    /// Players with fewer parsed matches are skipped
    pub min_matches: usize,
    pub normalization: Normalization,
    pub sample_unit: SampleUnit,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            calendar: CalendarRange::default(),
            outcome: OutcomeKind::Leave,
            activity_threshold: 5,
            backtrace_count: 5,
            min_matches: 50,
            normalization: Normalization::Relative,
            sample_unit: SampleUnit::Player,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.calendar.validate()?;
        if self.activity_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.backtrace_count == 0 {
            return Err(ConfigError::ZeroBacktraceCount);
        }
        Ok(())
    }
}
