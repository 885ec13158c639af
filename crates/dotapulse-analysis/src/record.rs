//! Match records as found in per-player match dumps
//!
//! A player file is a JSON array of match objects. Only a handful of fields
//! matter here:
//!
//! ```json
//! [
//!   {
//!     "match_id": 3912871234,
//!     "start_time": 1526342400,
//!     "radiant_win": true,
//!     "leaver_status": 0,
//!     "hero_id": 74
//!   }
//! ]
//! ```
//!
//! Every field except `start_time` is optional at parse time; whether a
//! missing field makes the record unusable depends on the analysis
//! ([`OutcomeKind`]).

use serde::{Deserialize, Serialize};

use crate::calendar::MonthKey;

/// A record that cannot be used by the analysis.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MalformedRecord {
    #[display("invalid month '{input}', expected YYYY-MM")]
    InvalidMonth { input: String },
    #[display("start time {timestamp} is not a representable date")]
    InvalidTimestamp { timestamp: i64 },
    #[display("record has no '{field}' field")]
    MissingField { field: &'static str },
}

/// One played match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Match start, seconds since the Unix epoch (UTC)
    pub start_time: i64,
    #[serde(default)]
    pub radiant_win: Option<bool>,
    /// Nonzero when the player abandoned the match
    #[serde(default)]
    pub leaver_status: Option<i64>,
    #[serde(default)]
    pub hero_id: Option<u32>,
}

impl MatchRecord {
    pub fn month(&self) -> Result<MonthKey, MalformedRecord> {
        MonthKey::from_timestamp(self.start_time)
    }

    #[must_use]
    pub fn has_left(&self) -> Option<bool> {
        self.leaver_status.map(|status| status != 0)
    }

    /// The boolean outcome this record contributes to an analysis of `kind`.
    pub fn outcome(&self, kind: OutcomeKind) -> Result<bool, MalformedRecord> {
        match kind {
            OutcomeKind::Win => self
                .radiant_win
                .ok_or(MalformedRecord::MissingField {
                    field: "radiant_win",
                }),
            OutcomeKind::Leave => self.has_left().ok_or(MalformedRecord::MissingField {
                field: "leaver_status",
            }),
        }
    }

    /// Month and outcome of the record, the pair the timeline is built from.
    pub fn dated_outcome(&self, kind: OutcomeKind) -> Result<(MonthKey, bool), MalformedRecord> {
        Ok((self.month()?, self.outcome(kind)?))
    }
}

/// Which per-match flag an analysis looks at.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// `radiant_win` is true
    Win,
    /// `leaver_status` is nonzero
    #[default]
    Leave,
}

impl OutcomeKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            OutcomeKind::Win => "win",
            OutcomeKind::Leave => "leave",
        }
    }
}

/// Overall positive fraction of `kind` over every record carrying the field.
///
/// Records outside the calendar range still count here; the rate describes
/// the player's whole history.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn overall_rate(records: &[MatchRecord], kind: OutcomeKind) -> Option<f64> {
    let (positives, total) = records
        .iter()
        .filter_map(|record| record.outcome(kind).ok())
        .fold((0_usize, 0_usize), |(positives, total), outcome| {
            (positives + usize::from(outcome), total + 1)
        });
    (total > 0).then(|| positives as f64 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(start_time: i64, radiant_win: Option<bool>, leaver_status: Option<i64>) -> MatchRecord {
        MatchRecord {
            start_time,
            radiant_win,
            leaver_status,
            hero_id: None,
        }
    }

    #[test]
    fn test_parse_record_ignores_unknown_fields() {
        let json = r#"{"match_id": 1, "start_time": 1526342400, "radiant_win": false,
                      "leaver_status": 2, "hero_id": 74, "duration": 2400}"#;
        let record: MatchRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.start_time, 1_526_342_400);
        assert_eq!(record.radiant_win, Some(false));
        assert_eq!(record.has_left(), Some(true));
        assert_eq!(record.hero_id, Some(74));
        assert_eq!(record.month().unwrap(), MonthKey::new(2018, 5).unwrap());
    }

    #[test]
    fn test_parse_record_with_missing_optional_fields() {
        let record: MatchRecord = serde_json::from_str(r#"{"start_time": 0}"#).unwrap();
        assert_eq!(
            record.outcome(OutcomeKind::Win),
            Err(MalformedRecord::MissingField {
                field: "radiant_win"
            })
        );
        assert_eq!(
            record.outcome(OutcomeKind::Leave),
            Err(MalformedRecord::MissingField {
                field: "leaver_status"
            })
        );
    }

    #[test]
    fn test_parse_record_requires_start_time() {
        assert!(serde_json::from_str::<MatchRecord>(r#"{"radiant_win": true}"#).is_err());
    }

    #[test]
    fn test_outcome_kind_from_str() {
        assert_eq!("win".parse::<OutcomeKind>().unwrap(), OutcomeKind::Win);
        assert_eq!("leave".parse::<OutcomeKind>().unwrap(), OutcomeKind::Leave);
        assert!("draw".parse::<OutcomeKind>().is_err());
    }

    #[test]
    fn test_overall_rate() {
        let records = [
            record(0, Some(true), Some(0)),
            record(0, Some(false), Some(1)),
            record(0, Some(true), None),
            record(0, None, Some(0)),
        ];
        assert_eq!(overall_rate(&records, OutcomeKind::Win), Some(2.0 / 3.0));
        assert_eq!(overall_rate(&records, OutcomeKind::Leave), Some(1.0 / 3.0));
        assert_eq!(overall_rate(&[], OutcomeKind::Win), None);
    }
}
