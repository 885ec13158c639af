//! Analysis configuration arguments shared by the commands

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use dotapulse_analysis::{calendar::CalendarRange, config::AnalysisConfig};

use crate::util::{self, Output};

/// Config file and overrides common to every analysis command.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct ConfigArg {
    /// JSON file with analysis parameters; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Players with fewer matches are skipped
    #[arg(long)]
    pub min_matches: Option<usize>,

    /// First year of the analysed calendar
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Year after the last analysed year
    #[arg(long)]
    pub end_year: Option<i32>,
}

impl ConfigArg {
    /// Loads the config file (or the defaults) and applies the common overrides.
    ///
    /// The result is not validated yet; callers apply their own overrides first.
    pub(crate) fn load(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("config", path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(min_matches) = self.min_matches {
            config.min_matches = min_matches;
        }
        if self.start_year.is_some() || self.end_year.is_some() {
            let start_year = self.start_year.unwrap_or(config.calendar.start_year());
            let end_year = self.end_year.unwrap_or(config.calendar.end_year());
            config.calendar = CalendarRange::new(start_year, end_year)
                .context("Invalid --start-year/--end-year")?;
        }
        Ok(config)
    }
}

pub(crate) fn validated(config: AnalysisConfig) -> anyhow::Result<AnalysisConfig> {
    config.validate().context("Invalid analysis configuration")?;
    Ok(config)
}

#[derive(Debug, Clone, Args)]
pub(crate) struct ShowConfigArg {
    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ShowConfigArg) -> anyhow::Result<()> {
    Output::save_json(&AnalysisConfig::default(), arg.output.clone())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_load_defaults() {
        let config = ConfigArg::default().load().unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"min_matches": 10, "calendar": {"start_year": 2012, "end_year": 2018}}"#,
        )
        .unwrap();

        let arg = ConfigArg {
            config: Some(path),
            min_matches: None,
            start_year: Some(2014),
            end_year: None,
        };
        let config = arg.load().unwrap();
        assert_eq!(config.min_matches, 10);
        assert_eq!(config.calendar.start_year(), 2014);
        assert_eq!(config.calendar.end_year(), 2018);
    }

    #[test]
    fn test_empty_calendar_override_fails() {
        let arg = ConfigArg {
            start_year: Some(2019),
            end_year: Some(2019),
            ..ConfigArg::default()
        };
        assert!(arg.load().is_err());
    }

    #[test]
    fn test_invalid_config_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"unknown": 1}"#).unwrap();
        let arg = ConfigArg {
            config: Some(path),
            ..ConfigArg::default()
        };
        assert!(arg.load().is_err());
    }
}
