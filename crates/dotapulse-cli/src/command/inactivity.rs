//! Inactivity analysis command
//!
//! Runs the per-player inactivity analysis over every player file of a
//! directory and aggregates the backtrace rates by run score.

use std::{
    fmt::Write as _,
    fs,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Args;
use dotapulse_analysis::{
    aggregate::{Normalization, RunRates, RunScoreMean, SampleUnit},
    config::AnalysisConfig,
    player,
    record::OutcomeKind,
    report,
};
use serde::Serialize;

use crate::{
    command::config::{self, ConfigArg},
    util::{self, Output, PlayerFile},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct InactivityArg {
    /// Directory holding one match history JSON file per player
    pub dir: PathBuf,

    #[command(flatten)]
    pub config: ConfigArg,

    /// Per-match flag to measure (win or leave)
    #[arg(long)]
    pub outcome: Option<OutcomeKind>,

    /// A month with fewer games than this is inactive
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Number of games sampled before each inactive period
    #[arg(long)]
    pub backtrace: Option<usize>,

    /// How backtrace rates are scaled (raw or relative)
    #[arg(long)]
    pub normalization: Option<Normalization>,

    /// What one aggregated sample stands for (run or player)
    #[arg(long)]
    pub sample_unit: Option<SampleUnit>,

    /// Write the text report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Output file path for the JSON result (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write every (run score, value) pair to this CSV file
    #[arg(long)]
    pub points_csv: Option<PathBuf>,
}

impl InactivityArg {
    fn analysis_config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = self.config.load()?;
        if let Some(outcome) = self.outcome {
            config.outcome = outcome;
        }
        if let Some(threshold) = self.threshold {
            config.activity_threshold = threshold;
        }
        if let Some(backtrace) = self.backtrace {
            config.backtrace_count = backtrace;
        }
        if let Some(normalization) = self.normalization {
            config.normalization = normalization;
        }
        if let Some(sample_unit) = self.sample_unit {
            config.sample_unit = sample_unit;
        }
        config::validated(config)
    }
}

/// Per-player bookkeeping of a batch run.
#[derive(Debug, Clone, Default, Serialize)]
struct BatchCounts {
    analyzed_players: usize,
    /// Players below `min_matches` or without in-range activity
    excluded_players: usize,
    /// Files that could not be read or parsed
    failed_files: usize,
    inactive_runs: usize,
    malformed_records: usize,
}

#[derive(Debug, Clone, Default)]
struct Batch {
    rates: RunRates,
    counts: BatchCounts,
}

#[derive(Debug, Serialize)]
struct InactivityResult<'a> {
    config: &'a AnalysisConfig,
    #[serde(flatten)]
    counts: &'a BatchCounts,
    samples: usize,
    means: Vec<RunScoreMean>,
}

pub(crate) fn run(arg: &InactivityArg) -> anyhow::Result<()> {
    let config = arg.analysis_config()?;
    let files = util::find_player_files(&arg.dir)?;
    eprintln!(
        "Analyzing {} player files ({} outcome, calendar {})...",
        files.len(),
        config.outcome.label(),
        config.calendar
    );

    let batch = analyze_players(&files, &config);
    let counts = &batch.counts;
    eprintln!(
        "Analyzed {} players ({} excluded, {} failed), {} inactive runs",
        counts.analyzed_players, counts.excluded_players, counts.failed_files, counts.inactive_runs
    );

    let means = batch.rates.means();
    if let Some(path) = &arg.report {
        save_report(path, &config, &means)?;
        eprintln!("Report saved to: {}", path.display());
    }
    if let Some(path) = &arg.points_csv {
        save_points_csv(path, &batch.rates)?;
        eprintln!("Points saved to: {}", path.display());
    }

    let result = InactivityResult {
        config: &config,
        counts,
        samples: batch.rates.sample_count(),
        means,
    };
    Output::save_json(&result, arg.output.clone())
}

fn analyze_players(files: &[PlayerFile], config: &AnalysisConfig) -> Batch {
    let mut batch = Batch::default();
    for file in files {
        let records = match util::read_player_records(&file.path) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("skipping player {}: {e:#}", file.player_id);
                batch.counts.failed_files += 1;
                continue;
            }
        };

        match player::analyze(&*file.player_id, &records.records, config) {
            Ok(analysis) => {
                log::debug!(
                    "player {}: {} matches ({} outside the calendar), {} inactive runs",
                    analysis.player_id,
                    analysis.num_matches,
                    analysis.out_of_range_matches,
                    analysis.runs.len()
                );
                batch.counts.analyzed_players += 1;
                batch.counts.inactive_runs += analysis.runs.len();
                batch.counts.malformed_records += records.malformed + analysis.malformed_records;
                batch
                    .rates
                    .add_player(analysis.run_rates(), config.sample_unit);
            }
            Err(e) => {
                log::debug!("excluding player {}: {e}", file.player_id);
                batch.counts.excluded_players += 1;
            }
        }
    }
    batch
}

fn save_report(path: &Path, config: &AnalysisConfig, means: &[RunScoreMean]) -> anyhow::Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    report::write_text_report(BufWriter::new(file), config, means)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

fn save_points_csv(path: &Path, rates: &RunRates) -> anyhow::Result<()> {
    let mut csv_content = String::from("score,value\n");
    for (score, value) in rates.points() {
        writeln!(&mut csv_content, "{score},{value}")?;
    }
    fs::write(path, csv_content)
        .with_context(|| format!("Failed to write points CSV: {}", path.display()))
}
