//! Player profile command
//!
//! Computes whole-history rates for every player and prints their
//! distribution across the population.

use std::path::PathBuf;

use clap::Args;
use dotapulse_analysis::{
    config::AnalysisConfig,
    profile::{MetricCorrelation, MetricSummary, PlayerProfile, PopulationSummary},
};
use dotapulse_stats::histogram::Histogram;
use serde::Serialize;

use crate::{
    command::config::{self, ConfigArg},
    util::{self, Output, PlayerFile},
};

const BAR_WIDTH: u64 = 40;

#[derive(Debug, Clone, Args)]
pub(crate) struct ProfileArg {
    /// Directory holding one match history JSON file per player
    pub dir: PathBuf,

    #[command(flatten)]
    pub config: ConfigArg,

    /// Number of histogram bins over [0, 1]
    #[arg(long, default_value_t = 10)]
    pub bins: usize,

    /// Write profiles and summary as JSON to this path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ProfileResult<'a> {
    profiles: &'a [PlayerProfile],
    metrics: Vec<MetricJson>,
    correlations: Vec<CorrelationJson>,
}

#[derive(Debug, Serialize)]
struct MetricJson {
    metric: &'static str,
    count: usize,
    min: Option<f64>,
    max: Option<f64>,
    mean: Option<f64>,
    median: Option<f64>,
    std_dev: Option<f64>,
    histogram: Vec<BinJson>,
}

#[derive(Debug, Serialize)]
struct BinJson {
    start: f64,
    end: f64,
    count: u64,
}

#[derive(Debug, Serialize)]
struct CorrelationJson {
    x: &'static str,
    y: &'static str,
    pairs: usize,
    pearson: Option<f64>,
}

impl From<&MetricSummary> for MetricJson {
    fn from(summary: &MetricSummary) -> Self {
        let stats = summary.stats.as_ref();
        Self {
            metric: summary.metric.name(),
            count: stats.map_or(0, |s| s.count),
            min: stats.map(|s| s.min),
            max: stats.map(|s| s.max),
            mean: stats.map(|s| s.mean),
            median: stats.map(|s| s.median),
            std_dev: stats.map(|s| s.std_dev),
            histogram: summary
                .histogram
                .bins
                .iter()
                .map(|bin| BinJson {
                    start: bin.range.start,
                    end: bin.range.end,
                    count: bin.count,
                })
                .collect(),
        }
    }
}

impl From<&MetricCorrelation> for CorrelationJson {
    fn from(correlation: &MetricCorrelation) -> Self {
        Self {
            x: correlation.x.name(),
            y: correlation.y.name(),
            pairs: correlation.pairs,
            pearson: correlation.pearson,
        }
    }
}

pub(crate) fn run(arg: &ProfileArg) -> anyhow::Result<()> {
    anyhow::ensure!(arg.bins > 0, "--bins must be at least 1");
    let config = config::validated(arg.config.load()?)?;
    let files = util::find_player_files(&arg.dir)?;
    eprintln!("Profiling {} player files...", files.len());

    let profiles = collect_profiles(&files, &config);
    let summary = PopulationSummary::from_profiles(&profiles, arg.bins);

    println!("Player Profile Report (min matches: {})", config.min_matches);
    println!("==========================================\n");
    println!("Players: {}\n", summary.players);
    for metric in &summary.metrics {
        print_metric(metric);
        println!();
    }
    print_correlations(&summary.correlations);

    if let Some(path) = &arg.output {
        let result = ProfileResult {
            profiles: &profiles,
            metrics: summary.metrics.iter().map(MetricJson::from).collect(),
            correlations: summary
                .correlations
                .iter()
                .map(CorrelationJson::from)
                .collect(),
        };
        Output::save_json(&result, Some(path.clone()))?;
        println!("\nProfiles saved to: {}", path.display());
    }
    Ok(())
}

fn collect_profiles(files: &[PlayerFile], config: &AnalysisConfig) -> Vec<PlayerProfile> {
    let mut profiles = vec![];
    for file in files {
        let records = match util::read_player_records(&file.path) {
            Ok(records) => records.records,
            Err(e) => {
                log::warn!("skipping player {}: {e:#}", file.player_id);
                continue;
            }
        };
        if records.len() < config.min_matches {
            log::debug!(
                "excluding player {}: only {} matches",
                file.player_id,
                records.len()
            );
            continue;
        }
        profiles.push(PlayerProfile::from_records(&*file.player_id, &records));
    }
    profiles
}

fn print_metric(summary: &MetricSummary) {
    println!("{}", summary.metric.name());
    let Some(stats) = &summary.stats else {
        println!("  (no data)");
        return;
    };
    println!(
        "  {:>6} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Count", "Min", "Max", "Mean", "Median", "StdDev"
    );
    println!(
        "  {:>6} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>8.4}",
        stats.count, stats.min, stats.max, stats.mean, stats.median, stats.std_dev
    );
    print_histogram(&summary.histogram);
}

fn print_histogram(histogram: &Histogram) {
    let max_count = histogram.max_count().max(1);
    for bin in &histogram.bins {
        let bar_len = usize::try_from(bin.count * BAR_WIDTH / max_count).unwrap_or(0);
        println!(
            "  [{:.2}, {:.2}) {:>6} {}",
            bin.range.start,
            bin.range.end,
            bin.count,
            "#".repeat(bar_len)
        );
    }
    if histogram.out_of_range > 0 {
        println!("  (out of range: {})", histogram.out_of_range);
    }
}

fn print_correlations(correlations: &[MetricCorrelation]) {
    println!("Correlations (Pearson)");
    println!("  {:<32} {:>6} {:>8}", "Metrics", "Pairs", "r");
    for correlation in correlations {
        let label = format!("{} vs {}", correlation.x.name(), correlation.y.name());
        match correlation.pearson {
            Some(r) => println!("  {label:<32} {:>6} {r:>8.4}", correlation.pairs),
            None => println!("  {label:<32} {:>6} {:>8}", correlation.pairs, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_collect_profiles_filters_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        let matches = (0..4)
            .map(|i| {
                serde_json::json!({
                    "start_time": 1_500_000_000 + i,
                    "radiant_win": i % 2 == 0,
                    "leaver_status": 0,
                    "hero_id": i % 2,
                })
            })
            .collect::<Vec<_>>();
        let json = serde_json::Value::Array(matches).to_string();
        fs::write(dir.path().join("10_a.json"), &json).unwrap();
        fs::write(dir.path().join("11_b.json"), "[").unwrap();
        fs::write(dir.path().join("12_c.json"), "[]").unwrap();

        let config = AnalysisConfig {
            min_matches: 1,
            ..AnalysisConfig::default()
        };
        let files = util::find_player_files(dir.path()).unwrap();
        let profiles = collect_profiles(&files, &config);

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].player_id, "10");
        assert_eq!(profiles[0].num_matches, 4);
        assert_eq!(profiles[0].win_rate, Some(0.5));
        assert_eq!(profiles[0].leaver_rate, Some(0.0));
        assert_eq!(profiles[0].hero_diversity, Some(0.5));
    }

    #[test]
    fn test_metric_json_without_data() {
        let summary = PopulationSummary::from_profiles(&[], 4);
        let json = MetricJson::from(&summary.metrics[0]);
        assert_eq!(json.count, 0);
        assert_eq!(json.mean, None);
        assert_eq!(json.histogram.len(), 4);
    }
}
