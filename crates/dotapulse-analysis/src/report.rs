//! Plain-text result report
//!
//! ```text
//! Less than 5 number of games for 2 consecutive months is considered inactive
//! Results of 5 number of games is tracked before start of inactive period
//! Results are listed below:
//! 2: 1.13
//! 3: 0.98
//! ```

use std::io;

use crate::{aggregate::RunScoreMean, config::AnalysisConfig};

/// Writes the header lines and one `score: mean` line per entry of `means`.
///
/// `means` is expected in ascending score order, as produced by
/// [`RunRates::means`](crate::aggregate::RunRates::means).
pub fn write_text_report<W>(
    mut writer: W,
    config: &AnalysisConfig,
    means: &[RunScoreMean],
) -> io::Result<()>
where
    W: io::Write,
{
    writeln!(
        writer,
        "Less than {} number of games for 2 consecutive months is considered inactive",
        config.activity_threshold
    )?;
    writeln!(
        writer,
        "Results of {} number of games is tracked before start of inactive period",
        config.backtrace_count
    )?;
    writeln!(writer, "Results are listed below:")?;
    for RunScoreMean { score, mean, .. } in means {
        writeln!(writer, "{score}: {mean}")?;
    }
    writer.flush()
}
