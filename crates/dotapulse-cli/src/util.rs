use std::{
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use dotapulse_analysis::record::MatchRecord;
use walkdir::WalkDir;

/// Destination of a JSON result.
#[derive(Debug)]
pub enum Output {
    Stdout(StdoutLock<'static>),
    File(BufWriter<File>, PathBuf),
}

impl Output {
    /// Writes `value` as pretty JSON to `path`, or to stdout if `path` is `None`.
    pub fn save_json<T>(value: &T, path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = match path {
            Some(path) => {
                let file = File::create(&path).with_context(|| {
                    format!("Failed to create output file: {}", path.display())
                })?;
                Output::File(BufWriter::new(file), path)
            }
            None => Output::Stdout(io::stdout().lock()),
        };
        output
            .write_json(value)
            .with_context(|| format!("Failed to write JSON to {}", output.name()))
    }

    fn name(&self) -> String {
        match self {
            Output::Stdout(_) => "stdout".to_owned(),
            Output::File(_, path) => path.display().to_string(),
        }
    }

    fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)?;
        writeln!(self)?;
        self.flush()?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(writer) => writer.write(buf),
            Output::File(writer, _) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(writer) => writer.flush(),
            Output::File(writer, _) => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// A match history file of one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerFile {
    pub player_id: String,
    pub path: PathBuf,
}

/// Finds every player file below `dir`, in sorted path order.
///
/// The player id is the leading part of the file name up to the first `_`
/// (the whole file stem if there is none). Entries that cannot be read are
/// skipped with a warning.
pub fn find_player_files<P>(dir: P) -> anyhow::Result<Vec<PlayerFile>>
where
    P: AsRef<Path>,
{
    let dir = dir.as_ref();
    let metadata = fs::metadata(dir)
        .with_context(|| format!("Failed to access player directory: {}", dir.display()))?;
    anyhow::ensure!(
        metadata.is_dir(),
        "Not a directory: {}",
        dir.display()
    );

    let mut files = vec![];
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(stem) = entry.path().file_stem().and_then(|s| s.to_str()) else {
            log::warn!("skipping non UTF-8 file name: {}", entry.path().display());
            continue;
        };
        let player_id = stem.split('_').next().unwrap_or(stem).to_owned();
        files.push(PlayerFile {
            player_id,
            path: entry.into_path(),
        });
    }
    Ok(files)
}

/// Match records of one player, oldest first.
#[derive(Debug, Clone, Default)]
pub struct PlayerRecords {
    pub records: Vec<MatchRecord>,
    /// Array elements that are not match records
    pub malformed: usize,
}

/// Reads a player file holding a JSON array of matches.
///
/// Player dumps list matches newest first; the records are returned in
/// chronological order, matches with the same start time keeping their
/// relative order from the reversed file. Elements that do not parse as a
/// match are counted and skipped.
pub fn read_player_records<P>(path: P) -> anyhow::Result<PlayerRecords>
where
    P: AsRef<Path>,
{
    let values: Vec<serde_json::Value> = read_json_file("player", path.as_ref())?;
    let mut records = PlayerRecords::default();
    for value in values.into_iter().rev() {
        match serde_json::from_value::<MatchRecord>(value) {
            Ok(record) => records.records.push(record),
            Err(e) => {
                log::debug!(
                    "skipping malformed match in {}: {e}",
                    path.as_ref().display()
                );
                records.malformed += 1;
            }
        }
    }
    records.records.sort_by_key(|record| record.start_time);
    Ok(records)
}
