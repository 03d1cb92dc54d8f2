pub mod csv;

pub use self::csv::CsvStore;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::{RawMessage, SignalRecord};

/// Persisted tabular dataset of signal rows. Read once and written
/// once per run, whole-file; concurrent writers are not supported
/// (single-writer-at-a-time operation is assumed, not enforced).
pub trait DatasetStore: Send + Sync {
    /// `Ok(None)` when no dataset exists yet — a fresh install, not an
    /// error.
    fn load(&self) -> Result<Option<Vec<SignalRecord>>>;

    /// Byte-for-byte snapshot of the current dataset, stamped with the
    /// run start time. `Ok(None)` when there is nothing to back up.
    /// The pipeline never reads a backup; they exist for operator
    /// recovery only.
    fn backup(&self, at: DateTime<Utc>) -> Result<Option<PathBuf>>;

    /// Replace the dataset wholesale. All-or-nothing: on failure the
    /// previous file must remain intact.
    fn save(&self, records: &[SignalRecord]) -> Result<()>;
}

/// Append-only operation log, one line per run stage.
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn append(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log dir {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open operation log {}", self.path.display()))?;
        writeln!(
            file,
            "[{}] {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S%.6f"),
            line
        )
        .context("Failed to append to operation log")?;
        Ok(())
    }
}

/// Overwrite the raw batch artifact with this run's fetched messages.
/// A pre-parse checkpoint: if parsing later fails, the batch is the
/// replay source of truth.
pub fn save_raw_batch(path: &Path, messages: &[RawMessage]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create raw dir {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(messages).context("Failed to encode raw batch")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write raw batch {}", path.display()))?;
    Ok(())
}
