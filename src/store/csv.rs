use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::models::SignalRecord;
use crate::store::DatasetStore;

/// Whole-file CSV dataset store. Columns:
/// `symbol,direction,entry,tp_40,tp_60,tp_80,tp_100,timestamp`,
/// timestamps ISO-8601. Saves go through a temp file in the same
/// directory followed by a rename, so a failed write never leaves a
/// half-written dataset behind.
pub struct CsvStore {
    dataset_path: PathBuf,
    backups_dir: PathBuf,
}

impl CsvStore {
    pub fn new(cfg: &Config) -> Self {
        Self {
            dataset_path: cfg.dataset_path(),
            backups_dir: cfg.backups_dir(),
        }
    }

    pub fn at(dataset_path: impl Into<PathBuf>, backups_dir: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            backups_dir: backups_dir.into(),
        }
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }
}

impl DatasetStore for CsvStore {
    fn load(&self) -> Result<Option<Vec<SignalRecord>>> {
        if !self.dataset_path.exists() {
            return Ok(None);
        }

        let mut reader = ::csv::Reader::from_path(&self.dataset_path)
            .with_context(|| format!("Failed to open dataset {}", self.dataset_path.display()))?;

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: SignalRecord = row.with_context(|| {
                format!("Malformed row in dataset {}", self.dataset_path.display())
            })?;
            records.push(record);
        }
        Ok(Some(records))
    }

    fn backup(&self, at: DateTime<Utc>) -> Result<Option<PathBuf>> {
        if !self.dataset_path.exists() {
            return Ok(None);
        }

        fs::create_dir_all(&self.backups_dir).with_context(|| {
            format!("Failed to create backup dir {}", self.backups_dir.display())
        })?;

        let dest = self
            .backups_dir
            .join(format!("signals_backup_{}.csv", at.format("%Y%m%d_%H%M%S")));
        fs::copy(&self.dataset_path, &dest)
            .with_context(|| format!("Failed to copy dataset to {}", dest.display()))?;
        Ok(Some(dest))
    }

    fn save(&self, records: &[SignalRecord]) -> Result<()> {
        let dir = match self.dataset_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data dir {}", dir.display()))?;

        // Temp file in the same directory so the final rename stays on
        // one filesystem.
        let tmp = self.dataset_path.with_extension("csv.tmp");
        {
            let mut writer = ::csv::Writer::from_path(&tmp)
                .with_context(|| format!("Failed to create temp dataset {}", tmp.display()))?;
            for record in records {
                writer.serialize(record).context("Failed to encode row")?;
            }
            writer.flush().context("Failed to flush temp dataset")?;
        }
        fs::rename(&tmp, &self.dataset_path).with_context(|| {
            format!("Failed to replace dataset {}", self.dataset_path.display())
        })?;
        Ok(())
    }
}
