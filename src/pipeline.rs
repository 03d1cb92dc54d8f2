use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ExtractError;
use crate::extract::{classify, is_duplicate, parse, Category, ParsedFields};
use crate::models::SignalRecord;
use crate::source::MessageSource;
use crate::store::{save_raw_batch, DatasetStore, RunLog};

/// Per-run counters, reported back to the caller and logged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub fetched: usize,
    pub new_signals: usize,
    pub updates: usize,
    pub unclassified: usize,
    pub duplicates: usize,
    pub dropped_malformed: usize,
    pub final_rows: usize,
}

/// One fetch-parse-merge pass over the channel. Stages run strictly
/// in sequence; there is no retry or resume. Everything up to the
/// backup/overwrite step is side-effect free on the dataset, after
/// that the run is irrevocable (the backup file is the only rollback,
/// applied manually).
pub struct Pipeline {
    config: Config,
    source: Box<dyn MessageSource>,
    store: Box<dyn DatasetStore>,
    run_log: RunLog,
}

impl Pipeline {
    pub fn new(config: Config, source: Box<dyn MessageSource>, store: Box<dyn DatasetStore>) -> Self {
        let run_log = RunLog::new(config.operation_log_path());
        Self {
            config,
            source,
            store,
            run_log,
        }
    }

    pub async fn run(&mut self) -> Result<RunSummary, ExtractError> {
        let run_start = Utc::now();
        let mut summary = RunSummary::default();

        // 1. Load history and derive the fetch cursor.
        let history = self
            .store
            .load()
            .map_err(|e| persistence("loading dataset", e))?;
        let cursor = cursor_from(history.as_deref(), self.config.default_cursor);
        match &history {
            Some(rows) => info!("Loaded {} existing signal rows", rows.len()),
            None => info!("No existing dataset, starting with empty history"),
        }

        // 2. Fetch one complete batch, then persist it before parsing
        // anything. The raw file is the replay source of truth.
        info!("Fetching messages after {}", cursor);
        let messages = self
            .source
            .fetch(self.config.group_id, cursor)
            .await
            .map_err(ExtractError::SourceUnavailable)?;
        summary.fetched = messages.len();
        info!("Fetched {} new messages", messages.len());

        save_raw_batch(&self.config.raw_batch_path(), &messages)
            .map_err(|e| persistence("writing raw batch", e))?;
        self.run_log
            .append(&format!("Downloaded {} new messages.", messages.len()))
            .map_err(|e| persistence("appending operation log", e))?;

        // 3. Parse and classify; new signals are checked against the
        // pre-run history only. Repeats inside one batch fall through
        // to the final exact-row dedup.
        let pre_run_history: &[SignalRecord] = history.as_deref().unwrap_or(&[]);
        let mut accepted: Vec<(ParsedFields, DateTime<Utc>)> = Vec::new();
        for msg in &messages {
            let fields = parse(&msg.text);
            match classify(&fields) {
                Category::NewSignal => {
                    summary.new_signals += 1;
                    if is_duplicate(
                        &fields,
                        msg.timestamp,
                        pre_run_history,
                        self.config.time_tolerance_minutes,
                    ) {
                        summary.duplicates += 1;
                        debug!(
                            "Duplicate signal at {} ({})",
                            msg.timestamp,
                            fields.symbol.as_deref().unwrap_or("?")
                        );
                    } else {
                        accepted.push((fields, msg.timestamp));
                    }
                }
                Category::Update => summary.updates += 1,
                Category::Unclassified => summary.unclassified += 1,
            }
        }

        // 4-5. Drop incomplete candidates, normalize the rest.
        let mut new_records = Vec::new();
        for (fields, timestamp) in &accepted {
            match SignalRecord::from_fields(fields, *timestamp) {
                Some(record) => new_records.push(record),
                None => {
                    summary.dropped_malformed += 1;
                    warn!(
                        "Dropping incomplete signal at {} ({})",
                        timestamp,
                        fields.symbol.as_deref().unwrap_or("?")
                    );
                }
            }
        }

        // 6. Snapshot the prior dataset, then merge and collapse exact
        // repeat rows.
        let final_rows = match history {
            Some(prior) => {
                let backup = self
                    .store
                    .backup(run_start)
                    .map_err(|e| persistence("backing up dataset", e))?;
                if let Some(path) = backup {
                    info!("Backed up dataset to {}", path.display());
                }

                let mut merged: Vec<SignalRecord> = Vec::new();
                for record in prior.into_iter().chain(new_records) {
                    if !merged.contains(&record) {
                        merged.push(record);
                    }
                }
                merged
            }
            None => new_records,
        };
        summary.final_rows = final_rows.len();

        // 7-8. Atomic overwrite, then the merge line in the run log.
        self.store
            .save(&final_rows)
            .map_err(|e| persistence("writing dataset", e))?;
        self.run_log
            .append(&format!("Signals merged: {} total rows.", final_rows.len()))
            .map_err(|e| persistence("appending operation log", e))?;

        info!(
            "Run complete: {} fetched, {} new signals ({} duplicates, {} incomplete), {} updates, {} rows total",
            summary.fetched,
            summary.new_signals,
            summary.duplicates,
            summary.dropped_malformed,
            summary.updates,
            summary.final_rows
        );

        Ok(summary)
    }
}

/// The fetch cursor is re-derived each run as the newest timestamp in
/// the dataset; it is never persisted on its own.
pub fn cursor_from(
    history: Option<&[SignalRecord]>,
    default: DateTime<Utc>,
) -> DateTime<Utc> {
    history
        .and_then(|rows| rows.iter().map(|r| r.timestamp).max())
        .unwrap_or(default)
}

fn persistence(stage: &'static str, source: anyhow::Error) -> ExtractError {
    ExtractError::Persistence { stage, source }
}
