use chrono::{DateTime, TimeZone, Utc};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub group_id: i64,

    // Layout on disk
    pub data_dir: String,
    pub log_dir: String,

    // Duplicate detection
    pub time_tolerance_minutes: i64,

    // Fetch cursor when no dataset exists yet
    pub default_cursor: DateTime<Utc>,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        Config {
            bot_token: env("TELEGRAM_BOT_TOKEN", ""),
            group_id: env("TELEGRAM_GROUP_ID", "0").parse().unwrap_or(0),
            data_dir: env("DATA_DIR", "data"),
            log_dir: env("LOG_DIR", "logs"),
            time_tolerance_minutes: env("TIME_TOLERANCE_MINUTES", "60").parse().unwrap_or(60),
            default_cursor: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            log_level: env("LOG_LEVEL", "INFO"),
        }
    }

    /// The merged signal dataset (whole-file CSV, rewritten each run).
    pub fn dataset_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("telegram_signals_clean.csv")
    }

    /// Raw fetched batch, persisted before any parsing happens.
    pub fn raw_batch_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("raw").join("raw_messages.json")
    }

    /// Pre-merge snapshots land here, stamped with the run start time.
    pub fn backups_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("backups")
    }

    /// Append-only operation log, one line per stage per run.
    pub fn operation_log_path(&self) -> PathBuf {
        PathBuf::from(&self.log_dir).join("extractor_log.txt")
    }
}
