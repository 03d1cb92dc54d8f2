use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

use telegram_signal_extractor::config::Config;
use telegram_signal_extractor::models::RawMessage;
use telegram_signal_extractor::source::MessageSource;

pub const GROUP_ID: i64 = 42;

/// Parse an RFC-3339 timestamp for fixtures.
pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// Fresh per-test directory under the system temp dir.
pub fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "signal_extractor_integ_{}_{}",
        label,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Config pointing every artifact into `dir`.
pub fn test_config(dir: &PathBuf) -> Config {
    Config {
        bot_token: String::new(),
        group_id: GROUP_ID,
        data_dir: dir.join("data").to_string_lossy().to_string(),
        log_dir: dir.join("logs").to_string_lossy().to_string(),
        time_tolerance_minutes: 60,
        default_cursor: ts("2023-01-01T00:00:00Z"),
        log_level: "INFO".to_string(),
    }
}

/// A message source backed by canned messages. Applies the same
/// after-cursor filtering and ordering contract as the real client.
pub struct MockSource {
    messages: Vec<RawMessage>,
}

impl MockSource {
    pub fn new(messages: Vec<(&str, DateTime<Utc>)>) -> Self {
        Self {
            messages: messages
                .into_iter()
                .map(|(text, timestamp)| RawMessage {
                    text: text.to_string(),
                    timestamp,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl MessageSource for MockSource {
    async fn fetch(&mut self, _group_id: i64, after: DateTime<Utc>) -> Result<Vec<RawMessage>> {
        let mut batch: Vec<RawMessage> = self
            .messages
            .iter()
            .filter(|m| m.timestamp > after)
            .cloned()
            .collect();
        batch.sort_by_key(|m| m.timestamp);
        Ok(batch)
    }
}

/// A source whose fetch always fails, for fatal-path tests.
pub struct FailingSource;

#[async_trait]
impl MessageSource for FailingSource {
    async fn fetch(&mut self, _group_id: i64, _after: DateTime<Utc>) -> Result<Vec<RawMessage>> {
        anyhow::bail!("connection reset by peer")
    }
}
