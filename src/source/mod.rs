pub mod telegram;

pub use telegram::TelegramSource;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::RawMessage;

/// Where raw messages come from. One call yields the complete batch of
/// text messages posted to the group strictly after `after`, ascending
/// by timestamp. Paging is an implementation detail of the source; the
/// pipeline sees a single awaited call. A fresh call re-fetches from
/// `after` — batches are not resumable mid-way.
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn fetch(&mut self, group_id: i64, after: DateTime<Utc>) -> Result<Vec<RawMessage>>;
}
