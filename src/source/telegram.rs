use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::models::RawMessage;
use crate::source::MessageSource;

const BASE_URL: &str = "https://api.telegram.org";
const PAGE_LIMIT: usize = 100;
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
    channel_post: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    date: i64,
    chat: Chat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

/// Bot-API message source. Pages through pending updates until the
/// backlog is drained, keeps only text posts from the configured
/// group, and returns them as one chronologically ascending batch.
pub struct TelegramSource {
    client: Client,
    bot_token: String,
    last_request: Option<Instant>,
}

impl TelegramSource {
    pub fn new(bot_token: &str) -> Self {
        Self {
            client: Client::new(),
            bot_token: bot_token.to_string(),
            last_request: None,
        }
    }

    async fn rate_limit(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < MIN_REQUEST_INTERVAL {
                tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    async fn get_updates(&mut self, offset: Option<i64>) -> Result<Vec<Update>> {
        self.rate_limit().await;

        let url = format!("{}/bot{}/getUpdates", BASE_URL, self.bot_token);

        let mut query = vec![
            ("limit", PAGE_LIMIT.to_string()),
            ("timeout", "0".to_string()),
            (
                "allowed_updates",
                "[\"message\",\"channel_post\"]".to_string(),
            ),
        ];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let resp = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("Failed to reach Telegram")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Telegram API error {}: {}", status, body);
        }

        let data: UpdatesResponse = resp
            .json()
            .await
            .context("Failed to parse getUpdates response")?;
        if !data.ok {
            anyhow::bail!("Telegram API returned ok=false");
        }

        Ok(data.result)
    }
}

#[async_trait]
impl MessageSource for TelegramSource {
    async fn fetch(&mut self, group_id: i64, after: DateTime<Utc>) -> Result<Vec<RawMessage>> {
        let mut messages = Vec::new();
        let mut offset: Option<i64> = None;
        let mut pages = 0usize;

        loop {
            let updates = self.get_updates(offset).await?;
            if updates.is_empty() {
                break;
            }
            pages += 1;

            let page_len = updates.len();
            for update in updates {
                offset = Some(update.update_id + 1);

                let msg = match update.channel_post.or(update.message) {
                    Some(m) => m,
                    None => continue,
                };
                if msg.chat.id != group_id {
                    continue;
                }
                let text = match msg.text {
                    Some(t) if !t.is_empty() => t,
                    _ => continue,
                };
                let timestamp = match DateTime::from_timestamp(msg.date, 0) {
                    Some(ts) => ts,
                    None => continue,
                };
                if timestamp > after {
                    messages.push(RawMessage { text, timestamp });
                }
            }

            if page_len < PAGE_LIMIT {
                break;
            }
        }

        messages.sort_by_key(|m| m.timestamp);
        debug!("Drained {} update page(s) from Telegram", pages);

        Ok(messages)
    }
}
