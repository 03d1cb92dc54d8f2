use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw message pulled from the channel. Timestamps serialize as
/// ISO-8601 so the raw batch artifact stays readable and replayable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}
