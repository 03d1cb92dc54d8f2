use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::parser::ParsedFields;
use crate::models::Direction;

/// The four profit percentages a complete signal must quote.
pub const CANONICAL_TP_PERCENTS: [u32; 4] = [40, 60, 80, 100];

/// One persisted dataset row. Immutable once written; the dataset is
/// only ever rewritten in full, never patched in place.
///
/// Direction is optional: the channel occasionally posts a complete
/// signal without a Long/Short word, and those rows are kept with an
/// empty direction cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub symbol: String,
    pub direction: Option<Direction>,
    pub entry: f64,
    pub tp_40: f64,
    pub tp_60: f64,
    pub tp_80: f64,
    pub tp_100: f64,
    pub timestamp: DateTime<Utc>,
}

impl SignalRecord {
    /// Build a persistable record from parsed fields. Returns None when
    /// symbol, entry, or any of the four canonical TP levels is missing;
    /// such candidates are dropped before merge.
    pub fn from_fields(fields: &ParsedFields, timestamp: DateTime<Utc>) -> Option<SignalRecord> {
        let symbol = fields.symbol.as_deref().map(normalize_symbol)?;
        Some(SignalRecord {
            symbol,
            direction: fields.direction,
            entry: fields.entry?,
            tp_40: fields.tp.get(&40).copied()?,
            tp_60: fields.tp.get(&60).copied()?,
            tp_80: fields.tp.get(&80).copied()?,
            tp_100: fields.tp.get(&100).copied()?,
            timestamp,
        })
    }

    /// Stored TP price for one of the canonical percentages.
    pub fn tp(&self, percent: u32) -> Option<f64> {
        match percent {
            40 => Some(self.tp_40),
            60 => Some(self.tp_60),
            80 => Some(self.tp_80),
            100 => Some(self.tp_100),
            _ => None,
        }
    }
}

/// Merge-time symbol normalization: strip the pair separator and
/// uppercase, e.g. "btc/USDT" -> "BTCUSDT".
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.replace('/', "").to_uppercase()
}
