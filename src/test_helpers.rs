use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::extract::parser::ParsedFields;
use crate::models::{Direction, SignalRecord};

/// Parse an RFC-3339 timestamp for fixtures.
pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// A fully populated NewSignal candidate: BTC/USDT Long, entry 100,
/// TPs 101/102/103/104 at 40/60/80/100%.
pub fn complete_fields() -> ParsedFields {
    let mut tp = BTreeMap::new();
    tp.insert(40, 101.0);
    tp.insert(60, 102.0);
    tp.insert(80, 103.0);
    tp.insert(100, 104.0);
    ParsedFields {
        symbol: Some("BTC/USDT".to_string()),
        direction: Some(Direction::Long),
        entry: Some(100.0),
        tp,
        hit_price: None,
    }
}

/// The dataset row a candidate would persist as.
pub fn record_from(fields: &ParsedFields, timestamp: DateTime<Utc>) -> SignalRecord {
    SignalRecord::from_fields(fields, timestamp).expect("fixture fields must be complete")
}

/// A complete row with evenly spaced TP levels above `entry`.
pub fn sample_record(symbol: &str, entry: f64, timestamp: DateTime<Utc>) -> SignalRecord {
    SignalRecord {
        symbol: symbol.to_string(),
        direction: Some(Direction::Long),
        entry,
        tp_40: entry + 1.0,
        tp_60: entry + 2.0,
        tp_80: entry + 3.0,
        tp_100: entry + 4.0,
        timestamp,
    }
}

/// Fresh per-test directory under the system temp dir.
pub fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "signal_extractor_{}_{}",
        label,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
