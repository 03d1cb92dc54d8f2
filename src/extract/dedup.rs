use chrono::{DateTime, Duration, Utc};

use crate::extract::parser::ParsedFields;
use crate::models::{normalize_symbol, SignalRecord, CANONICAL_TP_PERCENTS};

/// Numeric near-equality bound for entry and TP comparisons. Strict:
/// a difference of exactly 1e-4 does not count as equal.
const PRICE_EPSILON: f64 = 1e-4;

/// Decide whether a candidate new signal was already recorded.
///
/// The channel resends and re-edits the same signal with negligible
/// formatting drift, so exact-text matching undercounts. Instead the
/// history is filtered down by symbol, direction, entry within
/// PRICE_EPSILON, timestamp within `tolerance_minutes` (inclusive),
/// and each canonical TP level the candidate actually carries. Any
/// surviving row means duplicate.
///
/// A candidate with no entry is compared as if its entry were 0.0.
/// That mirrors the long-standing behavior of the extractor and can in
/// principle match a record with entry near zero; see DESIGN notes.
pub fn is_duplicate(
    candidate: &ParsedFields,
    timestamp: DateTime<Utc>,
    history: &[SignalRecord],
    tolerance_minutes: i64,
) -> bool {
    if history.is_empty() {
        return false;
    }

    // History rows carry normalized symbols; normalize the candidate's
    // parse-time form so a re-fetched signal still matches.
    let symbol = match candidate.symbol.as_deref() {
        Some(s) => normalize_symbol(s),
        // Without a symbol there is nothing meaningful to match.
        None => return false,
    };

    let entry = candidate.entry.unwrap_or(0.0);
    let tolerance = Duration::minutes(tolerance_minutes);

    history.iter().any(|row| {
        row.symbol == symbol
            && direction_matches(candidate, row)
            && (row.entry - entry).abs() < PRICE_EPSILON
            && (row.timestamp - timestamp).abs() <= tolerance
            && CANONICAL_TP_PERCENTS.iter().all(|&percent| {
                match (candidate.tp.get(&percent), row.tp(percent)) {
                    // A TP level the candidate does not quote is skipped,
                    // not held against the match.
                    (None, _) => true,
                    (Some(&cand_tp), Some(row_tp)) => (row_tp - cand_tp).abs() < PRICE_EPSILON,
                    (Some(_), None) => false,
                }
            })
    })
}

fn direction_matches(candidate: &ParsedFields, row: &SignalRecord) -> bool {
    match (candidate.direction, row.direction) {
        (Some(a), Some(b)) => a == b,
        // A side with no direction matches nothing.
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use crate::test_helpers::{complete_fields, record_from, ts};

    fn base_time() -> DateTime<Utc> {
        ts("2024-03-01T10:00:00Z")
    }

    #[test]
    fn empty_history_never_matches() {
        assert!(!is_duplicate(&complete_fields(), base_time(), &[], 60));
    }

    #[test]
    fn candidate_matches_its_own_record() {
        let fields = complete_fields();
        let history = vec![record_from(&fields, base_time())];
        assert!(is_duplicate(&fields, base_time(), &history, 60));
    }

    #[test]
    fn different_symbol_is_not_a_duplicate() {
        let fields = complete_fields();
        let mut row = record_from(&fields, base_time());
        row.symbol = "ETHUSDT".to_string();
        assert!(!is_duplicate(&fields, base_time(), &[row], 60));
    }

    #[test]
    fn different_direction_is_not_a_duplicate() {
        let fields = complete_fields();
        let mut row = record_from(&fields, base_time());
        row.direction = Some(Direction::Short);
        assert!(!is_duplicate(&fields, base_time(), &[row], 60));
    }

    #[test]
    fn missing_candidate_direction_matches_nothing() {
        let mut fields = complete_fields();
        let history = vec![record_from(&fields, base_time())];
        fields.direction = None;
        assert!(!is_duplicate(&fields, base_time(), &history, 60));
    }

    #[test]
    fn entry_tolerance_is_strictly_below_epsilon() {
        let fields = complete_fields();
        let mut row = record_from(&fields, base_time());

        row.entry = fields.entry.unwrap() + 0.0001;
        assert!(
            !is_duplicate(&fields, base_time(), &[row.clone()], 60),
            "difference of exactly 1e-4 must not match"
        );

        row.entry = fields.entry.unwrap() + 0.00005;
        assert!(
            is_duplicate(&fields, base_time(), &[row], 60),
            "difference of 5e-5 must match"
        );
    }

    #[test]
    fn timestamp_tolerance_is_inclusive() {
        let fields = complete_fields();
        let row = record_from(&fields, base_time());

        let exactly_at = base_time() + Duration::minutes(60);
        assert!(is_duplicate(&fields, exactly_at, &[row.clone()], 60));

        let one_second_past = exactly_at + Duration::seconds(1);
        assert!(!is_duplicate(&fields, one_second_past, &[row], 60));
    }

    #[test]
    fn candidate_missing_a_tp_skips_that_comparison() {
        let fields = complete_fields();
        let mut row = record_from(&fields, base_time());
        // The stored row has a different tp_80, but the candidate does
        // not quote 80%, so it still matches.
        row.tp_80 = 999.0;
        let mut partial = fields.clone();
        partial.tp.remove(&80);
        assert!(is_duplicate(&partial, base_time(), &[row], 60));
    }

    #[test]
    fn tp_mismatch_on_a_quoted_level_breaks_the_match() {
        let fields = complete_fields();
        let mut row = record_from(&fields, base_time());
        row.tp_60 += 0.5;
        assert!(!is_duplicate(&fields, base_time(), &[row], 60));
    }

    #[test]
    fn missing_entry_compares_as_zero() {
        // Preserved incidental behavior: an entry-less candidate can
        // match a row whose entry is (near) zero.
        let mut fields = complete_fields();
        fields.entry = None;
        let mut row = record_from(&complete_fields(), base_time());
        row.entry = 0.0;
        assert!(is_duplicate(&fields, base_time(), &[row], 60));
    }
}
