use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::models::Direction;

static SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([A-Z0-9]+)[^\s/]*/USDT").unwrap());
static DIRECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(Long|Short)\b").unwrap());
static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Entry[^0-9]{0,10}(\d+\.\d+)").unwrap());
static TP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+)\s*\((\d+)% of profit\)").unwrap());
static HIT_PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Price[^0-9]{0,10}(\d+\.\d+)").unwrap());

/// Fields recognized in one message. Every field is independent and
/// optional; absence simply means the pattern did not match.
///
/// `symbol` keeps its parse-time "TOKEN/USDT" form. The separator is
/// stripped later, when a record is actually built for the dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFields {
    pub symbol: Option<String>,
    pub direction: Option<Direction>,
    pub entry: Option<f64>,
    /// Take-profit price per quoted profit percentage. A percent
    /// repeated within one message overwrites (last wins).
    pub tp: BTreeMap<u32, f64>,
    pub hit_price: Option<f64>,
}

impl ParsedFields {
    pub fn is_empty(&self) -> bool {
        self.symbol.is_none()
            && self.direction.is_none()
            && self.entry.is_none()
            && self.tp.is_empty()
            && self.hit_price.is_none()
    }
}

/// Extract whatever signal fields the text contains. Pure and total:
/// unrecognizable text yields empty fields, never an error.
pub fn parse(text: &str) -> ParsedFields {
    let mut fields = ParsedFields::default();

    if let Some(caps) = SYMBOL_RE.captures(text) {
        fields.symbol = Some(format!("{}/USDT", &caps[1]));
    }

    if let Some(caps) = DIRECTION_RE.captures(text) {
        fields.direction = Direction::from_token(&caps[1]);
    }

    if let Some(caps) = ENTRY_RE.captures(text) {
        fields.entry = caps[1].parse().ok();
    }

    for caps in TP_RE.captures_iter(text) {
        if let (Ok(price), Ok(percent)) = (caps[1].parse::<f64>(), caps[2].parse::<u32>()) {
            fields.tp.insert(percent, price);
        }
    }

    if let Some(caps) = HIT_PRICE_RE.captures(text) {
        fields.hit_price = caps[1].parse().ok();
    }

    fields
}
