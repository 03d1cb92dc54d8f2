use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction as announced in the channel. Serialized in its
/// capitalized message form ("Long"/"Short") so dataset rows match
/// the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "Long"),
            Direction::Short => write!(f, "Short"),
        }
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }

    /// Case-insensitive parse of a matched "Long"/"Short" token.
    pub fn from_token(token: &str) -> Option<Direction> {
        match token.to_ascii_lowercase().as_str() {
            "long" => Some(Direction::Long),
            "short" => Some(Direction::Short),
            _ => None,
        }
    }
}
