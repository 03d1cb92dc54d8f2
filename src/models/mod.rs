pub mod direction;
pub mod message;
pub mod record;

pub use direction::Direction;
pub use message::RawMessage;
pub use record::{normalize_symbol, SignalRecord, CANONICAL_TP_PERCENTS};
