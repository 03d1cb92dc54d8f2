pub mod classify;
pub mod dedup;
pub mod parser;

pub use classify::{classify, Category};
pub use dedup::is_duplicate;
pub use parser::{parse, ParsedFields};
