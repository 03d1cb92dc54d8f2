use crate::extract::parser::ParsedFields;

/// What a parsed message turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// A fresh signal: entry plus at least one take-profit level.
    NewSignal,
    /// A follow-up on an existing signal: symbol and an observed price,
    /// but no entry.
    Update,
    /// Chatter, stickers, partial posts.
    Unclassified,
}

/// Assign a parsed message to exactly one category. NewSignal is
/// checked first, so a message satisfying both rules is a NewSignal.
pub fn classify(fields: &ParsedFields) -> Category {
    if fields.entry.is_some() && !fields.tp.is_empty() {
        Category::NewSignal
    } else if fields.symbol.is_some() && fields.entry.is_none() && fields.hit_price.is_some() {
        Category::Update
    } else {
        Category::Unclassified
    }
}
