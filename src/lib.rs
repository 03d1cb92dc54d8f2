pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod source;
pub mod store;
#[cfg(test)]
pub mod test_helpers;
