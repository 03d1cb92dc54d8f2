use thiserror::Error;

/// Fatal pipeline errors, tagged with the stage that failed.
///
/// Recoverable conditions never become values of this type: a missing
/// dataset file is treated as empty history, and malformed candidates
/// are dropped and counted in the run summary.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The message source could not be reached or refused the fetch.
    /// Nothing has been written when this is raised.
    #[error("message source unavailable: {0:#}")]
    SourceUnavailable(anyhow::Error),

    /// A backup, raw-batch, or dataset write failed. The dataset file
    /// itself is only ever replaced atomically, so it is never left
    /// half-written.
    #[error("persistence failed while {stage}: {source:#}")]
    Persistence {
        stage: &'static str,
        source: anyhow::Error,
    },
}
