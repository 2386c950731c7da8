use thiserror::Error;

/// Operation-level failures surfaced to callers.
///
/// Data-quality problems in individual stored rows are deliberately not
/// represented here: a row that fails to decode is skipped with a warning and
/// the surrounding query completes with partial results.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing input, rejected before any store interaction.
    #[error("{0}")]
    Validation(String),

    /// The targeted log entry does not exist in the live set.
    #[error("log entry not found")]
    NotFound,

    /// An underlying store call failed. Propagated unchanged; no automatic
    /// retry is attempted.
    #[error("storage error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Database worker or other infrastructure failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
