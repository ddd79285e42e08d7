use thiserror::Error;

/// Errors surfaced by the data layer.
///
/// `Load` is fatal at startup. `EmptyResult` and `InvalidParameter` are
/// recoverable and are turned into "no data" messages by the UI.
#[derive(Debug, Error)]
pub enum DataError {
    /// The source file is missing, unreadable, or lacks required columns.
    #[error("failed to load dataset: {0:#}")]
    Load(anyhow::Error),

    /// A statistic or projection was asked for over zero rows.
    #[error("no structures match the current selection")]
    EmptyResult,

    /// Unknown column name, mistyped predicate, reversed or non-finite range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl DataError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        DataError::InvalidParameter(msg.into())
    }
}

pub type Result<T, E = DataError> = std::result::Result<T, E>;
