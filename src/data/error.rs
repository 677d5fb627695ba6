//! Error types for dataset operations.

/// Result type for dataset operations.
pub type DataResult<T> = Result<T, DataError>;

/// Error type for dataset loading, filtering, and aggregation.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// The data source could not be read. Terminal: the dashboard cannot
    /// start without its dataset and there is no retry.
    #[error("Failed to load dataset: {message}")]
    Load { message: String },

    /// A scope value was neither the sentinel nor a known state. Caller
    /// contract violation; fail fast rather than return an empty table.
    #[error("Unknown scope: {0}")]
    InvalidScope(String),

    /// A selection parameter was out of contract (e.g. top-N out of range).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A requested column is not part of the table's measure columns.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

impl DataError {
    /// Create a load error.
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
        }
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::load(err.to_string())
    }
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        DataError::load(err.to_string())
    }
}
