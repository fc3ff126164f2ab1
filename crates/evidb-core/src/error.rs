use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The scorer was asked to score against an index with no document rows.
    #[error("Vector index is not initialized")]
    UninitializedIndex,

    #[error("Failed to load index artifacts: {0}")]
    IndexLoad(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
