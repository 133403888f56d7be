use crate::codec::CodecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("vector database request {operation} failed: {source}")]
    Http {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("vector database rejected {operation} with status {status}: {body}")]
    Api {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("vector of {actual} dimensions does not fit collection of {expected}")]
    InvalidVectorDimensions { expected: usize, actual: usize },

    #[error("document database failure: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to convert document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid collection name {0:?}")]
    InvalidCollectionName(String),

    #[error("failed to prepare document database location: {0}")]
    Io(#[from] std::io::Error),
}
