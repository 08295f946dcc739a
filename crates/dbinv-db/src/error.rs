//! Error types for dbinv-db

use thiserror::Error;

/// Errors that can occur while fetching records
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// Failed to open or close the database connection
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// A fetched cell could not be decoded to a scalar value
    #[error("failed to decode column {column}: {reason}")]
    Decode {
        /// Column name
        column: String,
        /// Why decoding failed
        reason: String,
    },
}
