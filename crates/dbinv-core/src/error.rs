//! Error types for dbinv-core

use thiserror::Error;

/// Errors that can occur while materializing an inventory
#[derive(Error, Debug, Clone)]
pub enum MaterializeError {
    /// A row's value count does not match the discovered column count
    #[error("row has {got} values but the schema has {expected} columns")]
    ColumnCountMismatch {
        /// Number of columns in the schema
        expected: usize,
        /// Number of values in the row
        got: usize,
    },

    /// A row has no usable hostname
    #[error("row has a missing or empty hostname")]
    MissingHostname,

    /// A host's `var` attribute could not be decoded
    #[error("invalid var payload for host {host}: {reason}")]
    InvalidVarPayload {
        /// Host the payload belongs to
        host: String,
        /// Why decoding failed
        reason: String,
    },

    /// A categorized-variable lookup failed
    #[error("categorized lookup failed for host {host}: {source}")]
    LookupFailed {
        /// Host being materialized when the lookup failed
        host: String,
        /// Underlying lookup error
        #[source]
        source: BindingError,
    },

    /// Wrapper raised at the population boundary
    #[error("inventory population failed: {0}")]
    PopulationFailed(#[source] Box<MaterializeError>),
}

/// Error returned by a [`crate::BindingSource`] lookup
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct BindingError(pub String);
