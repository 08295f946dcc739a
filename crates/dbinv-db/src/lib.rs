//! dbinv-db: record fetching from MySQL
//!
//! Wraps a single `sqlx` MySQL connection in an explicit [`DbSession`]
//! passed to each stage: column discovery from the catalog, the `inventory`
//! table scan, and the parameterized categorized-variable lookup.

pub mod error;
pub mod queries;
pub mod session;

pub use error::FetchError;
pub use session::{DbConfig, DbSession};
