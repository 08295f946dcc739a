//! dbinv-core: inventory materialization
//!
//! Decodes raw `inventory` table rows into host records and materializes
//! groups and per-host variables into an [`InventorySink`], with
//! deterministic precedence when the same variable name arrives from more
//! than one source.

pub mod error;
pub mod materializer;
pub mod record;
pub mod schema;
pub mod sink;
pub mod source;

pub use error::{BindingError, MaterializeError};
pub use materializer::populate;
pub use record::{GroupingKey, HostRecord, VAR_COLUMN};
pub use schema::{RESERVED_COLUMNS, TableSchema};
pub use sink::{GroupHandle, Inventory, InventorySink};
pub use source::BindingSource;
