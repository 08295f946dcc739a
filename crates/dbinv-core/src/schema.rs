//! Inventory table schema and row decoding

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MaterializeError;
use crate::record::HostRecord;

/// Metadata columns consumed during decoding and never exposed as host
/// attributes or variables
pub const RESERVED_COLUMNS: [&str; 4] = ["hostname", "uuid", "provision_status", "creation_time"];

/// Ordered column names of the `inventory` table, as discovered from the
/// database catalog (ordinal position order)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    columns: Vec<String>,
}

impl TableSchema {
    /// Create a schema from an ordered column-name list
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Column names in ordinal order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Decode one positional row into a [`HostRecord`].
    ///
    /// Values are zipped against the column list; `hostname` is pulled out
    /// as the record key and the reserved metadata columns are dropped.
    ///
    /// # Errors
    /// Fails when the row's value count does not match the column count, or
    /// when `hostname` is missing, null, or empty.
    pub fn decode(&self, values: &[Value]) -> Result<HostRecord, MaterializeError> {
        if values.len() != self.columns.len() {
            return Err(MaterializeError::ColumnCountMismatch {
                expected: self.columns.len(),
                got: values.len(),
            });
        }

        let mut hostname = None;
        let mut attributes = BTreeMap::new();

        for (column, value) in self.columns.iter().zip(values) {
            if column == "hostname" {
                match value {
                    Value::String(name) if !name.is_empty() => hostname = Some(name.clone()),
                    _ => return Err(MaterializeError::MissingHostname),
                }
            } else if !RESERVED_COLUMNS.contains(&column.as_str()) {
                attributes.insert(column.clone(), value.clone());
            }
        }

        let hostname = hostname.ok_or(MaterializeError::MissingHostname)?;
        Ok(HostRecord {
            hostname,
            attributes,
        })
    }
}
