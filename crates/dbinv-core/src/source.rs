//! Categorized-variable lookup trait

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BindingError;
use crate::record::GroupingKey;

/// Source of categorized variable bindings.
///
/// One lookup per (host, grouping key) pair: `key` is the category type and
/// `description` is the host's value for that key. Implemented by the
/// database session; tests substitute an in-memory map.
#[async_trait]
pub trait BindingSource: Send {
    /// Fetch (variable name, value) pairs for one category.
    ///
    /// An empty result is normal and means no bindings are defined for the
    /// category.
    ///
    /// # Errors
    /// Returns [`BindingError`] when the underlying lookup fails.
    async fn categorized_bindings(
        &mut self,
        key: GroupingKey,
        description: &str,
    ) -> Result<Vec<(String, Value)>, BindingError>;
}
