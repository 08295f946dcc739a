//! SQL statements for inventory fetching
//!
//! Everything host-supplied goes through bound `?` placeholders, never
//! string interpolation.

/// Name of the inventory table
pub const INVENTORY_TABLE: &str = "inventory";

/// Default full scan of the inventory table, used when the configuration
/// does not supply its own query string
pub const INVENTORY_SCAN: &str = "SELECT * FROM inventory";

/// Ordered column discovery from the catalog. Binds: table name.
pub const INVENTORY_COLUMNS: &str = "SELECT COLUMN_NAME FROM INFORMATION_SCHEMA.COLUMNS \
     WHERE TABLE_NAME = ? AND TABLE_SCHEMA = DATABASE() \
     ORDER BY ORDINAL_POSITION";

/// Categorized variable lookup. Binds: category type, category description.
pub const CATEGORIZED_BINDINGS: &str = "SELECT v.name, p.value FROM parameters AS p \
     JOIN categories AS c ON p.category_id = c.id \
     JOIN variables AS v ON p.var_id = v.id \
     WHERE c.type = ? AND c.description = ?";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_uses_placeholders_only() {
        assert_eq!(CATEGORIZED_BINDINGS.matches('?').count(), 2);
        assert!(!CATEGORIZED_BINDINGS.contains('\''));
    }

    #[test]
    fn test_column_discovery_is_ordered() {
        assert!(INVENTORY_COLUMNS.contains("ORDER BY ORDINAL_POSITION"));
        assert_eq!(INVENTORY_COLUMNS.matches('?').count(), 1);
    }
}
