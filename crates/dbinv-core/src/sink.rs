//! Inventory consumer capability surface and in-memory implementation

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::{Value, json};

/// Opaque handle to a registered group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupHandle(String);

impl GroupHandle {
    /// Create a handle for a group name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Group name this handle refers to
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Capability set exposed by the inventory consumer.
///
/// `set_variable` is last-write-wins for a (hostname, name) pair;
/// `add_group` is idempotent.
pub trait InventorySink: Send {
    /// Resolve or create a group by name
    fn add_group(&mut self, name: &str) -> GroupHandle;

    /// Register a host as a member of a group
    fn add_host(&mut self, hostname: &str, group: &GroupHandle);

    /// Assign a variable to a host, overwriting any existing binding with
    /// the same name
    fn set_variable(&mut self, hostname: &str, name: &str, value: Value);
}

/// In-memory inventory graph
///
/// Ordered maps throughout, so identical database content renders to
/// byte-identical output.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Inventory {
    /// Group name -> member hostnames
    groups: BTreeMap<String, BTreeSet<String>>,
    /// Hostname -> variable bindings
    hostvars: BTreeMap<String, BTreeMap<String, Value>>,
}

impl Inventory {
    /// Create an empty inventory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All groups with their members
    #[must_use]
    pub fn groups(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.groups
    }

    /// Members of one group, if it exists
    #[must_use]
    pub fn group_hosts(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.groups.get(name)
    }

    /// Variable bindings for one host, if any were assigned
    #[must_use]
    pub fn host_vars(&self, hostname: &str) -> Option<&BTreeMap<String, Value>> {
        self.hostvars.get(hostname)
    }

    /// All hostnames that appear in any group
    #[must_use]
    pub fn hosts(&self) -> BTreeSet<String> {
        self.groups.values().flatten().cloned().collect()
    }

    /// True when no groups and no variables have been registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.hostvars.is_empty()
    }

    /// Render as Ansible dynamic-inventory JSON: one object per group with
    /// a `hosts` list, plus `_meta.hostvars`
    #[must_use]
    pub fn to_ansible(&self) -> Value {
        let mut root = serde_json::Map::new();
        for (group, hosts) in &self.groups {
            root.insert(group.clone(), json!({ "hosts": hosts }));
        }
        root.insert("_meta".to_string(), json!({ "hostvars": &self.hostvars }));
        Value::Object(root)
    }
}

impl InventorySink for Inventory {
    fn add_group(&mut self, name: &str) -> GroupHandle {
        self.groups.entry(name.to_string()).or_default();
        GroupHandle::new(name)
    }

    fn add_host(&mut self, hostname: &str, group: &GroupHandle) {
        self.groups
            .entry(group.name().to_string())
            .or_default()
            .insert(hostname.to_string());
    }

    fn set_variable(&mut self, hostname: &str, name: &str, value: Value) {
        self.hostvars
            .entry(hostname.to_string())
            .or_default()
            .insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_group_is_idempotent() {
        let mut inv = Inventory::new();
        let first = inv.add_group("web");
        inv.add_host("web-01", &first);
        let second = inv.add_group("web");

        assert_eq!(first, second);
        assert_eq!(inv.groups().len(), 1);
        assert!(inv.group_hosts("web").unwrap().contains("web-01"));
    }

    #[test]
    fn test_set_variable_last_write_wins() {
        let mut inv = Inventory::new();
        inv.set_variable("web-01", "a", json!(1));
        inv.set_variable("web-01", "a", json!(2));

        assert_eq!(inv.host_vars("web-01").unwrap().get("a"), Some(&json!(2)));
    }

    #[test]
    fn test_to_ansible_shape() {
        let mut inv = Inventory::new();
        let group = inv.add_group("prod");
        inv.add_host("web-01", &group);
        inv.set_variable("web-01", "a", json!(1));

        let rendered = inv.to_ansible();
        assert_eq!(rendered["prod"]["hosts"], json!(["web-01"]));
        assert_eq!(rendered["_meta"]["hostvars"]["web-01"]["a"], json!(1));
    }

    #[test]
    fn test_empty_inventory_renders_meta_only() {
        let rendered = Inventory::new().to_ansible();
        assert_eq!(rendered, json!({ "_meta": { "hostvars": {} } }));
    }
}
