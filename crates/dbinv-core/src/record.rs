//! Host records and grouping keys

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MaterializeError;

/// Attribute holding a host's serialized direct variable bindings
pub const VAR_COLUMN: &str = "var";

/// Host attribute whose value names a group the host belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingKey {
    /// The `hostgroup` column
    Hostgroup,
    /// The `domain` column
    Domain,
    /// The `env` column
    Env,
}

impl GroupingKey {
    /// All grouping keys in their fixed processing order.
    ///
    /// Categorized lookups run in this order, so when two keys return the
    /// same variable name the later key wins.
    pub const ALL: [GroupingKey; 3] = [GroupingKey::Hostgroup, GroupingKey::Domain, GroupingKey::Env];

    /// Column name for this key
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GroupingKey::Hostgroup => "hostgroup",
            GroupingKey::Domain => "domain",
            GroupingKey::Env => "env",
        }
    }
}

impl fmt::Display for GroupingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded row of the `inventory` table
///
/// Reserved metadata columns are already stripped; `attributes` holds
/// everything else, keyed by column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRecord {
    /// Unique hostname
    pub hostname: String,
    /// Remaining column values, keyed by column name
    pub attributes: BTreeMap<String, Value>,
}

impl HostRecord {
    /// Group name this host carries for a grouping key, if any.
    ///
    /// A null, missing, or empty value means the host has no membership for
    /// that key.
    #[must_use]
    pub fn grouping_value(&self, key: GroupingKey) -> Option<&str> {
        match self.attributes.get(key.as_str()) {
            Some(Value::String(name)) if !name.is_empty() => Some(name),
            _ => None,
        }
    }

    /// Decode the host's direct variable bindings from its `var` attribute.
    ///
    /// The payload must be a JSON object, either as a native JSON column
    /// value or as a string column containing JSON text. A missing
    /// attribute, a null, or an empty string means "no direct bindings".
    ///
    /// # Errors
    /// Returns [`MaterializeError::InvalidVarPayload`] when the payload is
    /// present but is not a JSON object.
    pub fn direct_bindings(&self) -> Result<BTreeMap<String, Value>, MaterializeError> {
        let payload = match self.attributes.get(VAR_COLUMN) {
            None | Some(Value::Null) => return Ok(BTreeMap::new()),
            Some(value) => value,
        };

        let parsed = match payload {
            Value::Object(map) => return Ok(map.clone().into_iter().collect()),
            Value::String(text) if text.trim().is_empty() => return Ok(BTreeMap::new()),
            Value::String(text) => {
                serde_json::from_str::<Value>(text).map_err(|e| MaterializeError::InvalidVarPayload {
                    host: self.hostname.clone(),
                    reason: e.to_string(),
                })?
            }
            other => {
                return Err(MaterializeError::InvalidVarPayload {
                    host: self.hostname.clone(),
                    reason: format!("expected a JSON object, got {other}"),
                });
            }
        };

        match parsed {
            Value::Object(map) => Ok(map.into_iter().collect()),
            Value::Null => Ok(BTreeMap::new()),
            other => Err(MaterializeError::InvalidVarPayload {
                host: self.hostname.clone(),
                reason: format!("expected a JSON object, got {other}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(attributes: &[(&str, Value)]) -> HostRecord {
        HostRecord {
            hostname: "web-01".to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_grouping_key_order_is_fixed() {
        let names: Vec<&str> = GroupingKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["hostgroup", "domain", "env"]);
    }

    #[test]
    fn test_grouping_value_skips_null_and_empty() {
        let rec = record(&[
            ("hostgroup", json!("web")),
            ("domain", Value::Null),
            ("env", json!("")),
        ]);
        assert_eq!(rec.grouping_value(GroupingKey::Hostgroup), Some("web"));
        assert_eq!(rec.grouping_value(GroupingKey::Domain), None);
        assert_eq!(rec.grouping_value(GroupingKey::Env), None);
    }

    #[test]
    fn test_direct_bindings_from_json_string() {
        let rec = record(&[("var", json!(r#"{"a": 1, "b": "two"}"#))]);
        let bindings = rec.direct_bindings().unwrap();
        assert_eq!(bindings.get("a"), Some(&json!(1)));
        assert_eq!(bindings.get("b"), Some(&json!("two")));
    }

    #[test]
    fn test_direct_bindings_from_native_object() {
        let rec = record(&[("var", json!({"a": true}))]);
        let bindings = rec.direct_bindings().unwrap();
        assert_eq!(bindings.get("a"), Some(&json!(true)));
    }

    #[test]
    fn test_direct_bindings_absent_or_empty() {
        assert!(record(&[]).direct_bindings().unwrap().is_empty());
        assert!(
            record(&[("var", Value::Null)])
                .direct_bindings()
                .unwrap()
                .is_empty()
        );
        assert!(
            record(&[("var", json!("  "))])
                .direct_bindings()
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_direct_bindings_rejects_malformed_payload() {
        let err = record(&[("var", json!("{not json"))])
            .direct_bindings()
            .unwrap_err();
        assert!(matches!(err, MaterializeError::InvalidVarPayload { .. }));

        let err = record(&[("var", json!("[1, 2]"))])
            .direct_bindings()
            .unwrap_err();
        assert!(matches!(err, MaterializeError::InvalidVarPayload { .. }));

        let err = record(&[("var", json!(42))]).direct_bindings().unwrap_err();
        assert!(matches!(err, MaterializeError::InvalidVarPayload { .. }));
    }
}
