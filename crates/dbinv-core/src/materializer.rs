//! Row-set to inventory materialization
//!
//! Two phases: decode every row up front, then register groups, hosts, and
//! variables. A decode or parse failure aborts before anything is written
//! to the sink, so a failed run never leaves a partially populated
//! inventory behind.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::error::MaterializeError;
use crate::record::{GroupingKey, HostRecord};
use crate::schema::TableSchema;
use crate::sink::InventorySink;
use crate::source::BindingSource;

/// Materialize a fetched row set into the inventory sink.
///
/// Hosts are processed in deterministic hostname order. For each host:
/// group and host registration per populated grouping key, then direct
/// bindings from the `var` attribute, then one categorized lookup per
/// populated key in the fixed `hostgroup`, `domain`, `env` order. Later
/// writes overwrite earlier bindings of the same name.
///
/// # Errors
/// Any failure is wrapped in [`MaterializeError::PopulationFailed`] with
/// the cause attached; the run is never partially recovered.
#[instrument(skip_all, fields(rows = rows.len()))]
pub async fn populate(
    schema: &TableSchema,
    rows: &[Vec<Value>],
    source: &mut dyn BindingSource,
    sink: &mut dyn InventorySink,
) -> Result<(), MaterializeError> {
    populate_inner(schema, rows, source, sink)
        .await
        .map_err(|e| MaterializeError::PopulationFailed(Box::new(e)))
}

async fn populate_inner(
    schema: &TableSchema,
    rows: &[Vec<Value>],
    source: &mut dyn BindingSource,
    sink: &mut dyn InventorySink,
) -> Result<(), MaterializeError> {
    // Phase 1: decode everything before touching the sink. A duplicate
    // hostname replaces the earlier record, matching row-scan semantics.
    let mut records: BTreeMap<String, (HostRecord, BTreeMap<String, Value>)> = BTreeMap::new();
    for row in rows {
        let record = schema.decode(row)?;
        let direct = record.direct_bindings()?;
        records.insert(record.hostname.clone(), (record, direct));
    }

    // Phase 2: register and assign.
    for (hostname, (record, direct)) in &records {
        for key in GroupingKey::ALL {
            if let Some(group) = record.grouping_value(key) {
                let handle = sink.add_group(group);
                sink.add_host(hostname, &handle);
            }
        }

        for (name, value) in direct {
            sink.set_variable(hostname, name, value.clone());
        }

        for key in GroupingKey::ALL {
            let Some(description) = record.grouping_value(key) else {
                continue;
            };
            let bindings = source
                .categorized_bindings(key, description)
                .await
                .map_err(|e| MaterializeError::LookupFailed {
                    host: hostname.clone(),
                    source: e,
                })?;
            for (name, value) in bindings {
                sink.set_variable(hostname, &name, value);
            }
        }

        debug!(host = %hostname, "host materialized");
    }

    info!(hosts = records.len(), "inventory populated");
    Ok(())
}
