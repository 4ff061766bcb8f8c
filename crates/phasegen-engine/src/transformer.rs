//! Schema transformer: builds phase N from phase N-1 and the phase's rules
//!
//! The transformer is a pure function. Tables are visited in name order and
//! extension rules are sorted before they are applied, so the resulting
//! schema never depends on the order rules were authored or loaded in.

use crate::marking::{mark_carried, mark_extension, mark_renamed};
use phasegen_core::{
    CarryForwardRule, DataType, PhaseRules, Provenance, Retention, Schema, SchemaError, Table,
    TableDocument,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Applies transform rules to produce successive phase schemas
pub struct SchemaTransformer;

impl SchemaTransformer {
    /// Build phase `ordinal` from `previous` using a complete rule set
    pub fn apply(ordinal: u32, previous: &Schema, rules: &PhaseRules) -> Result<Schema, SchemaError> {
        Self::build_phase(ordinal, previous, &rules.carry_forward, &rules.extensions)
    }

    /// Build phase `ordinal` from `previous`
    ///
    /// 1. Every table of `previous` is carried forward: excluded columns are
    ///    removed, retention metadata attached, expired tables dropped and
    ///    renamed tables re-added under their new name.
    /// 2. Every extension rule adds a wholly new table.
    ///
    /// Fails with [`SchemaError::Conflict`] when an extension rule names a
    /// table of `previous`, and with [`SchemaError::DuplicateTable`] when two
    /// declarations produce the same name.
    pub fn build_phase(
        ordinal: u32,
        previous: &Schema,
        carry_forward: &BTreeMap<String, CarryForwardRule>,
        extensions: &[TableDocument],
    ) -> Result<Schema, SchemaError> {
        let from_phase = ordinal.saturating_sub(1);

        let mut sorted_extensions: Vec<&TableDocument> = extensions.iter().collect();
        sorted_extensions.sort_by(|a, b| a.table_name.cmp(&b.table_name));

        let mut extension_names = BTreeSet::new();
        for ext in &sorted_extensions {
            if !extension_names.insert(ext.table_name.as_str()) {
                return Err(SchemaError::DuplicateTable {
                    table: ext.table_name.clone(),
                });
            }
        }

        for (source, rule) in carry_forward {
            if previous.table(source).is_none() {
                return Err(SchemaError::validation(
                    source.clone(),
                    format!("carry-forward rule references a table that does not exist in phase{}", from_phase),
                ));
            }
            if let Some(target) = &rule.rename_to {
                if previous.table(target).is_some() || extension_names.contains(target.as_str()) {
                    return Err(SchemaError::Conflict { table: target.clone() });
                }
            }
        }

        let mut schema = Schema::new(previous.name.clone(), previous.version.clone());

        for table in previous.tables() {
            if extension_names.contains(table.name.as_str()) {
                return Err(SchemaError::Conflict {
                    table: table.name.clone(),
                });
            }

            let carried = match carry_forward.get(&table.name) {
                None => mark_carried(table, from_phase),
                Some(rule) if rule.is_expired_at(ordinal) => {
                    debug!(phase = ordinal, table = %table.name, "table expired");
                    continue;
                }
                Some(rule) => Self::carry_with_rule(table, rule, from_phase)?,
            };

            debug!(
                phase = ordinal,
                table = %carried.name,
                columns = carried.columns.len(),
                provenance = %carried.provenance,
                "carried table"
            );
            schema.insert_table(carried)?;
        }

        for ext in sorted_extensions {
            let table = Table::from_document(ext, Provenance::Extension { phase: ordinal })?;
            debug!(phase = ordinal, table = %table.name, "extension table");
            schema.insert_table(mark_extension(table, ordinal))?;
        }

        Ok(schema)
    }

    /// Apply a single carry-forward rule to a table that has not expired
    fn carry_with_rule(table: &Table, rule: &CarryForwardRule, from_phase: u32) -> Result<Table, SchemaError> {
        for excluded in &rule.exclude {
            if table.find_column(excluded).is_none() {
                return Err(SchemaError::column_validation(
                    &table.name,
                    excluded,
                    "excluded column does not exist",
                ));
            }
        }

        let mut carried = mark_carried(table, from_phase);
        carried.columns.retain(|c| !rule.exclude.contains(&c.name));

        if carried.columns.is_empty() {
            return Err(SchemaError::validation(
                &table.name,
                "carry-forward rule excludes every column",
            ));
        }

        if rule.days.is_some() && rule.timestamp_column.is_none() {
            return Err(SchemaError::validation(
                &table.name,
                "a retention window requires a timestamp_column",
            ));
        }

        if let Some(ts) = &rule.timestamp_column {
            match carried.find_column(ts) {
                Some(column) if column.data_type == DataType::Timestamp => {}
                Some(column) => {
                    return Err(SchemaError::column_validation(
                        &table.name,
                        ts,
                        format!("retention column must be a timestamp, found {}", column.data_type),
                    ))
                }
                None => {
                    return Err(SchemaError::column_validation(
                        &table.name,
                        ts,
                        "retention column is missing or excluded",
                    ))
                }
            }
        }

        if rule.days.is_some() || rule.timestamp_column.is_some() || rule.expire_after_phase.is_some() {
            carried.retention = Some(Retention {
                days: rule.days,
                timestamp_column: rule.timestamp_column.clone(),
                expire_after_phase: rule.expire_after_phase,
            });
        }

        if !rule.description.is_empty() {
            carried.description = rule.description.clone();
        }

        Ok(match &rule.rename_to {
            Some(new_name) => mark_renamed(&carried, new_name, from_phase),
            None => carried,
        })
    }
}
