//! Newly-generated marking and structural diffs
//!
//! The marking policy:
//! - a table carried forward is not newly generated, and neither are its
//!   surviving columns (they are no longer "new" once they have survived a
//!   phase);
//! - excluding columns does NOT make the owning table newly generated;
//! - extension tables and renamed tables are newly generated, table and
//!   every column.
//!
//! `Table::has_newly_generated_elements` is the only predicate downstream
//! consumers honor when choosing regeneration over pass-through copy.

use phasegen_core::{
    Column, DataType, Diagnostic, DiagnosticCode, Provenance, Schema, Severity, Table,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Carry `table` forward from phase `from_phase`
pub fn mark_carried(table: &Table, from_phase: u32) -> Table {
    let mut carried = table.clone();
    carried.provenance = Provenance::CarriedForward { from_phase };
    carried.retention = None;
    for column in &mut carried.columns {
        column.newly_generated = false;
    }
    carried
}

/// Mark a freshly declared table as newly generated at `phase`
pub fn mark_extension(mut table: Table, phase: u32) -> Table {
    table.provenance = Provenance::Extension { phase };
    for column in &mut table.columns {
        column.newly_generated = true;
    }
    table
}

/// Re-home `table` under `new_name`; a rename is a drop plus an add
pub fn mark_renamed(table: &Table, new_name: &str, from_phase: u32) -> Table {
    let mut renamed = table.clone();
    renamed.provenance = Provenance::Renamed {
        from_table: table.name.clone(),
        from_phase,
    };
    renamed.name = new_name.to_string();
    for column in &mut renamed.columns {
        column.newly_generated = true;
    }
    renamed
}

/// A column-level difference between two versions of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum ColumnChange {
    Added { column: String, data_type: DataType },
    Removed { column: String, data_type: DataType },
    Retyped { column: String, from: DataType, to: DataType },
}

impl ColumnChange {
    pub fn column(&self) -> &str {
        match self {
            Self::Added { column, .. } | Self::Removed { column, .. } | Self::Retyped { column, .. } => column,
        }
    }
}

impl std::fmt::Display for ColumnChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added { column, data_type } => write!(f, "+ {} {}", column, data_type),
            Self::Removed { column, data_type } => write!(f, "- {} {}", column, data_type),
            Self::Retyped { column, from, to } => write!(f, "~ {} {} -> {}", column, from, to),
        }
    }
}

/// Compare the columns of two versions of a table, in column order
pub fn diff_columns(previous: &Table, current: &Table) -> Vec<ColumnChange> {
    let previous_cols: HashMap<&str, &Column> =
        previous.columns.iter().map(|c| (c.name.as_str(), c)).collect();
    let current_names: BTreeSet<&str> = current.columns.iter().map(|c| c.name.as_str()).collect();
    let mut changes = Vec::new();

    for column in &previous.columns {
        if !current_names.contains(column.name.as_str()) {
            changes.push(ColumnChange::Removed {
                column: column.name.clone(),
                data_type: column.data_type,
            });
        }
    }

    for column in &current.columns {
        match previous_cols.get(column.name.as_str()) {
            None => changes.push(ColumnChange::Added {
                column: column.name.clone(),
                data_type: column.data_type,
            }),
            Some(prev) if prev.data_type != column.data_type => changes.push(ColumnChange::Retyped {
                column: column.name.clone(),
                from: prev.data_type,
                to: column.data_type,
            }),
            Some(_) => {}
        }
    }

    changes
}

/// How a table moved between two phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    /// New in the destination phase (extension or rename target)
    Added,
    /// Present only in the source phase (expired or renamed away)
    Dropped,
    /// Present in both with a different column set
    Reshaped,
    /// Present in both with an identical column set
    Unchanged,
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Dropped => write!(f, "dropped"),
            Self::Reshaped => write!(f, "reshaped"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// Per-table outcome of a phase transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableChange {
    pub table: String,
    pub status: TableStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnChange>,
    /// Must be regenerated (false means pass-through copy; dropped tables are neither)
    pub regenerate: bool,
}

/// Structural diff between two adjacent phases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDiff {
    pub from_phase: u32,
    pub to_phase: u32,
    /// Changes in lexicographic table order
    pub changes: Vec<TableChange>,
}

impl PhaseDiff {
    /// Diff `current` (phase `to_phase`) against `previous` (phase `to_phase - 1`)
    pub fn between(previous: &Schema, current: &Schema, to_phase: u32) -> Self {
        let names: BTreeSet<&str> = previous
            .tables
            .keys()
            .chain(current.tables.keys())
            .map(|k| k.as_str())
            .collect();

        let changes = names
            .into_iter()
            .map(|name| match (previous.table(name), current.table(name)) {
                (Some(prev), Some(cur)) => {
                    let columns = diff_columns(prev, cur);
                    let status = if columns.is_empty() {
                        TableStatus::Unchanged
                    } else {
                        TableStatus::Reshaped
                    };
                    TableChange {
                        table: name.to_string(),
                        status,
                        provenance: Some(cur.provenance.clone()),
                        columns,
                        regenerate: cur.has_newly_generated_elements(),
                    }
                }
                (None, Some(cur)) => TableChange {
                    table: name.to_string(),
                    status: TableStatus::Added,
                    provenance: Some(cur.provenance.clone()),
                    columns: Vec::new(),
                    regenerate: cur.has_newly_generated_elements(),
                },
                (Some(_), None) | (None, None) => TableChange {
                    table: name.to_string(),
                    status: TableStatus::Dropped,
                    provenance: None,
                    columns: Vec::new(),
                    regenerate: false,
                },
            })
            .collect();

        Self {
            from_phase: to_phase.saturating_sub(1),
            to_phase,
            changes,
        }
    }

    /// Tables that require regeneration
    pub fn regenerated(&self) -> Vec<&str> {
        self.changes
            .iter()
            .filter(|c| c.regenerate)
            .map(|c| c.table.as_str())
            .collect()
    }

    /// Tables that pass through unchanged
    pub fn copied(&self) -> Vec<&str> {
        self.changes
            .iter()
            .filter(|c| !c.regenerate && c.status != TableStatus::Dropped)
            .map(|c| c.table.as_str())
            .collect()
    }

    /// Check if the transition changes anything structurally
    pub fn has_changes(&self) -> bool {
        self.changes.iter().any(|c| c.status != TableStatus::Unchanged)
    }

    /// Informational diagnostics describing the transition
    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for change in &self.changes {
            let (code, message) = match (&change.status, &change.provenance) {
                (TableStatus::Added, Some(Provenance::Renamed { from_table, .. })) => (
                    DiagnosticCode::PhaseTableRenamed,
                    format!("Table '{}' renamed from '{}'", change.table, from_table),
                ),
                (TableStatus::Added, _) => (
                    DiagnosticCode::PhaseTableAdded,
                    format!("Table '{}' added", change.table),
                ),
                (TableStatus::Dropped, _) => (
                    DiagnosticCode::PhaseTableDropped,
                    format!("Table '{}' dropped", change.table),
                ),
                (TableStatus::Reshaped, _) => (
                    DiagnosticCode::PhaseTableReshaped,
                    format!(
                        "Table '{}' reshaped: {}",
                        change.table,
                        change.columns.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ")
                    ),
                ),
                (TableStatus::Unchanged, _) => (
                    DiagnosticCode::PhaseTableCarried,
                    format!("Table '{}' carried forward unchanged", change.table),
                ),
            };

            diagnostics.push(
                Diagnostic::new(code, Severity::Info, message)
                    .with_phase(self.to_phase)
                    .with_table(change.table.clone()),
            );
        }

        diagnostics
    }
}
