//! Declarative input documents
//!
//! These are the on-disk forms of the phase0 schema and the per-phase
//! transform rules. They are deliberately loose (types are plain strings);
//! conversion into the schema IR is where validation happens.

use serde::{Deserialize, Serialize};

/// Column declaration: `{name, type, length, description}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnDocument {
    pub name: String,

    #[serde(rename = "type")]
    pub data_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    #[serde(default)]
    pub description: String,
}

/// Full table declaration, used both by the phase0 schema and by
/// extension rules: `{description, tableName, owner, columns}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableDocument {
    #[serde(rename = "tableName")]
    pub table_name: String,

    #[serde(default)]
    pub description: String,

    pub owner: String,

    pub columns: Vec<ColumnDocument>,
}

/// Raw phase0 schema document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub name: String,

    pub version: String,

    #[serde(default)]
    pub tables: Vec<TableDocument>,
}

impl SchemaDocument {
    /// Parse a schema document from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Carry-forward rule for one source table
///
/// `{source_table, description, days, timestamp_column, exclude, expire_after_phase}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarryForwardRule {
    pub source_table: String,

    #[serde(default)]
    pub description: String,

    /// Retention window in days; absent means unlimited
    #[serde(default)]
    pub days: Option<u32>,

    #[serde(default)]
    pub timestamp_column: Option<String>,

    /// Columns removed from this phase onwards
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Phase after which the table is dropped entirely
    #[serde(default)]
    pub expire_after_phase: Option<u32>,

    /// New name for the table (drop + add)
    #[serde(default)]
    pub rename_to: Option<String>,
}

impl CarryForwardRule {
    /// A rule that carries `source_table` forward unchanged
    pub fn new(source_table: impl Into<String>) -> Self {
        Self {
            source_table: source_table.into(),
            description: String::new(),
            days: None,
            timestamp_column: None,
            exclude: Vec::new(),
            expire_after_phase: None,
            rename_to: None,
        }
    }

    /// Set excluded columns
    pub fn with_exclude(mut self, exclude: Vec<&str>) -> Self {
        self.exclude = exclude.into_iter().map(String::from).collect();
        self
    }

    /// Set retention window
    pub fn with_retention(mut self, days: u32, timestamp_column: impl Into<String>) -> Self {
        self.days = Some(days);
        self.timestamp_column = Some(timestamp_column.into());
        self
    }

    /// Set expiry phase
    pub fn with_expiry(mut self, expire_after_phase: u32) -> Self {
        self.expire_after_phase = Some(expire_after_phase);
        self
    }

    /// Set a new table name
    pub fn with_rename(mut self, rename_to: impl Into<String>) -> Self {
        self.rename_to = Some(rename_to.into());
        self
    }

    /// Whether the table is dropped when building phase `ordinal`
    pub fn is_expired_at(&self, ordinal: u32) -> bool {
        self.expire_after_phase.is_some_and(|after| ordinal > after)
    }
}
