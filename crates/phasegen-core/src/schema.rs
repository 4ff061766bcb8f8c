//! Schema IR: tables, columns and primitive types
//!
//! A [`Schema`] is an immutable snapshot of one phase. Tables are kept in a
//! `BTreeMap` so every artifact derived from a schema iterates in
//! lexicographic table order.

use crate::document::{ColumnDocument, SchemaDocument, TableDocument};
use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Primitive column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DataType {
    /// 32-bit integer
    Int,

    /// 64-bit integer
    BigInt,

    /// Fixed-point decimal with `scale` fractional digits
    Decimal { scale: u32 },

    /// String with a declared maximum length
    Varchar { length: u32 },

    /// Boolean
    Boolean,

    /// Timestamp without time zone
    Timestamp,
}

impl DataType {
    /// Resolve a document type string and length into a primitive type
    ///
    /// `varchar` and `decimal` require a length; every other type rejects one.
    pub fn parse(type_name: &str, length: Option<u32>) -> Result<Self, String> {
        let normalized = type_name.trim().to_ascii_lowercase();

        let parsed = match normalized.as_str() {
            "int" | "integer" | "smallint" => Self::Int,
            "bigint" => Self::BigInt,
            "boolean" | "bool" => Self::Boolean,
            "timestamp" | "datetime" => Self::Timestamp,
            "decimal" | "numeric" => {
                let scale = length.ok_or_else(|| {
                    format!("type '{}' requires a length (number of fractional digits)", type_name)
                })?;
                return Ok(Self::Decimal { scale });
            }
            "varchar" | "string" | "text" => {
                let length = length
                    .ok_or_else(|| format!("type '{}' requires a maximum length", type_name))?;
                if length == 0 {
                    return Err(format!("type '{}' requires a positive length", type_name));
                }
                return Ok(Self::Varchar { length });
            }
            _ => return Err(format!("unknown column type '{}'", type_name)),
        };

        if let Some(length) = length {
            return Err(format!(
                "type '{}' does not take a length (got {})",
                type_name, length
            ));
        }

        Ok(parsed)
    }

    /// Canonical document type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::BigInt => "bigint",
            Self::Decimal { .. } => "decimal",
            Self::Varchar { .. } => "varchar",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
        }
    }

    /// Length parameter, present only for varchar and decimal
    pub fn length(&self) -> Option<u32> {
        match self {
            Self::Decimal { scale } => Some(*scale),
            Self::Varchar { length } => Some(*length),
            _ => None,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int => write!(f, "INT"),
            Self::BigInt => write!(f, "BIGINT"),
            Self::Decimal { scale } => write!(f, "DECIMAL({})", scale),
            Self::Varchar { length } => write!(f, "VARCHAR({})", length),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::Timestamp => write!(f, "TIMESTAMP"),
        }
    }
}

/// A column in a table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Primitive type
    pub data_type: DataType,

    /// Human description
    #[serde(default)]
    pub description: String,

    /// Column did not exist unchanged in the previous phase
    pub newly_generated: bool,
}

impl Column {
    /// Create a new column, not newly generated
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            description: String::new(),
            newly_generated: false,
        }
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the newly-generated flag
    pub fn with_newly_generated(mut self, newly_generated: bool) -> Self {
        self.newly_generated = newly_generated;
        self
    }

    /// Build a column from its document form
    pub fn from_document(table: &str, doc: &ColumnDocument) -> Result<Self, SchemaError> {
        let data_type = DataType::parse(&doc.data_type, doc.length)
            .map_err(|message| SchemaError::column_validation(table, &doc.name, message))?;

        Ok(Self::new(doc.name.clone(), data_type).with_description(doc.description.clone()))
    }
}

/// Where a table in a phase came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// Present in the raw phase0 export
    Raw,

    /// Carried forward from the previous phase
    CarriedForward { from_phase: u32 },

    /// Introduced by an extension rule
    Extension { phase: u32 },

    /// Carried forward under a new name
    Renamed { from_table: String, from_phase: u32 },
}

impl Provenance {
    /// Whether a table with this provenance must be regenerated
    pub fn is_newly_generated(&self) -> bool {
        !matches!(self, Self::CarriedForward { .. })
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::CarriedForward { from_phase } => write!(f, "carried forward from phase{}", from_phase),
            Self::Extension { phase } => write!(f, "extension at phase{}", phase),
            Self::Renamed { from_table, from_phase } => {
                write!(f, "renamed from phase{}.{}", from_phase, from_table)
            }
        }
    }
}

/// Retention metadata attached by a carry-forward rule
///
/// Informational only: it never changes the column shape of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Retention {
    /// Retention window in days, `None` means unlimited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,

    /// Timestamp column the window is measured against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_column: Option<String>,

    /// Phase after which the table is dropped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_after_phase: Option<u32>,
}

/// A table in a phase schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name (unique within a schema)
    pub name: String,

    /// Human description
    #[serde(default)]
    pub description: String,

    /// Classification tag, propagated verbatim into generated bindings
    pub owner: String,

    /// Ordered columns; order fixes the positional record layout
    pub columns: Vec<Column>,

    /// Origin of this table
    pub provenance: Provenance,

    /// Retention metadata from a carry-forward rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention: Option<Retention>,
}

impl Table {
    /// Create an empty raw table
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            owner: owner.into(),
            columns: Vec::new(),
            provenance: Provenance::Raw,
            retention: None,
        }
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set columns
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Set provenance
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    /// Build a table from its document form
    ///
    /// Every column inherits the newly-generated status of `provenance`.
    pub fn from_document(doc: &TableDocument, provenance: Provenance) -> Result<Self, SchemaError> {
        let newly_generated = provenance.is_newly_generated();
        let columns = doc
            .columns
            .iter()
            .map(|c| Column::from_document(&doc.table_name, c).map(|c| c.with_newly_generated(newly_generated)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: doc.table_name.clone(),
            description: doc.description.clone(),
            owner: doc.owner.clone(),
            columns,
            provenance,
            retention: None,
        })
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Whether the table itself is newly generated
    pub fn newly_generated(&self) -> bool {
        self.provenance.is_newly_generated()
    }

    /// Table or any of its columns is newly generated
    ///
    /// This is the single predicate that decides regeneration versus
    /// pass-through copy.
    pub fn has_newly_generated_elements(&self) -> bool {
        self.newly_generated() || self.columns.iter().any(|c| c.newly_generated)
    }
}

/// A named, versioned snapshot of tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name
    pub name: String,

    /// Schema version string
    pub version: String,

    /// Tables keyed by name
    pub tables: BTreeMap<String, Table>,
}

impl Schema {
    /// Create a new empty schema
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            tables: BTreeMap::new(),
        }
    }

    /// Build the phase0 schema from a raw schema document
    pub fn from_document(doc: &SchemaDocument) -> Result<Self, SchemaError> {
        let mut schema = Self::new(doc.name.clone(), doc.version.clone());
        for table_doc in &doc.tables {
            schema.insert_table(Table::from_document(table_doc, Provenance::Raw)?)?;
        }
        Ok(schema)
    }

    /// Add a table, rejecting duplicate names
    pub fn insert_table(&mut self, table: Table) -> Result<(), SchemaError> {
        if self.tables.contains_key(&table.name) {
            return Err(SchemaError::DuplicateTable { table: table.name });
        }
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    /// Find a table by name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Tables in lexicographic order
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Table names in lexicographic order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(|k| k.as_str()).collect()
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the schema has no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Hex SHA-256 of the canonical JSON form
    ///
    /// Tables live in a `BTreeMap` and columns in declaration order, so equal
    /// schemas always serialize to the same bytes.
    pub fn fingerprint(&self) -> String {
        // Plain structs with string keys always serialize
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&canonical))
    }
}
