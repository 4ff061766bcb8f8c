//! Phases and their storage locations

use crate::schema::Schema;
use serde::{Deserialize, Serialize};

/// Opaque storage location of a phase's data
///
/// The meaning of the identifier belongs to the storage collaborator; it is
/// only ever joined with a table name and passed through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageLocation(String);

impl StorageLocation {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Location of one table's data within this phase
    pub fn table(&self, table: &str) -> String {
        format!("{}/{}", self.0, table)
    }
}

impl std::fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One resolved phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Phase ordinal (0 is the raw export)
    pub ordinal: u32,

    /// Resolved schema
    pub schema: Schema,

    /// Where this phase's data lives
    pub location: StorageLocation,
}

impl Phase {
    pub fn new(ordinal: u32, schema: Schema, location: StorageLocation) -> Self {
        Self {
            ordinal,
            schema,
            location,
        }
    }

    /// Module name used for this phase in generated code
    pub fn module_name(&self) -> String {
        format!("phase{}", self.ordinal)
    }
}
