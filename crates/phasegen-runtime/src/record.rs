//! Uniform record access for generated table types

use crate::error::{FieldCoercionError, UnknownTableError};
use crate::value::FieldValue;
use std::collections::BTreeMap;

/// Record of any generated table
pub type DynRecord = Box<dyn TableRecord + Send + Sync>;

/// Decode one raw row into a boxed record
pub type DecodeFn = fn(&[&str]) -> Result<DynRecord, FieldCoercionError>;

/// Behaviour every generated record type provides
///
/// `field_names()` and `fields_as_ordered_values()` always have the same
/// length and follow column declaration order.
pub trait TableRecord: std::fmt::Debug {
    /// Source table name
    fn table_name(&self) -> &'static str;

    fn owner(&self) -> &'static str;

    fn field_names(&self) -> &'static [&'static str];

    fn fields_as_ordered_values(&self) -> Vec<FieldValue>;

    /// Field values keyed by name; key set equals `field_names()`
    fn fields_as_map(&self) -> BTreeMap<&'static str, FieldValue> {
        self.field_names()
            .iter()
            .copied()
            .zip(self.fields_as_ordered_values())
            .collect()
    }

    /// Raw text of every field, accepted back by `from_fields`
    fn to_raw_fields(&self) -> Vec<String> {
        self.fields_as_ordered_values().iter().map(FieldValue::to_raw).collect()
    }
}

/// Static description of one table in a phase registry
#[derive(Clone, Copy)]
pub struct TableDescriptor {
    pub name: &'static str,
    pub type_name: &'static str,
    pub owner: &'static str,
    pub field_names: &'static [&'static str],
    pub decode: DecodeFn,
}

impl TableDescriptor {
    pub fn decode(&self, fields: &[&str]) -> Result<DynRecord, FieldCoercionError> {
        (self.decode)(fields)
    }
}

impl std::fmt::Debug for TableDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableDescriptor")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("owner", &self.owner)
            .field("field_names", &self.field_names)
            .finish_non_exhaustive()
    }
}

/// Find a descriptor by source table name
pub fn find_descriptor(
    descriptors: &'static [TableDescriptor],
    name: &str,
) -> Result<&'static TableDescriptor, UnknownTableError> {
    descriptors
        .iter()
        .find(|d| d.name == name)
        .ok_or_else(|| UnknownTableError::new(name))
}

/// Enumeration of every table in one phase
pub trait TableRegistry: Sized + Copy + 'static {
    /// Every table, in lexicographic source-name order
    fn all() -> &'static [Self];

    fn source_name(&self) -> &'static str;

    fn descriptor(&self) -> &'static TableDescriptor;

    fn from_source_name(name: &str) -> Result<Self, UnknownTableError> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.source_name() == name)
            .ok_or_else(|| UnknownTableError::new(name))
    }

    fn decode(&self, fields: &[&str]) -> Result<DynRecord, FieldCoercionError> {
        self.descriptor().decode(fields)
    }
}
