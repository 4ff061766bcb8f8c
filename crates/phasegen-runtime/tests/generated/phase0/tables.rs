// @generated by phasegen from schema canvas 1.0. Do not edit.
//! Table registry for phase0

use phasegen_runtime::{DynRecord, FieldCoercionError, TableDescriptor, TableRegistry, UnknownTableError};

/// Tables the identity subsystem treats as identity tables
pub const IDENTITY_TABLES: &[&str] = &["users"];

/// Every table in phase0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhaseTable {
    People,
    Users,
}

static DESCRIPTORS: [TableDescriptor; 2] = [
    TableDescriptor {
        name: "people",
        type_name: "People",
        owner: "canvas",
        field_names: super::people::People::FIELD_NAMES,
        decode: decode_people,
    },
    TableDescriptor {
        name: "users",
        type_name: "Users",
        owner: "canvas",
        field_names: super::users::Users::FIELD_NAMES,
        decode: decode_users,
    },
];

fn decode_people(fields: &[&str]) -> Result<DynRecord, FieldCoercionError> {
    Ok(Box::new(super::people::People::from_fields(fields)?))
}

fn decode_users(fields: &[&str]) -> Result<DynRecord, FieldCoercionError> {
    Ok(Box::new(super::users::Users::from_fields(fields)?))
}

impl PhaseTable {
    /// Every table, in source-name order
    pub const ALL: &'static [PhaseTable] = &[
        PhaseTable::People,
        PhaseTable::Users,
    ];

    pub fn source_name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn type_name(&self) -> &'static str {
        self.descriptor().type_name
    }

    pub fn descriptor(&self) -> &'static TableDescriptor {
        &DESCRIPTORS[*self as usize]
    }

    pub fn from_source_name(name: &str) -> Result<Self, UnknownTableError> {
        match name {
            "people" => Ok(PhaseTable::People),
            "users" => Ok(PhaseTable::Users),
            _ => Err(UnknownTableError::new(name)),
        }
    }
}

impl TableRegistry for PhaseTable {
    fn all() -> &'static [Self] {
        Self::ALL
    }

    fn source_name(&self) -> &'static str {
        PhaseTable::source_name(self)
    }

    fn descriptor(&self) -> &'static TableDescriptor {
        PhaseTable::descriptor(self)
    }

    fn from_source_name(name: &str) -> Result<Self, UnknownTableError> {
        PhaseTable::from_source_name(name)
    }
}
