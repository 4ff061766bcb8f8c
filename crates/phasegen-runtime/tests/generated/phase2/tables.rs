// @generated by phasegen from schema canvas 1.0. Do not edit.
//! Table registry for phase2

use phasegen_runtime::{DynRecord, FieldCoercionError, TableDescriptor, TableRegistry, UnknownTableError};

/// Tables the identity subsystem treats as identity tables
pub const IDENTITY_TABLES: &[&str] = &["users"];

/// Every table in phase2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhaseTable {
    Persons,
    Users,
    UsersExtra,
}

static DESCRIPTORS: [TableDescriptor; 3] = [
    TableDescriptor {
        name: "persons",
        type_name: "Persons",
        owner: "canvas",
        field_names: super::persons::Persons::FIELD_NAMES,
        decode: decode_persons,
    },
    TableDescriptor {
        name: "users",
        type_name: "Users",
        owner: "canvas",
        field_names: super::users::Users::FIELD_NAMES,
        decode: decode_users,
    },
    TableDescriptor {
        name: "users_extra",
        type_name: "UsersExtra",
        owner: "canvas",
        field_names: super::users_extra::UsersExtra::FIELD_NAMES,
        decode: decode_users_extra,
    },
];

fn decode_persons(fields: &[&str]) -> Result<DynRecord, FieldCoercionError> {
    Ok(Box::new(super::persons::Persons::from_fields(fields)?))
}

fn decode_users(fields: &[&str]) -> Result<DynRecord, FieldCoercionError> {
    Ok(Box::new(super::users::Users::from_fields(fields)?))
}

fn decode_users_extra(fields: &[&str]) -> Result<DynRecord, FieldCoercionError> {
    Ok(Box::new(super::users_extra::UsersExtra::from_fields(fields)?))
}

impl PhaseTable {
    /// Every table, in source-name order
    pub const ALL: &'static [PhaseTable] = &[
        PhaseTable::Persons,
        PhaseTable::Users,
        PhaseTable::UsersExtra,
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
            "persons" => Ok(PhaseTable::Persons),
            "users" => Ok(PhaseTable::Users),
            "users_extra" => Ok(PhaseTable::UsersExtra),
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
