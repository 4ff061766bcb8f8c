// @generated by phasegen from schema canvas 1.0. Do not edit.
//! `persons` table, phase2

use phasegen_runtime::{coerce, FieldCoercionError, FieldValue, TableRecord, ValueMap};
use phasegen_runtime::NaiveDateTime;

/// Record of `persons`, owned by `canvas`
///
/// Carried forward from phase1.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Persons {
    /// `id` INT
    id: Option<i32>,
    /// `created_at` TIMESTAMP
    created_at: Option<NaiveDateTime>,
}

impl Persons {
    pub const TABLE_NAME: &'static str = "persons";
    pub const OWNER: &'static str = "canvas";
    pub const FIELD_NAMES: &'static [&'static str] = &["id", "created_at"];

    #[allow(clippy::too_many_arguments)]
    pub fn new(id: Option<i32>, created_at: Option<NaiveDateTime>) -> Self {
        Self {
            id,
            created_at,
        }
    }

    /// Parse one raw row laid out in `FIELD_NAMES` order
    ///
    /// Empty fields and missing trailing fields are unset.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, FieldCoercionError> {
        coerce::check_arity(Self::TABLE_NAME, fields.len(), Self::FIELD_NAMES.len())?;
        Ok(Self {
            id: coerce::int(Self::TABLE_NAME, "id", coerce::field(fields, 0))?,
            created_at: coerce::timestamp(Self::TABLE_NAME, "created_at", coerce::field(fields, 1))?,
        })
    }

    /// Build from name-keyed values; missing keys and nulls are unset
    pub fn from_map(map: &ValueMap) -> Result<Self, FieldCoercionError> {
        Ok(Self {
            id: coerce::int(Self::TABLE_NAME, "id", coerce::map_field(Self::TABLE_NAME, "id", map)?.as_deref())?,
            created_at: coerce::timestamp(Self::TABLE_NAME, "created_at", coerce::map_field(Self::TABLE_NAME, "created_at", map)?.as_deref())?,
        })
    }

    /// Carry a phase1 record forward; columns new in phase2 are unset
    pub fn from_previous(previous: &super::super::phase1::persons::Persons) -> Self {
        Self {
            id: previous.id(),
            created_at: previous.created_at(),
        }
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn set_id(&mut self, value: Option<i32>) {
        self.id = value;
    }

    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.created_at
    }

    pub fn set_created_at(&mut self, value: Option<NaiveDateTime>) {
        self.created_at = value;
    }
}

impl TableRecord for Persons {
    fn table_name(&self) -> &'static str {
        Self::TABLE_NAME
    }

    fn owner(&self) -> &'static str {
        Self::OWNER
    }

    fn field_names(&self) -> &'static [&'static str] {
        Self::FIELD_NAMES
    }

    fn fields_as_ordered_values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::from(self.id),
            FieldValue::from(self.created_at),
        ]
    }
}
