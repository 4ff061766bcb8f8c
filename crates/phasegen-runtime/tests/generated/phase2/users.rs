// @generated by phasegen from schema canvas 1.0. Do not edit.
//! `users` table, phase2

use phasegen_runtime::{coerce, FieldCoercionError, FieldValue, TableRecord, ValueMap};

/// Record of `users`, owned by `canvas`
///
/// Carried forward from phase1.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Users {
    /// `id` BIGINT
    id: Option<i64>,
    /// `type` VARCHAR(16)
    r#type: Option<String>,
    /// `new` INT
    new: Option<i32>,
    /// `self` BOOLEAN
    self_: Option<bool>,
}

impl Users {
    pub const TABLE_NAME: &'static str = "users";
    pub const OWNER: &'static str = "canvas";
    pub const FIELD_NAMES: &'static [&'static str] = &["id", "type", "new", "self"];

    #[allow(clippy::too_many_arguments)]
    pub fn new(id: Option<i64>, r#type: Option<String>, new: Option<i32>, self_: Option<bool>) -> Self {
        Self {
            id,
            r#type,
            new,
            self_,
        }
    }

    /// Parse one raw row laid out in `FIELD_NAMES` order
    ///
    /// Empty fields and missing trailing fields are unset.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, FieldCoercionError> {
        coerce::check_arity(Self::TABLE_NAME, fields.len(), Self::FIELD_NAMES.len())?;
        Ok(Self {
            id: coerce::bigint(Self::TABLE_NAME, "id", coerce::field(fields, 0))?,
            r#type: coerce::varchar(Self::TABLE_NAME, "type", coerce::field(fields, 1), 16)?,
            new: coerce::int(Self::TABLE_NAME, "new", coerce::field(fields, 2))?,
            self_: coerce::boolean(Self::TABLE_NAME, "self", coerce::field(fields, 3))?,
        })
    }

    /// Build from name-keyed values; missing keys and nulls are unset
    pub fn from_map(map: &ValueMap) -> Result<Self, FieldCoercionError> {
        Ok(Self {
            id: coerce::bigint(Self::TABLE_NAME, "id", coerce::map_field(Self::TABLE_NAME, "id", map)?.as_deref())?,
            r#type: coerce::varchar(Self::TABLE_NAME, "type", coerce::map_field(Self::TABLE_NAME, "type", map)?.as_deref(), 16)?,
            new: coerce::int(Self::TABLE_NAME, "new", coerce::map_field(Self::TABLE_NAME, "new", map)?.as_deref())?,
            self_: coerce::boolean(Self::TABLE_NAME, "self", coerce::map_field(Self::TABLE_NAME, "self", map)?.as_deref())?,
        })
    }

    /// Carry a phase1 record forward; columns new in phase2 are unset
    pub fn from_previous(previous: &super::super::phase1::users::Users) -> Self {
        Self {
            id: previous.id(),
            r#type: previous.r#type().map(str::to_string),
            new: previous.new_value(),
            self_: previous.self_(),
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, value: Option<i64>) {
        self.id = value;
    }

    pub fn r#type(&self) -> Option<&str> {
        self.r#type.as_deref()
    }

    pub fn set_type(&mut self, value: Option<String>) {
        self.r#type = value;
    }

    pub fn new_value(&self) -> Option<i32> {
        self.new
    }

    pub fn set_new(&mut self, value: Option<i32>) {
        self.new = value;
    }

    pub fn self_(&self) -> Option<bool> {
        self.self_
    }

    pub fn set_self(&mut self, value: Option<bool>) {
        self.self_ = value;
    }
}

impl TableRecord for Users {
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
            FieldValue::from(self.r#type.clone()),
            FieldValue::from(self.new),
            FieldValue::from(self.self_),
        ]
    }
}
