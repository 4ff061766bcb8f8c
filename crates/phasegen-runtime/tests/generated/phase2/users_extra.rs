// @generated by phasegen from schema canvas 1.0. Do not edit.
//! `users_extra` table, phase2

use phasegen_runtime::{coerce, FieldCoercionError, FieldValue, TableRecord, ValueMap};
use phasegen_runtime::Decimal;

/// Record of `users_extra`, owned by `canvas`
///
/// Added by an extension rule in phase2.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UsersExtra {
    /// `user_id` BIGINT, new in phase2
    user_id: Option<i64>,
    /// `score` DECIMAL(2), new in phase2
    score: Option<Decimal>,
}

impl UsersExtra {
    pub const TABLE_NAME: &'static str = "users_extra";
    pub const OWNER: &'static str = "canvas";
    pub const FIELD_NAMES: &'static [&'static str] = &["user_id", "score"];

    #[allow(clippy::too_many_arguments)]
    pub fn new(user_id: Option<i64>, score: Option<Decimal>) -> Self {
        Self {
            user_id,
            score,
        }
    }

    /// Parse one raw row laid out in `FIELD_NAMES` order
    ///
    /// Empty fields and missing trailing fields are unset.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, FieldCoercionError> {
        coerce::check_arity(Self::TABLE_NAME, fields.len(), Self::FIELD_NAMES.len())?;
        Ok(Self {
            user_id: coerce::bigint(Self::TABLE_NAME, "user_id", coerce::field(fields, 0))?,
            score: coerce::decimal(Self::TABLE_NAME, "score", coerce::field(fields, 1), 2)?,
        })
    }

    /// Build from name-keyed values; missing keys and nulls are unset
    pub fn from_map(map: &ValueMap) -> Result<Self, FieldCoercionError> {
        Ok(Self {
            user_id: coerce::bigint(Self::TABLE_NAME, "user_id", coerce::map_field(Self::TABLE_NAME, "user_id", map)?.as_deref())?,
            score: coerce::decimal(Self::TABLE_NAME, "score", coerce::map_field(Self::TABLE_NAME, "score", map)?.as_deref(), 2)?,
        })
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn set_user_id(&mut self, value: Option<i64>) {
        self.user_id = value;
    }

    pub fn score(&self) -> Option<Decimal> {
        self.score
    }

    pub fn set_score(&mut self, value: Option<Decimal>) {
        self.score = value;
    }
}

impl TableRecord for UsersExtra {
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
            FieldValue::from(self.user_id),
            FieldValue::from(self.score),
        ]
    }
}
