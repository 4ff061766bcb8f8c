//! Typed field values

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Canonical timestamp rendering; fractional seconds only when present
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Name-keyed input for `from_map` constructors
pub type ValueMap = serde_json::Map<String, serde_json::Value>;

/// One field of a record, tagged with its column type
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Int(i32),
    BigInt(i64),
    Decimal(Decimal),
    Varchar(String),
    Boolean(bool),
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Raw string form, the inverse of the `from_fields` parsers
    ///
    /// Null renders as the empty string.
    pub fn to_raw(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Int(v) => v.to_string(),
            Self::BigInt(v) => v.to_string(),
            Self::Decimal(v) => v.to_string(),
            Self::Varchar(v) => v.clone(),
            Self::Boolean(v) => v.to_string(),
            Self::Timestamp(v) => v.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// JSON form; decimals and timestamps become strings to keep precision
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Int(v) => serde_json::Value::from(*v),
            Self::BigInt(v) => serde_json::Value::from(*v),
            Self::Boolean(v) => serde_json::Value::from(*v),
            Self::Varchar(v) => serde_json::Value::from(v.clone()),
            Self::Decimal(_) | Self::Timestamp(_) => serde_json::Value::from(self.to_raw()),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_raw())
    }
}

macro_rules! field_value_from {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for FieldValue {
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        }

        impl From<Option<$ty>> for FieldValue {
            fn from(value: Option<$ty>) -> Self {
                value.map_or(Self::Null, Self::$variant)
            }
        }
    };
}

field_value_from!(i32, Int);
field_value_from!(i64, BigInt);
field_value_from!(Decimal, Decimal);
field_value_from!(String, Varchar);
field_value_from!(bool, Boolean);
field_value_from!(NaiveDateTime, Timestamp);
