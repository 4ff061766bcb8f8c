//! Errors raised by generated bindings at data-read time

/// A raw value could not be converted to its column type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldCoercionError {
    #[error("{table}.{column}: cannot read {value:?} as {expected}: {reason}")]
    InvalidValue {
        table: String,
        column: String,
        value: String,
        expected: &'static str,
        reason: String,
    },

    #[error("{table}: expected at most {expected} fields, got {actual}")]
    Arity {
        table: String,
        expected: usize,
        actual: usize,
    },
}

impl FieldCoercionError {
    pub fn invalid(
        table: &str,
        column: &str,
        value: impl Into<String>,
        expected: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            table: table.to_string(),
            column: column.to_string(),
            value: value.into(),
            expected,
            reason: reason.into(),
        }
    }

    /// Column the error refers to, if any
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::InvalidValue { column, .. } => Some(column),
            Self::Arity { .. } => None,
        }
    }
}

/// Registry lookup for a table name that does not exist in the phase
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown table '{name}'")]
pub struct UnknownTableError {
    pub name: String,
}

impl UnknownTableError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
