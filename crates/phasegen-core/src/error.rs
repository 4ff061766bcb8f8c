//! Schema error types
//!
//! These errors are fatal for the phase being built. They always carry the
//! table (and column, where relevant) that caused them.

use crate::diagnostic::{Diagnostic, DiagnosticCode, Severity};

/// Errors raised while building or validating a schema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Malformed or self-contradictory schema or rule input
    #[error("Invalid schema for table '{table}': {message}")]
    Validation {
        table: String,
        column: Option<String>,
        message: String,
    },

    /// A table is both carried forward and declared by an extension rule
    #[error("Table '{table}' already exists in the previous phase and is also declared by an extension rule")]
    Conflict { table: String },

    /// The same table name is declared twice
    #[error("Table '{table}' is declared more than once")]
    DuplicateTable { table: String },
}

impl SchemaError {
    /// Table-level validation error
    pub fn validation(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            table: table.into(),
            column: None,
            message: message.into(),
        }
    }

    /// Column-level validation error
    pub fn column_validation(
        table: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let column = column.into();
        Self::Validation {
            table: table.into(),
            message: format!("column '{}': {}", column, message.into()),
            column: Some(column),
        }
    }

    /// Name of the table this error refers to
    pub fn table(&self) -> &str {
        match self {
            Self::Validation { table, .. } => table,
            Self::Conflict { table } => table,
            Self::DuplicateTable { table } => table,
        }
    }

    /// Convert to a diagnostic for the build report
    pub fn to_diagnostic(&self, phase: Option<u32>) -> Diagnostic {
        let code = match self {
            Self::Validation { .. } => DiagnosticCode::SchemaValidation,
            Self::Conflict { .. } => DiagnosticCode::SchemaConflict,
            Self::DuplicateTable { .. } => DiagnosticCode::SchemaDuplicateTable,
        };

        let mut diag = Diagnostic::new(code, Severity::Error, self.to_string())
            .with_table(self.table());

        if let Self::Validation { column: Some(column), .. } = self {
            diag = diag.with_column(column.clone());
        }
        if let Some(phase) = phase {
            diag = diag.with_phase(phase);
        }

        diag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_validation_names_column() {
        let err = SchemaError::column_validation("users", "score", "unknown type 'frobnicate'");
        assert_eq!(err.table(), "users");
        assert_eq!(
            err.to_string(),
            "Invalid schema for table 'users': column 'score': unknown type 'frobnicate'"
        );
    }

    #[test]
    fn error_to_diagnostic() {
        let diag = SchemaError::Conflict { table: "users".into() }.to_diagnostic(Some(2));
        assert_eq!(diag.code, DiagnosticCode::SchemaConflict);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.phase, Some(2));
        assert_eq!(diag.table.as_deref(), Some("users"));
    }
}
