//! Code generation errors

use phasegen_core::{Diagnostic, DiagnosticCode, Severity};

fn in_table(table: &Option<String>) -> String {
    table
        .as_ref()
        .map(|t| format!(", table '{}'", t))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    /// The schema cannot be expressed as bindings; raised before any file is rendered
    #[error("Invalid schema for phase{phase}{}: {message}", in_table(.table))]
    Validation {
        phase: u32,
        table: Option<String>,
        message: String,
    },

    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error writing {path}: {message}")]
    Io { path: String, message: String },
}

impl CodegenError {
    pub fn validation(phase: u32, table: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            phase,
            table: Some(table.to_string()),
            message: message.into(),
        }
    }

    pub fn io(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Validation { phase, table, .. } => {
                let diag = Diagnostic::new(DiagnosticCode::SchemaValidation, Severity::Error, self.to_string())
                    .with_phase(*phase);
                match table {
                    Some(t) => diag.with_table(t.clone()),
                    None => diag,
                }
            }
            Self::Template(_) | Self::Io { .. } => {
                Diagnostic::new(DiagnosticCode::CodegenFailed, Severity::Error, self.to_string())
            }
        }
    }
}

impl From<minijinja::Error> for CodegenError {
    fn from(err: minijinja::Error) -> Self {
        Self::Template(err.to_string())
    }
}
