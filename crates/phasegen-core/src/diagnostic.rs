//! Diagnostics attached to phase builds
//!
//! Codes are serialized into `phasegen-report.json` and matched on by CI
//! scripts. A code is never renamed or reused once released.

use serde::{Deserialize, Serialize};

macro_rules! diagnostic_codes {
    ($($(#[$doc:meta])* $variant:ident => $code:literal,)+) => {
        /// Stable diagnostic code
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum DiagnosticCode {
            $(
                $(#[$doc])*
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl DiagnosticCode {
            pub const ALL: &'static [DiagnosticCode] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }
    };
}

diagnostic_codes! {
    /// Extension table introduced in this phase
    PhaseTableAdded => "PHASE_TABLE_ADDED",
    /// Carried forward, column set unchanged
    PhaseTableCarried => "PHASE_TABLE_CARRIED",
    /// Carried forward with columns excluded
    PhaseTableReshaped => "PHASE_TABLE_RESHAPED",
    /// Expired, or renamed away
    PhaseTableDropped => "PHASE_TABLE_DROPPED",
    PhaseTableRenamed => "PHASE_TABLE_RENAMED",

    /// Rule or schema input that cannot be built
    SchemaValidation => "SCHEMA_VALIDATION",
    /// Extension or rename target already exists
    SchemaConflict => "SCHEMA_CONFLICT",
    SchemaDuplicateTable => "SCHEMA_DUPLICATE_TABLE",

    CodegenArtifactWritten => "CODEGEN_ARTIFACT_WRITTEN",
    /// Content hash matched the previous build
    CodegenArtifactUnchanged => "CODEGEN_ARTIFACT_UNCHANGED",
    /// No longer generated, deleted from the output directory
    CodegenArtifactRemoved => "CODEGEN_ARTIFACT_REMOVED",
    CodegenFailed => "CODEGEN_FAILED",
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a diagnostic affects the build
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    /// Aborts the run; nothing is emitted
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

/// One finding, located by phase, table and column where known
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            phase: None,
            table: None,
            column: None,
        }
    }

    pub fn with_phase(mut self, phase: u32) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// `phase2.users.name` style location, `None` when nothing is known
    pub fn location(&self) -> Option<String> {
        let parts: Vec<String> = self
            .phase
            .map(|p| format!("phase{}", p))
            .into_iter()
            .chain(self.table.clone())
            .chain(self.column.clone())
            .collect();
        (!parts.is_empty()).then(|| parts.join("."))
    }
}
