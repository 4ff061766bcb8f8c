//! phasegen core
//!
//! Core domain model: the versioned table/column schema IR, the rule
//! documents that drive each phase transition, configuration, and the
//! stable diagnostic/report types.
//! Never rename diagnostic codes - they are part of the public API.

pub mod config;
pub mod diagnostic;
pub mod document;
pub mod error;
pub mod identity;
pub mod phase;
pub mod report;
pub mod rules;
pub mod schema;

pub use config::{Config, ConfigError, PhaseConfig};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use document::{CarryForwardRule, ColumnDocument, SchemaDocument, TableDocument};
pub use error::SchemaError;
pub use identity::{IdentityTableSource, StaticIdentityTables};
pub use phase::{Phase, StorageLocation};
pub use report::{Report, ReportSummary, ReportVersion};
pub use rules::{PhaseRules, RuleLoadError};
pub use schema::{Column, DataType, Provenance, Retention, Schema, Table};
