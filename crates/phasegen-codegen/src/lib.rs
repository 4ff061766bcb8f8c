//! Rust source generation for phase schemas
//!
//! Every phase gets one record module per table, a `tables.rs` registry and
//! a `mod.rs`; every transition gets a pass-through copy script. Artifacts
//! are written atomically and unchanged ones are skipped.

pub mod binding;
pub mod emit;
pub mod error;
pub mod model;
pub mod naming;
pub mod project;
pub mod registry;
pub mod templates;

pub use binding::{BindingGenerator, SourceFile};
pub use emit::{content_hash, EmitManifest, EmitSummary, Emitter, MANIFEST_FILE};
pub use error::CodegenError;
pub use model::PhaseModel;
pub use project::{CodegenOptions, ProjectGenerator};
pub use registry::RegistryGenerator;
pub use templates::Templates;
