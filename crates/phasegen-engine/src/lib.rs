//! phasegen engine - phase transitions
//!
//! This crate decides *what must be generated* and *what can be passed
//! through unchanged*:
//! - Schema transformer (phase N from phase N-1 plus rules)
//! - Newly-generated marking and structural diffs
//! - Pass-through copy planning
//! - The sequential phase pipeline

pub mod copy_plan;
pub mod marking;
pub mod pipeline;
pub mod transformer;

pub use copy_plan::{shell_quote, CopyInstruction, CopyPlan, CopyPlanError};
pub use marking::{ColumnChange, PhaseDiff, TableChange, TableStatus};
pub use pipeline::{PhaseInputs, PipelineError, PipelineOutput};
pub use transformer::SchemaTransformer;
