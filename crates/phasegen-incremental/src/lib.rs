//! Incremental phase builds using Salsa
//!
//! The raw schema document and each phase's rules are Salsa inputs. Phase
//! schemas are tracked functions of their predecessor, so editing the rules
//! of phase N only rebuilds phase N and later phases.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use phasegen_incremental::{PhasegenDatabase, PhaseChain};
//!
//! let db = PhasegenDatabase::default();
//! let chain = PhaseChain::new(&db, schema_json, rules_per_phase);
//! let phase2 = chain.schema(&db, 2);
//! ```

pub mod db;
pub mod queries;

pub use db::{Db, PhasegenDatabase};
pub use queries::{phase_fingerprint, phase_schema, raw_schema, PhaseChain, PhaseInput, SchemaInput};
