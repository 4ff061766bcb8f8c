//! Salsa inputs and tracked functions for phase builds

use crate::db::PhasegenDatabase;
use phasegen_core::{PhaseRules, Schema, SchemaDocument};
use phasegen_engine::SchemaTransformer;
use salsa::Setter;

/// Input: raw phase0 schema document
#[salsa::input(debug)]
pub struct SchemaInput {
    /// JSON text of the schema document
    #[returns(ref)]
    pub json: String,
}

/// Input: one phase and the rules that build it from its predecessor
///
/// phase0 has no predecessor and is the parsed schema document.
#[salsa::input(debug)]
pub struct PhaseInput {
    pub ordinal: u32,

    #[returns(ref)]
    pub rules: PhaseRules,

    pub previous: Option<PhaseInput>,

    pub schema: SchemaInput,
}

/// Tracked function: parse the raw schema document into phase0
#[salsa::tracked]
pub fn raw_schema(db: &dyn salsa::Database, input: SchemaInput) -> Result<Schema, String> {
    let doc = SchemaDocument::from_json(input.json(db))
        .map_err(|e| format!("Failed to parse schema document: {}", e))?;
    Schema::from_document(&doc).map_err(|e| format!("Failed to build phase0: {}", e))
}

/// Tracked function: build a phase schema from its predecessor
///
/// Recomputed only when this phase's rules or an earlier phase change.
#[salsa::tracked]
pub fn phase_schema(db: &dyn salsa::Database, phase: PhaseInput) -> Result<Schema, String> {
    let Some(previous) = phase.previous(db) else {
        return raw_schema(db, phase.schema(db));
    };

    let ordinal = phase.ordinal(db);
    let previous = phase_schema(db, previous)?;
    SchemaTransformer::apply(ordinal, &previous, phase.rules(db))
        .map_err(|e| format!("Failed to build phase{}: {}", ordinal, e))
}

/// Tracked function: fingerprint of a phase schema
#[salsa::tracked]
pub fn phase_fingerprint(db: &dyn salsa::Database, phase: PhaseInput) -> Result<String, String> {
    phase_schema(db, phase).map(|schema| schema.fingerprint())
}

/// The chain of phase inputs for one project
#[derive(Debug, Clone)]
pub struct PhaseChain {
    schema: SchemaInput,
    phases: Vec<PhaseInput>,
}

impl PhaseChain {
    /// Register the schema document and the rules of phase1..phaseN
    pub fn new(db: &PhasegenDatabase, schema_json: String, transitions: Vec<PhaseRules>) -> Self {
        let schema = SchemaInput::new(db, schema_json);
        let mut phases = vec![PhaseInput::new(db, 0, PhaseRules::new(), None, schema)];

        for (index, rules) in transitions.into_iter().enumerate() {
            let previous = phases[index];
            phases.push(PhaseInput::new(db, index as u32 + 1, rules, Some(previous), schema));
        }

        Self { schema, phases }
    }

    /// Number of phases including phase0
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn phase(&self, ordinal: u32) -> Option<PhaseInput> {
        self.phases.get(ordinal as usize).copied()
    }

    /// Schema of phase `ordinal`, `None` if the chain is shorter
    pub fn schema(&self, db: &PhasegenDatabase, ordinal: u32) -> Option<Result<Schema, String>> {
        self.phase(ordinal).map(|phase| phase_schema(db, phase))
    }

    /// Fingerprints of every phase, in order
    pub fn fingerprints(&self, db: &PhasegenDatabase) -> Result<Vec<String>, String> {
        self.phases.iter().map(|phase| phase_fingerprint(db, *phase)).collect()
    }

    /// Replace the schema document
    pub fn set_schema_json(&self, db: &mut PhasegenDatabase, json: String) {
        self.schema.set_json(db).to(json);
    }

    /// Replace the rules of phase `ordinal`; phase0 has none
    pub fn set_rules(&self, db: &mut PhasegenDatabase, ordinal: u32, rules: PhaseRules) -> bool {
        match self.phase(ordinal) {
            Some(phase) if ordinal > 0 => {
                phase.set_rules(db).to(rules);
                true
            }
            _ => false,
        }
    }
}
