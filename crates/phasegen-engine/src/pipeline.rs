//! Sequential phase pipeline
//!
//! phase0 comes from the raw schema document; every later phase is built
//! strictly from its predecessor. After all schemas are resolved, a diff and
//! a copy plan are computed for each adjacent pair.

use crate::copy_plan::CopyPlan;
use crate::marking::PhaseDiff;
use crate::transformer::SchemaTransformer;
use phasegen_core::{
    Config, Diagnostic, Phase, PhaseRules, RuleLoadError, Schema, SchemaDocument, SchemaError,
    StorageLocation,
};
use std::path::Path;
use tracing::info;

/// Everything needed to build all phases
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseInputs {
    /// Raw phase0 schema document
    pub schema: SchemaDocument,

    /// Storage location of phase0
    pub phase0_location: StorageLocation,

    /// Location and rules for phase1, phase2, ...
    pub transitions: Vec<(StorageLocation, PhaseRules)>,
}

impl PhaseInputs {
    /// Read the schema document and every phase's rule directory
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let schema_path = config.resolve(&config.schema.path);
        let schema = load_schema_document(&schema_path)?;

        let Some(first) = config.phases.first() else {
            return Err(PipelineError::NoPhases);
        };

        let mut transitions = Vec::new();
        for (ordinal, phase) in config.phases.iter().enumerate().skip(1) {
            let rules = match config.rules_dir(ordinal) {
                Some(dir) => PhaseRules::load_dir(&dir).map_err(|source| PipelineError::Rules {
                    phase: ordinal as u32,
                    source,
                })?,
                None => PhaseRules::new(),
            };
            transitions.push((StorageLocation::new(phase.location.clone()), rules));
        }

        Ok(Self {
            schema,
            phase0_location: StorageLocation::new(first.location.clone()),
            transitions,
        })
    }

    /// Build every phase, then diff and plan each transition
    pub fn build(&self) -> Result<PipelineOutput, PipelineError> {
        let phase0 = Schema::from_document(&self.schema)
            .map_err(|source| PipelineError::Phase { phase: 0, source })?;
        info!(phase = 0, tables = phase0.len(), "loaded raw schema");

        let mut phases = vec![Phase::new(0, phase0, self.phase0_location.clone())];

        for (index, (location, rules)) in self.transitions.iter().enumerate() {
            let ordinal = index as u32 + 1;
            let previous = &phases[index].schema;
            let schema = SchemaTransformer::apply(ordinal, previous, rules)
                .map_err(|source| PipelineError::Phase { phase: ordinal, source })?;

            info!(
                phase = ordinal,
                tables = schema.len(),
                regenerated = schema.tables().filter(|t| t.has_newly_generated_elements()).count(),
                "built phase"
            );
            phases.push(Phase::new(ordinal, schema, location.clone()));
        }

        Ok(PipelineOutput::from_phases(phases))
    }
}

/// Read and parse the raw schema document
pub fn load_schema_document(path: &Path) -> Result<SchemaDocument, PipelineError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::IoError(path.display().to_string(), e.to_string()))?;
    SchemaDocument::from_json(&json)
        .map_err(|e| PipelineError::ParseError(path.display().to_string(), e.to_string()))
}

/// Resolved phases with their transition diffs and copy plans
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// phase0..phaseN
    pub phases: Vec<Phase>,

    /// One diff per transition, `diffs[i]` is phase i -> phase i+1
    pub diffs: Vec<PhaseDiff>,

    /// One copy plan per transition, aligned with `diffs`
    pub copy_plans: Vec<CopyPlan>,
}

impl PipelineOutput {
    /// Derive diffs and copy plans from resolved phases
    pub fn from_phases(phases: Vec<Phase>) -> Self {
        let mut diffs = Vec::new();
        let mut copy_plans = Vec::new();

        for pair in phases.windows(2) {
            diffs.push(PhaseDiff::between(&pair[0].schema, &pair[1].schema, pair[1].ordinal));
            copy_plans.push(CopyPlan::between(&pair[0], &pair[1]));
        }

        Self {
            phases,
            diffs,
            copy_plans,
        }
    }

    /// Find a phase by ordinal
    pub fn phase(&self, ordinal: u32) -> Option<&Phase> {
        self.phases.get(ordinal as usize)
    }

    /// Copy plan into phase `ordinal`
    pub fn copy_plan_into(&self, ordinal: u32) -> Option<&CopyPlan> {
        self.copy_plans.iter().find(|p| p.to_phase == ordinal)
    }

    /// Diff into phase `ordinal`
    pub fn diff_into(&self, ordinal: u32) -> Option<&PhaseDiff> {
        self.diffs.iter().find(|d| d.to_phase == ordinal)
    }

    /// Transition diagnostics for every phase
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diffs.iter().flat_map(|d| d.to_diagnostics()).collect()
    }
}

/// Errors building the phase pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("IO error reading {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse schema document {0}: {1}")]
    ParseError(String, String),

    #[error("No phases configured")]
    NoPhases,

    #[error("Failed to load rules for phase{phase}: {source}")]
    Rules {
        phase: u32,
        #[source]
        source: RuleLoadError,
    },

    #[error("Failed to build phase{phase}: {source}")]
    Phase {
        phase: u32,
        #[source]
        source: SchemaError,
    },
}

impl PipelineError {
    /// Diagnostic for the build report, when the error is a schema error
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match self {
            Self::Phase { phase, source } => Some(source.to_diagnostic(Some(*phase))),
            _ => None,
        }
    }
}
