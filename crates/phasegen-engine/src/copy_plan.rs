//! Pass-through copy planning
//!
//! Tables without newly generated elements are relocated wholesale from the
//! source phase's storage location to the destination's. Everything else is
//! left to the batch runtime to regenerate.

use minijinja::{context, Environment};
use phasegen_core::{Phase, Schema, StorageLocation};
use serde::{Deserialize, Serialize};

/// Copy one table's data between phase locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyInstruction {
    pub table: String,
    pub source: String,
    pub destination: String,
}

/// Ordered copy instructions for one phase transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyPlan {
    pub from_phase: u32,
    pub to_phase: u32,
    /// Instructions in lexicographic table order
    pub instructions: Vec<CopyInstruction>,
}

impl CopyPlan {
    /// Plan the transition from `source` to `destination`
    pub fn between(source: &Phase, destination: &Phase) -> Self {
        Self {
            from_phase: source.ordinal,
            to_phase: destination.ordinal,
            instructions: Self::instructions(&destination.schema, &source.location, &destination.location),
        }
    }

    /// One instruction per destination table that has no newly generated elements
    pub fn instructions(
        destination_schema: &Schema,
        source: &StorageLocation,
        destination: &StorageLocation,
    ) -> Vec<CopyInstruction> {
        let mut instructions: Vec<CopyInstruction> = destination_schema
            .tables()
            .filter(|t| !t.has_newly_generated_elements())
            .map(|t| CopyInstruction {
                table: t.name.clone(),
                source: source.table(&t.name),
                destination: destination.table(&t.name),
            })
            .collect();

        // Schema iteration is already ordered; the sort keeps the output
        // independent of that.
        instructions.sort_by(|a, b| a.table.cmp(&b.table));
        instructions
    }

    /// Copied table names, in order
    pub fn tables(&self) -> Vec<&str> {
        self.instructions.iter().map(|i| i.table.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Conventional script file name, e.g. `phase1_to_phase2.sh`
    pub fn script_name(&self) -> String {
        format!("phase{}_to_phase{}.sh", self.from_phase, self.to_phase)
    }

    /// Render an executable `sh` script
    ///
    /// `command_template` is a minijinja template rendered once per
    /// instruction with `source`, `destination` and `table` in scope. The
    /// `shell_quote` filter makes a value safe to paste into `sh`.
    pub fn render_script(&self, command_template: &str) -> Result<String, CopyPlanError> {
        let mut env = Environment::new();
        env.add_filter("shell_quote", |value: String| shell_quote(&value));
        env.add_template("command", command_template)
            .map_err(|e| CopyPlanError::Template(e.to_string()))?;
        let template = env
            .get_template("command")
            .map_err(|e| CopyPlanError::Template(e.to_string()))?;

        let mut script = String::new();
        script.push_str("#!/bin/sh\n");
        script.push_str(&format!(
            "# Pass-through copy: phase{} -> phase{} ({} tables)\n",
            self.from_phase,
            self.to_phase,
            self.instructions.len()
        ));
        script.push_str("set -e\n");

        for instruction in &self.instructions {
            let line = template
                .render(context! {
                    source => &instruction.source,
                    destination => &instruction.destination,
                    table => &instruction.table,
                })
                .map_err(|e| CopyPlanError::Template(e.to_string()))?;
            script.push_str(line.trim());
            script.push('\n');
        }

        Ok(script)
    }

    /// Serialize the plan as JSON for programmatic consumers
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Quote `value` as one `sh` word
///
/// Values made only of characters `sh` never interprets pass through as is.
pub fn shell_quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "'\\''"))
    }
}

/// Errors rendering a copy plan
#[derive(Debug, thiserror::Error)]
pub enum CopyPlanError {
    #[error("Copy command template error: {0}")]
    Template(String),
}
