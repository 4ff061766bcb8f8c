//! Whole-project generation across all phases

use crate::binding::{BindingGenerator, SourceFile};
use crate::error::CodegenError;
use crate::model::{self, PhaseModel};
use crate::registry::RegistryGenerator;
use crate::templates::{self, Templates};
use minijinja::context;
use phasegen_core::{Config, IdentityTableSource};
use phasegen_engine::PipelineOutput;
use std::path::PathBuf;
use tracing::info;

/// Settings for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Crate path generated code imports runtime support from
    pub runtime_crate: String,
    pub parallel: bool,
    /// minijinja template for one copy command
    pub copy_command: String,
    /// Output-relative directory for copy scripts and plans
    pub script_dir: PathBuf,
}

impl CodegenOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            runtime_crate: config.codegen.runtime_crate.clone(),
            parallel: config.codegen.parallel,
            copy_command: config.copy.command.clone(),
            script_dir: config.copy.script_dir.clone(),
        }
    }
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Produces every artifact of a build from resolved phases
pub struct ProjectGenerator<'a> {
    options: CodegenOptions,
    identity: &'a dyn IdentityTableSource,
    templates: Templates,
}

impl<'a> ProjectGenerator<'a> {
    pub fn new(options: CodegenOptions, identity: &'a dyn IdentityTableSource) -> Result<Self, CodegenError> {
        Ok(Self {
            options,
            identity,
            templates: Templates::new()?,
        })
    }

    /// Render all artifacts, sorted by path
    ///
    /// Every phase is validated before the first file is rendered.
    pub fn generate(&self, output: &PipelineOutput) -> Result<Vec<SourceFile>, CodegenError> {
        let models = output
            .phases
            .iter()
            .enumerate()
            .map(|(index, phase)| {
                let prior = index.checked_sub(1).map(|i| &output.phases[i].schema);
                PhaseModel::build(phase, prior)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let bindings = BindingGenerator::new(&self.templates, &self.options.runtime_crate)
            .parallel(self.options.parallel);
        let registry = RegistryGenerator::new(&self.templates, &self.options.runtime_crate, self.identity);

        let mut files = Vec::new();
        for model in &models {
            files.extend(bindings.generate_model(model)?);
            files.push(registry.generate(model)?);
            info!(phase = model.ordinal, tables = model.tables.len(), "generated bindings");
        }

        if let Some(first) = output.phases.first() {
            let phases: Vec<&str> = models.iter().map(|m| m.module.as_str()).collect();
            let root = self.templates.render(
                templates::ROOT_MOD,
                context! { header => model::header(&first.schema), phases => phases },
            )?;
            files.push(SourceFile::new("mod.rs", root));
        }

        files.extend(self.copy_artifacts(output)?);
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Copy script and JSON plan per transition
    pub fn copy_artifacts(&self, output: &PipelineOutput) -> Result<Vec<SourceFile>, CodegenError> {
        let mut files = Vec::new();
        for plan in &output.copy_plans {
            let script = plan
                .render_script(&self.options.copy_command)
                .map_err(|e| CodegenError::Template(e.to_string()))?;
            let json = plan.to_json().map_err(|e| CodegenError::Template(e.to_string()))?;

            let script_path = self.options.script_dir.join(plan.script_name());
            let plan_path = script_path.with_extension("json");
            files.push(SourceFile::new(script_path, script).executable());
            files.push(SourceFile::new(plan_path, json + "\n"));
        }
        Ok(files)
    }
}
