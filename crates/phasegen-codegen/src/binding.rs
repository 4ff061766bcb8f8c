//! Typed record bindings, one module per table

use crate::error::CodegenError;
use crate::model::{PhaseModel, TableModel};
use crate::templates::{self, Templates};
use minijinja::context;
use phasegen_core::{Phase, Schema};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::debug;

/// A generated artifact, path relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub contents: String,
    pub executable: bool,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
            executable: false,
        }
    }

    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }
}

/// Renders table modules and the phase `mod.rs`
pub struct BindingGenerator<'a> {
    templates: &'a Templates,
    runtime_crate: &'a str,
    parallel: bool,
}

impl<'a> BindingGenerator<'a> {
    pub fn new(templates: &'a Templates, runtime_crate: &'a str) -> Self {
        Self {
            templates,
            runtime_crate,
            parallel: false,
        }
    }

    /// Render tables on the rayon pool
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validate and render every binding of one phase
    pub fn generate(&self, phase: &Phase, prior: Option<&Schema>) -> Result<Vec<SourceFile>, CodegenError> {
        let model = PhaseModel::build(phase, prior)?;
        self.generate_model(&model)
    }

    /// Render an already validated phase model
    pub fn generate_model(&self, model: &PhaseModel) -> Result<Vec<SourceFile>, CodegenError> {
        let render = |table: &TableModel| self.render_table(model, table);

        let mut files: Vec<SourceFile> = if self.parallel {
            model.tables.par_iter().map(render).collect::<Result<_, _>>()?
        } else {
            model.tables.iter().map(render).collect::<Result<_, _>>()?
        };

        let phase_mod = self.templates.render(
            templates::PHASE_MOD,
            context! {
                header => &model.header,
                phase => &model.module,
                tables => &model.tables,
            },
        )?;
        files.push(SourceFile::new(PathBuf::from(&model.module).join("mod.rs"), phase_mod));

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    fn render_table(&self, model: &PhaseModel, table: &TableModel) -> Result<SourceFile, CodegenError> {
        let contents = self.templates.render(
            templates::BINDING,
            context! {
                header => &model.header,
                phase => &model.module,
                runtime => self.runtime_crate,
                t => table,
            },
        )?;
        debug!(phase = model.ordinal, table = %table.name, "rendered binding");

        let path = PathBuf::from(&model.module).join(format!("{}.rs", table.file_stem));
        Ok(SourceFile::new(path, contents))
    }
}
