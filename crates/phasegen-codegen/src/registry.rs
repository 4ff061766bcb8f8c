//! Per-phase table registry (`tables.rs`)

use crate::binding::SourceFile;
use crate::error::CodegenError;
use crate::model::PhaseModel;
use crate::naming;
use crate::templates::{self, Templates};
use minijinja::context;
use phasegen_core::IdentityTableSource;
use std::path::PathBuf;

/// Renders the closed name -> descriptor mapping of a phase
pub struct RegistryGenerator<'a> {
    templates: &'a Templates,
    runtime_crate: &'a str,
    identity: &'a dyn IdentityTableSource,
}

impl<'a> RegistryGenerator<'a> {
    pub fn new(templates: &'a Templates, runtime_crate: &'a str, identity: &'a dyn IdentityTableSource) -> Self {
        Self {
            templates,
            runtime_crate,
            identity,
        }
    }

    pub fn generate(&self, model: &PhaseModel) -> Result<SourceFile, CodegenError> {
        let identity_tables = self
            .identity
            .identity_table_names()
            .iter()
            .map(|name| naming::string_literal(name))
            .collect::<Vec<_>>()
            .join(", ");

        let contents = self.templates.render(
            templates::REGISTRY,
            context! {
                header => &model.header,
                phase => &model.module,
                runtime => self.runtime_crate,
                identity_tables => identity_tables,
                tables => &model.tables,
            },
        )?;

        Ok(SourceFile::new(PathBuf::from(&model.module).join("tables.rs"), contents))
    }
}
