//! Identity subsystem collaborator
//!
//! The pseudonymization subsystem is external. The only thing consumed from
//! it is the list of tables it treats as identity tables, which is embedded
//! verbatim in each generated registry.

/// Reports the names of identity tables
pub trait IdentityTableSource {
    /// Identity table names, in the order they should be published
    fn identity_table_names(&self) -> Vec<String>;
}

/// Fixed list of identity tables, usually taken from `phasegen.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticIdentityTables {
    names: Vec<String>,
}

impl StaticIdentityTables {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }
}

impl IdentityTableSource for StaticIdentityTables {
    fn identity_table_names(&self) -> Vec<String> {
        self.names.clone()
    }
}
