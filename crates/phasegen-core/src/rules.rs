//! Phase transform rules and their discovery on disk
//!
//! A phase's rules live in one directory:
//!
//! ```text
//! rules/phase1/
//!   carry_forward/requests.json
//!   carry_forward/users.toml
//!   extensions/users_extra.json
//! ```
//!
//! Each file holds exactly one rule document. JSON and TOML are both accepted.

use crate::document::{CarryForwardRule, TableDocument};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory holding carry-forward rule documents
pub const CARRY_FORWARD_DIR: &str = "carry_forward";

/// Directory holding extension rule documents
pub const EXTENSIONS_DIR: &str = "extensions";

/// Transform rules for a single phase transition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PhaseRules {
    /// Carry-forward rules keyed by source table
    #[serde(default)]
    pub carry_forward: BTreeMap<String, CarryForwardRule>,

    /// Wholly new tables introduced at this phase
    #[serde(default)]
    pub extensions: Vec<TableDocument>,
}

impl PhaseRules {
    /// Empty rule set: every table is carried forward unchanged
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a carry-forward rule, rejecting a second rule for the same table
    pub fn add_carry_forward(&mut self, rule: CarryForwardRule) -> Result<(), RuleLoadError> {
        if self.carry_forward.contains_key(&rule.source_table) {
            return Err(RuleLoadError::DuplicateRule(rule.source_table));
        }
        self.carry_forward.insert(rule.source_table.clone(), rule);
        Ok(())
    }

    /// Add an extension rule
    pub fn add_extension(&mut self, table: TableDocument) {
        self.extensions.push(table);
    }

    /// Builder form of [`PhaseRules::add_carry_forward`] for tests and fixtures
    pub fn with_carry_forward(mut self, rule: CarryForwardRule) -> Result<Self, RuleLoadError> {
        self.add_carry_forward(rule)?;
        Ok(self)
    }

    /// Builder form of [`PhaseRules::add_extension`]
    pub fn with_extension(mut self, table: TableDocument) -> Self {
        self.add_extension(table);
        self
    }

    /// Parse a single JSON rule set `{carry_forward: [...], extensions: [...]}`
    pub fn from_json(json: &str) -> Result<Self, RuleLoadError> {
        let doc: RuleSetDocument = serde_json::from_str(json)
            .map_err(|e| RuleLoadError::ParseError("<inline>".to_string(), e.to_string()))?;

        let mut rules = Self::new();
        for rule in doc.carry_forward {
            rules.add_carry_forward(rule)?;
        }
        rules.extensions = doc.extensions;
        Ok(rules)
    }

    /// Load every rule document under `dir`
    ///
    /// Files are read in path order so that the resulting rule set does not
    /// depend on directory listing order. A missing directory is an empty
    /// rule set.
    pub fn load_dir(dir: &Path) -> Result<Self, RuleLoadError> {
        let mut rules = Self::new();

        for path in rule_files(&dir.join(CARRY_FORWARD_DIR))? {
            let rule: CarryForwardRule = parse_document(&path)?;
            rules.add_carry_forward(rule)?;
        }

        for path in rule_files(&dir.join(EXTENSIONS_DIR))? {
            let table: TableDocument = parse_document(&path)?;
            rules.add_extension(table);
        }

        Ok(rules)
    }

    /// Whether this rule set changes nothing
    pub fn is_empty(&self) -> bool {
        self.carry_forward.is_empty() && self.extensions.is_empty()
    }
}

/// Single-document form of a rule set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RuleSetDocument {
    #[serde(default)]
    carry_forward: Vec<CarryForwardRule>,

    #[serde(default)]
    extensions: Vec<TableDocument>,
}

/// Collect `.json` / `.toml` files under `dir`, sorted by path
fn rule_files(dir: &Path) -> Result<Vec<PathBuf>, RuleLoadError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| RuleLoadError::IoError(dir.display().to_string(), e.to_string()))?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if matches!(path.extension().and_then(|e| e.to_str()), Some("json") | Some("toml")) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Parse one rule document by extension
fn parse_document<T: DeserializeOwned>(path: &Path) -> Result<T, RuleLoadError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| RuleLoadError::IoError(path.display().to_string(), e.to_string()))?;

    let parsed = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&contents).map_err(|e| e.to_string()),
        _ => serde_json::from_str(&contents).map_err(|e| e.to_string()),
    };

    parsed.map_err(|e| RuleLoadError::ParseError(path.display().to_string(), e))
}

/// Errors loading rule documents
#[derive(Debug, thiserror::Error)]
pub enum RuleLoadError {
    #[error("IO error reading {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse rule document {0}: {1}")]
    ParseError(String, String),

    #[error("More than one carry-forward rule for table '{0}'")]
    DuplicateRule(String),
}
