//! Configuration schema (phasegen.toml)
//!
//! ```toml
//! identity_tables = ["user_dim", "pseudonym_dim"]
//!
//! [project]
//! name = "canvas-data"
//! output_dir = "generated"
//!
//! [schema]
//! path = "schema/phase0.json"
//!
//! [[phases]]
//! location = "s3://bucket/phase0"
//!
//! [[phases]]
//! location = "s3://bucket/phase1"
//! rules_dir = "rules/phase1"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default copy command template, rendered once per copied table
pub const DEFAULT_COPY_COMMAND: &str =
    "aws s3 cp --recursive {{ source | shell_quote }} {{ destination | shell_quote }}";

/// Project-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name, used in generated headers
    #[serde(default = "default_project_name")]
    pub name: String,

    /// Directory generated sources are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Build report path
    #[serde(default = "default_report_path")]
    pub report: PathBuf,
}

fn default_project_name() -> String {
    "phasegen".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("phasegen-report.json")
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            output_dir: default_output_dir(),
            report: default_report_path(),
        }
    }
}

/// Where the raw phase0 schema document lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSourceConfig {
    #[serde(default = "default_schema_path")]
    pub path: PathBuf,
}

fn default_schema_path() -> PathBuf {
    PathBuf::from("schema/phase0.json")
}

impl Default for SchemaSourceConfig {
    fn default() -> Self {
        Self {
            path: default_schema_path(),
        }
    }
}

/// One phase. The first entry is phase0 and its `rules_dir` is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    /// Opaque storage location of this phase's data
    pub location: String,

    /// Directory with `carry_forward/` and `extensions/` rule documents
    #[serde(default)]
    pub rules_dir: Option<PathBuf>,
}

/// Copy-plan rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyConfig {
    /// Command template with `source`, `destination` and `table` variables
    #[serde(default = "default_copy_command")]
    pub command: String,

    /// Directory (under the output dir) for copy scripts
    #[serde(default = "default_script_dir")]
    pub script_dir: PathBuf,
}

fn default_copy_command() -> String {
    DEFAULT_COPY_COMMAND.to_string()
}

fn default_script_dir() -> PathBuf {
    PathBuf::from("copy")
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            command: default_copy_command(),
            script_dir: default_script_dir(),
        }
    }
}

/// Code generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Crate path generated code uses for runtime support
    #[serde(default = "default_runtime_crate")]
    pub runtime_crate: String,

    /// Render tables of a phase in parallel
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_runtime_crate() -> String {
    "phasegen_runtime".to_string()
}

fn default_parallel() -> bool {
    true
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            runtime_crate: default_runtime_crate(),
            parallel: default_parallel(),
        }
    }
}

/// Contents of `phasegen.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Identity table names reported by the identity subsystem
    #[serde(default)]
    pub identity_tables: Vec<String>,

    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub schema: SchemaSourceConfig,

    /// Phases in ascending order, phase0 first
    #[serde(default)]
    pub phases: Vec<PhaseConfig>,

    #[serde(default)]
    pub copy: CopyConfig,

    #[serde(default)]
    pub codegen: CodegenConfig,

    /// Directory the config was loaded from
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            identity_tables: Vec::new(),
            project: ProjectConfig::default(),
            schema: SchemaSourceConfig::default(),
            phases: Vec::new(),
            copy: CopyConfig::default(),
            codegen: CodegenConfig::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Read `phasegen.toml`; relative paths resolve against its directory
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Parse and validate config text
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config back out as TOML
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.phases.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one [[phases]] entry (phase0) is required".to_string(),
            ));
        }

        for (ordinal, phase) in self.phases.iter().enumerate() {
            if phase.location.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "phase{} has an empty storage location",
                    ordinal
                )));
            }
        }

        if self.codegen.runtime_crate.trim().is_empty() {
            return Err(ConfigError::Invalid("codegen.runtime_crate must not be empty".to_string()));
        }

        Ok(())
    }

    /// Resolve a config-relative path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    /// Absolute output directory
    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.project.output_dir)
    }

    /// Absolute rules directory for phase `ordinal`, if any
    pub fn rules_dir(&self, ordinal: usize) -> Option<PathBuf> {
        if ordinal == 0 {
            return None;
        }
        self.phases
            .get(ordinal)
            .and_then(|p| p.rules_dir.as_ref())
            .map(|dir| self.resolve(dir))
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
