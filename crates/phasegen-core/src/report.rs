//! `phasegen-report.json`, the versioned build report
//!
//! Consumers match on the major version; fields are only ever added in a
//! minor version.

use crate::diagnostic::{Diagnostic, Severity};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    pub major: u32,
    pub minor: u32,
}

impl ReportVersion {
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Diagnostic counts plus what the build did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReportSummary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,

    pub phases_built: usize,

    /// Tables left to the batch runtime to rebuild
    pub tables_regenerated: usize,

    /// Tables covered by copy plans
    pub tables_copied: usize,

    pub files_written: usize,

    /// Artifacts skipped because their content hash was unchanged
    pub files_unchanged: usize,
}

impl ReportSummary {
    fn count(&mut self, severity: Severity) {
        self.total += 1;
        match severity {
            Severity::Error => self.errors += 1,
            Severity::Warn => self.warnings += 1,
            Severity::Info => self.info += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub version: ReportVersion,

    /// RFC 3339, UTC
    pub timestamp: String,

    pub summary: ReportSummary,

    pub diagnostics: Vec<Diagnostic>,

    /// Schema fingerprint of every phase, phase0 first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fingerprints: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: ReportSummary::default(),
            diagnostics: Vec::new(),
            fingerprints: Vec::new(),
        }
    }

    pub fn from_diagnostics(diagnostics: impl IntoIterator<Item = Diagnostic>) -> Self {
        let mut report = Self::new();
        report.extend(diagnostics);
        report
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.summary.count(diagnostic.severity);
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.add_diagnostic(diagnostic);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// Phases whose schema differs from `previous`, including phases it lacked
    pub fn changed_phases(&self, previous: &Report) -> Vec<u32> {
        self.fingerprints
            .iter()
            .enumerate()
            .filter(|(ordinal, fingerprint)| previous.fingerprints.get(*ordinal) != Some(*fingerprint))
            .map(|(ordinal, _)| ordinal as u32)
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report, creating its directory if needed
    pub fn save_to_file(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json + "\n")
    }

    /// Read a report written by an earlier build
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(std::io::Error::other)
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}
