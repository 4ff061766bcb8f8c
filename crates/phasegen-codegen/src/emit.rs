//! Atomic artifact emission with an unchanged-content manifest

use crate::binding::SourceFile;
use crate::error::CodegenError;
use phasegen_core::{Diagnostic, DiagnosticCode, Severity};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Manifest file name, stored at the output root
pub const MANIFEST_FILE: &str = ".phasegen-manifest.json";

/// SHA-256 of every artifact written by the last build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitManifest {
    /// Output-relative path (forward slashes) -> content hash
    pub files: BTreeMap<String, String>,
}

/// What an emission did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    /// Artifacts of the previous build that are no longer generated
    pub removed: Vec<PathBuf>,
}

impl EmitSummary {
    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        let entry = |code, verb: &str, path: &PathBuf| {
            Diagnostic::new(code, Severity::Info, format!("{} {}", verb, path.display()))
        };

        self.written
            .iter()
            .map(|p| entry(DiagnosticCode::CodegenArtifactWritten, "Wrote", p))
            .chain(
                self.unchanged
                    .iter()
                    .map(|p| entry(DiagnosticCode::CodegenArtifactUnchanged, "Unchanged", p)),
            )
            .chain(
                self.removed
                    .iter()
                    .map(|p| entry(DiagnosticCode::CodegenArtifactRemoved, "Removed", p)),
            )
            .collect()
    }
}

/// Hex SHA-256 of artifact contents
pub fn content_hash(contents: &[u8]) -> String {
    hex::encode(Sha256::digest(contents))
}

fn manifest_key(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Path of a manifest entry under `root`
///
/// Manifest keys are read back from disk, so anything but a plain relative
/// path (absolute, `..`, `.`) is refused.
fn artifact_path(root: &Path, key: &str) -> Option<PathBuf> {
    let relative = Path::new(key);
    let mut components = relative.components().peekable();
    let plain = components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)));
    plain.then(|| root.join(relative))
}

/// Writes artifacts under one output root
pub struct Emitter {
    root: PathBuf,
    manifest: EmitManifest,
}

impl Emitter {
    /// Open `root`, reading the manifest of the previous build if present
    ///
    /// An unreadable manifest only costs a full rewrite, so it is ignored.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let manifest_path = root.join(MANIFEST_FILE);

        let manifest = match std::fs::read_to_string(&manifest_path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!(path = %manifest_path.display(), error = %e, "ignoring unreadable manifest");
                EmitManifest::default()
            }),
            Err(_) => EmitManifest::default(),
        };

        Self { root, manifest }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &EmitManifest {
        &self.manifest
    }

    /// Write every file whose content changed, then drop stale artifacts
    pub fn emit(&mut self, files: &[SourceFile]) -> Result<EmitSummary, CodegenError> {
        std::fs::create_dir_all(&self.root).map_err(|e| CodegenError::io(&self.root, e))?;

        let mut summary = EmitSummary::default();
        let mut next = EmitManifest::default();

        for file in files {
            let key = manifest_key(&file.path);
            let hash = content_hash(file.contents.as_bytes());
            let destination = self.root.join(&file.path);

            let unchanged = self.manifest.files.get(&key) == Some(&hash) && destination.exists();
            if unchanged {
                debug!(path = %key, "unchanged");
                summary.unchanged.push(file.path.clone());
            } else {
                write_atomic(&destination, file.contents.as_bytes(), file.executable)?;
                debug!(path = %key, "written");
                summary.written.push(file.path.clone());
            }
            next.files.insert(key, hash);
        }

        for stale in self.manifest.files.keys().filter(|k| !next.files.contains_key(*k)) {
            let Some(path) = artifact_path(&self.root, stale) else {
                warn!(path = %stale, "ignoring manifest entry outside the output directory");
                continue;
            };
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(CodegenError::io(&path, e)),
            }
            debug!(path = %stale, "removed stale artifact");
            summary.removed.push(PathBuf::from(stale));
        }

        let json = serde_json::to_string_pretty(&next).map_err(|e| CodegenError::Template(e.to_string()))?;
        write_atomic(&self.root.join(MANIFEST_FILE), json.as_bytes(), false)?;
        self.manifest = next;

        info!(
            written = summary.written.len(),
            unchanged = summary.unchanged.len(),
            removed = summary.removed.len(),
            "emitted artifacts"
        );
        Ok(summary)
    }
}

/// Write to a temporary file beside `path`, then rename over it
pub fn write_atomic(path: &Path, contents: &[u8], executable: bool) -> Result<(), CodegenError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| CodegenError::io(parent, e))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| CodegenError::io(path, e))?;
    temp.write_all(contents).map_err(|e| CodegenError::io(path, e))?;
    temp.flush().map_err(|e| CodegenError::io(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = if executable { 0o755 } else { 0o644 };
        temp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(mode))
            .map_err(|e| CodegenError::io(path, e))?;
    }
    #[cfg(not(unix))]
    let _ = executable;

    temp.persist(path).map_err(|e| CodegenError::io(path, e.error))?;
    Ok(())
}
