//! Snapshot directories: one YAML value file per root object.
//!
//! A root is named after its file's stem, so `payments.yaml` holds the root
//! `payments`. Only the top level of a directory is read.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use promo_types::{Document, Snapshot};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{SnapshotError, SnapshotResult};

/// Extension used for files written by [`write_dir`].
pub const YAML_EXTENSION: &str = "yaml";

/// What [`write_dir`] did to a directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Files written, one per root.
    pub written: Vec<PathBuf>,
    /// Value files removed because their root no longer exists.
    pub removed: Vec<PathBuf>,
}

/// Returns `true` for `*.yaml` and `*.yml` files.
pub fn is_value_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Parse one YAML value file. An empty file is an empty object.
pub fn load_file(path: &Path) -> SnapshotResult<Document> {
    let content = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_yaml(&content, path)
}

fn parse_yaml(content: &str, path: &Path) -> SnapshotResult<Document> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content).map_err(|source| SnapshotError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    if yaml.is_null() {
        return Ok(Document::empty_object());
    }
    // Non-string YAML keys become their JSON text.
    let value = serde_json::to_value(yaml).map_err(|e| SnapshotError::Serialization(e.to_string()))?;
    Ok(Document::from(value))
}

/// The value files directly inside `dir`, sorted by file name.
fn value_files(dir: &Path) -> SnapshotResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SnapshotError::NotADirectory(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_value_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn root_name(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|stem| stem.to_str())
}

/// Load every value file in `dir` into a snapshot keyed by file stem.
pub fn load_dir(dir: &Path) -> SnapshotResult<Snapshot> {
    let mut snapshot = Snapshot::new();
    for file in value_files(dir)? {
        let Some(root) = root_name(&file) else {
            warn!(path = %file.display(), "skipping file with a non UTF-8 name");
            continue;
        };
        let doc = load_file(&file)?;
        if snapshot.insert(root, doc).is_some() {
            warn!(root, path = %file.display(), "root defined by more than one file; last one wins");
        }
        debug!(root, path = %file.display(), "loaded root object");
    }
    info!(dir = %dir.display(), roots = snapshot.len(), "loaded snapshot");
    Ok(snapshot)
}

/// Write one `<root>.yaml` per root into `dir`, creating it if needed, and
/// remove value files whose root is no longer in the snapshot.
pub fn write_dir(snapshot: &Snapshot, dir: &Path) -> SnapshotResult<WriteReport> {
    fs::create_dir_all(dir).map_err(|source| SnapshotError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut report = WriteReport::default();
    let live: BTreeSet<&str> = snapshot.names().collect();

    for file in value_files(dir)? {
        let stale = root_name(&file).map_or(true, |root| !live.contains(root))
            || file.extension().and_then(|e| e.to_str()) != Some(YAML_EXTENSION);
        if stale {
            fs::remove_file(&file).map_err(|source| SnapshotError::Io {
                path: file.clone(),
                source,
            })?;
            debug!(path = %file.display(), "removed value file");
            report.removed.push(file);
        }
    }

    for (root, doc) in snapshot.iter() {
        let file = dir.join(format!("{root}.{YAML_EXTENSION}"));
        let yaml = serde_yaml::to_string(doc).map_err(|source| SnapshotError::Yaml {
            path: file.clone(),
            source,
        })?;
        fs::write(&file, yaml).map_err(|source| SnapshotError::Io {
            path: file.clone(),
            source,
        })?;
        report.written.push(file);
    }

    info!(
        dir = %dir.display(),
        written = report.written.len(),
        removed = report.removed.len(),
        "wrote snapshot"
    );
    Ok(report)
}
