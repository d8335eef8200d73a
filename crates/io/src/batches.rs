// Payload batch loading

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use payload_core::Batch;

use crate::error::LoadError;

/// Directory under the repository root holding payload files.
pub const PAYLOAD_DIR: &str = "BIPs";

/// Load one payload file.
///
/// Relative paths resolve against `root`. The batch's file name is the path
/// relative to `root` with forward slashes.
pub fn load_batch(root: &Path, path: &Path) -> Result<Batch, LoadError> {
    let full = if path.is_absolute() { path.to_path_buf() } else { root.join(path) };
    if !full.is_file() {
        return Err(LoadError::Missing { path: full });
    }
    let contents = fs::read_to_string(&full).map_err(|source| LoadError::Read {
        path: full.clone(),
        source,
    })?;
    let value: Value = serde_json::from_str(&contents).map_err(|source| LoadError::Json {
        path: full.clone(),
        source,
    })?;
    let Value::Object(map) = &value else {
        return Err(LoadError::NotAnObject { path: full });
    };
    if !map.get("transactions").is_some_and(Value::is_array) {
        return Err(LoadError::NoTransactions { path: full });
    }

    let file_name = relative_name(root, &full);
    Batch::from_value(file_name, value).map_err(|source| LoadError::Json { path: full, source })
}

/// Load every path, logging and skipping the ones that fail.
pub fn load_batches(root: &Path, paths: &[PathBuf]) -> Vec<Batch> {
    let mut batches = Vec::new();
    for path in paths {
        match load_batch(root, path) {
            Ok(batch) => {
                log::debug!("loaded {} ({} transactions)", batch.file_name, batch.len());
                batches.push(batch);
            }
            Err(e) => log::warn!("{e}"),
        }
    }
    batches
}

/// Every `*.json` under `root/BIPs`, sorted.
pub fn discover_batches(root: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let dir = root.join(PAYLOAD_DIR);
    if !dir.is_dir() {
        return Err(LoadError::Missing { path: dir });
    }
    let mut paths = Vec::new();
    for entry in WalkDir::new(&dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|source| LoadError::Walk {
            path: dir.clone(),
            source,
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            paths.push(path.to_path_buf());
        }
    }
    Ok(paths)
}

/// `full` relative to `root`, joined with `/`.
fn relative_name(root: &Path, full: &Path) -> String {
    let relative = full.strip_prefix(root).unwrap_or(full);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
