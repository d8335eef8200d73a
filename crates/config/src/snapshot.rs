// Snapshot vote-option settings
// Loaded from snapshot_config.json next to the payloads; optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Prefix placed before every gauge symbol in a snapshot vote option.
pub const DEFAULT_OPTION_PREFIX: &str = "BG###: ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Prepended to each option; counts against the option length limit.
    pub option_prefix: String,

    /// Markdown emitted before the option list.
    pub md_prefix: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            option_prefix: DEFAULT_OPTION_PREFIX.to_string(),
            md_prefix: String::new(),
        }
    }
}

impl SnapshotConfig {
    /// Load from disk. A missing or malformed file means defaults.
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                log::debug!("no snapshot config at {} ({e}); using defaults", path.display());
                return Self::default();
            }
        };
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Self {
        match serde_json::from_str(contents) {
            Ok(config) => config,
            Err(e) => {
                log::debug!("ignoring malformed snapshot config: {e}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SnapshotConfig::default();
        assert_eq!(config.option_prefix, "BG###: ");
        assert_eq!(config.md_prefix, "");
    }

    #[test]
    fn partial_override() {
        let config = SnapshotConfig::from_json(r#"{"option_prefix": "BG12: "}"#);
        assert_eq!(config.option_prefix, "BG12: ");
        assert_eq!(config.md_prefix, "");
    }

    #[test]
    fn unknown_keys_ignored() {
        let config = SnapshotConfig::from_json(r###"{"md_prefix": "## Gauges\n", "extra": 1}"###);
        assert_eq!(config.md_prefix, "## Gauges\n");
        assert_eq!(config.option_prefix, DEFAULT_OPTION_PREFIX);
    }

    #[test]
    fn malformed_falls_back() {
        assert_eq!(SnapshotConfig::from_json("{not json"), SnapshotConfig::default());
        assert_eq!(SnapshotConfig::from_json(r#"{"option_prefix": 5}"#), SnapshotConfig::default());
    }

    #[test]
    fn missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = SnapshotConfig::load(&dir.path().join("snapshot_config.json"));
        assert_eq!(config, SnapshotConfig::default());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot_config.json");
        std::fs::write(&path, r#"{"option_prefix": "X: ", "md_prefix": "md\n"}"#).unwrap();
        let config = SnapshotConfig::load(&path);
        assert_eq!(config.option_prefix, "X: ");
        assert_eq!(config.md_prefix, "md\n");
    }
}
