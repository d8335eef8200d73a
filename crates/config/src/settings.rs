// Run settings
// Loaded from --settings, else ~/.config/payload-report/settings.toml, else defaults

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot read settings {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse settings {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Where payloads live and where reports go.
///
/// Every relative path except `root` is resolved against `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Repository root containing `BIPs/`.
    pub root: PathBuf,

    /// Combined report of every batch.
    pub reports_file: PathBuf,

    /// Directory receiving the weekly snapshot file.
    pub snapshot_dir: PathBuf,

    /// Address book + permissions document.
    pub address_book: PathBuf,

    /// Recorded chain state used for contract lookups.
    pub chain_state: PathBuf,

    pub snapshot_config: PathBuf,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            reports_file: PathBuf::from("payload_reports.txt"),
            snapshot_dir: PathBuf::from("BIPs/00snapshot"),
            address_book: PathBuf::from("addressbook.json"),
            chain_state: PathBuf::from("chain_state.json"),
            snapshot_config: PathBuf::from("snapshot_config.json"),
        }
    }
}

impl RunSettings {
    /// Per-user settings file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("payload-report").join("settings.toml"))
    }

    pub fn from_toml(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Load one settings file. Unlike the snapshot config, a broken settings
    /// file is an error.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Explicit path if given, else the per-user file if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match Self::config_path() {
            Some(path) if path.exists() => {
                log::debug!("using settings from {}", path.display());
                Self::load_from(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Resolve a settings path against `root`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn reports_path(&self) -> PathBuf {
        self.resolve(&self.reports_file)
    }

    pub fn snapshot_dir_path(&self) -> PathBuf {
        self.resolve(&self.snapshot_dir)
    }

    pub fn address_book_path(&self) -> PathBuf {
        self.resolve(&self.address_book)
    }

    pub fn chain_state_path(&self) -> PathBuf {
        self.resolve(&self.chain_state)
    }

    pub fn snapshot_config_path(&self) -> PathBuf {
        self.resolve(&self.snapshot_config)
    }
}

/// Commit rendered into report headers (`COMMIT_SHA`, else `N/A`).
pub fn commit_from_env() -> String {
    std::env::var("COMMIT_SHA")
        .ok()
        .filter(|sha| !sha.is_empty())
        .unwrap_or_else(|| "N/A".to_string())
}
