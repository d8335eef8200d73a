// Configuration loading

pub mod settings;
pub mod snapshot;

pub use settings::{commit_from_env, RunSettings, SettingsError};
pub use snapshot::{SnapshotConfig, DEFAULT_OPTION_PREFIX};
