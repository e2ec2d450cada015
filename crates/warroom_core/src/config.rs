//! Storage location resolution.
//!
//! # Responsibility
//! - Decide where the backing JSON file and its backups live.
//!
//! # Invariants
//! - `WARROOM_DATA_DIR` wins over platform defaults when non-blank.
//! - Backups always live in a sibling `backups` directory of the data file.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "WARROOM_DATA_DIR";
/// File name of the persisted document inside the data directory.
pub const DATA_FILE_NAME: &str = "data.json";
/// Directory name for timestamped backups inside the data directory.
pub const BACKUPS_DIR_NAME: &str = "backups";

const APP_DIR_NAME: &str = "warroom";

/// Resolved file-system layout for one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Backing JSON document.
    pub data_file: PathBuf,
    /// Destination of `backup()` snapshots.
    pub backups_dir: PathBuf,
}

impl StorageConfig {
    /// Lays out storage under an explicit directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            data_file: dir.join(DATA_FILE_NAME),
            backups_dir: dir.join(BACKUPS_DIR_NAME),
        }
    }

    /// Resolves storage from `WARROOM_DATA_DIR`, then the platform data
    /// directory, then the system temp directory.
    pub fn from_env() -> Self {
        Self::in_dir(resolve_data_dir(std::env::var(DATA_DIR_ENV).ok()))
    }

    /// Directory holding the backing file.
    pub fn data_dir(&self) -> &Path {
        self.data_file.parent().unwrap_or_else(|| Path::new("."))
    }
}

fn resolve_data_dir(env_value: Option<String>) -> PathBuf {
    if let Some(raw) = env_value {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}
