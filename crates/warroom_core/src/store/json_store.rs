//! File-backed JSON document store.
//!
//! # Responsibility
//! - Read and rewrite the single backing `data.json` file.
//! - Create timestamped backups and reveal the storage folder.
//!
//! # Invariants
//! - A missing file is created with the default document on first load.
//! - A corrupt file is overwritten with defaults; its content is not kept.
//! - Single writer: no locking, no atomic rename.

use super::{encode_document, BackupReport, DocumentStore, StoreError, StoreResult};
use crate::config::StorageConfig;
use crate::model::document::Document;
use crate::model::now_epoch_ms;
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::io;
use std::process::Command;
use std::thread;
use std::time::Instant;

const BACKUP_FILE_PREFIX: &str = "data-";
const BACKUP_FILE_EXTENSION: &str = "json";

/// Document store persisting to one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    config: StorageConfig,
}

impl JsonFileStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Store rooted at the environment-resolved data directory.
    pub fn from_env() -> Self {
        Self::new(StorageConfig::from_env())
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn data_file(&self) -> &Path {
        &self.config.data_file
    }

    /// Directory the UI shell should reveal for "open storage folder".
    pub fn storage_dir(&self) -> &Path {
        self.config.data_dir()
    }

    /// Copies the backing file to `backups/data-<epoch_ms>.json`.
    ///
    /// Never returns an error; failures are folded into the report.
    pub fn backup(&self) -> BackupReport {
        match self.try_backup() {
            Ok(file) => {
                info!(
                    "event=store_backup module=store status=ok file={}",
                    file.display()
                );
                BackupReport::created(file)
            }
            Err(err) => {
                warn!("event=store_backup module=store status=error error={err}");
                BackupReport::failed(err.to_string())
            }
        }
    }

    /// Launches the platform file browser on the storage directory.
    pub fn open_storage_folder(&self) -> StoreResult<()> {
        let dir = self.storage_dir().to_path_buf();
        fs::create_dir_all(&dir).map_err(|err| StoreError::io("create directory", &dir, err))?;

        spawn_detached(Command::new(platform_opener()).arg(&dir)).map_err(|err| {
            StoreError::OpenFolder {
                path: dir.clone(),
                reason: err.to_string(),
            }
        })?;

        info!(
            "event=store_open_folder module=store status=ok dir={}",
            dir.display()
        );
        Ok(())
    }

    fn try_backup(&self) -> StoreResult<PathBuf> {
        let source = self.data_file();
        let backups_dir = &self.config.backups_dir;
        fs::create_dir_all(backups_dir)
            .map_err(|err| StoreError::io("create directory", backups_dir, err))?;

        let target = next_backup_path(backups_dir, now_epoch_ms());
        fs::copy(source, &target).map_err(|err| StoreError::io("copy", source, err))?;
        Ok(target)
    }

    fn write_document(&self, document: &Document) -> StoreResult<()> {
        let path = self.data_file();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| StoreError::io("create directory", parent, err))?;
        }
        let encoded = encode_document(document)?;
        fs::write(path, encoded).map_err(|err| StoreError::io("write", path, err))
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> StoreResult<Document> {
        let started_at = Instant::now();
        let path = self.data_file();

        if !path.exists() {
            let document = Document::default();
            self.write_document(&document)?;
            info!(
                "event=store_load module=store status=created path={} duration_ms={}",
                path.display(),
                started_at.elapsed().as_millis()
            );
            return Ok(document);
        }

        let raw = fs::read(path).map_err(|err| StoreError::io("read", path, err))?;
        match serde_json::from_slice::<Document>(&raw) {
            Ok(document) => {
                info!(
                    "event=store_load module=store status=ok tasks={} missions={} duration_ms={}",
                    document.tasks.len(),
                    document.missions.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(document)
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=corrupt error_code=document_parse_failed path={} error={}",
                    path.display(),
                    err
                );
                let document = Document::default();
                self.write_document(&document)?;
                Ok(document)
            }
        }
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.write_document(document) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok tasks={} missions={} duration_ms={}",
                    document.tasks.len(),
                    document.missions.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!("event=store_save module=store status=error error={err}");
                Err(err)
            }
        }
    }
}

fn next_backup_path(backups_dir: &Path, stamp: i64) -> PathBuf {
    let mut candidate =
        backups_dir.join(format!("{BACKUP_FILE_PREFIX}{stamp}.{BACKUP_FILE_EXTENSION}"));
    let mut suffix = 1;
    while candidate.exists() {
        candidate = backups_dir.join(format!(
            "{BACKUP_FILE_PREFIX}{stamp}-{suffix}.{BACKUP_FILE_EXTENSION}"
        ));
        suffix += 1;
    }
    candidate
}

/// Starts `command` and reaps it on a background thread.
fn spawn_detached(command: &mut Command) -> io::Result<thread::JoinHandle<()>> {
    let mut child = command.spawn()?;
    Ok(thread::spawn(move || {
        if let Err(err) = child.wait() {
            warn!("event=store_open_folder module=store status=wait_error error={err}");
        }
    }))
}

fn platform_opener() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

#[cfg(test)]
mod tests {
    use super::{next_backup_path, spawn_detached};
    use std::fs;
    use std::process::Command;

    #[test]
    fn backup_names_do_not_collide_within_one_millisecond() {
        let dir = tempfile::tempdir().unwrap();
        let first = next_backup_path(dir.path(), 42);
        assert!(first.ends_with("data-42.json"));

        fs::write(&first, "{}").unwrap();
        let second = next_backup_path(dir.path(), 42);
        assert!(second.ends_with("data-42-1.json"));
    }

    #[cfg(unix)]
    #[test]
    fn detached_child_is_reaped() {
        let reaper = spawn_detached(&mut Command::new("true")).unwrap();
        reaper.join().unwrap();
    }

    #[test]
    fn missing_opener_is_an_error() {
        assert!(spawn_detached(&mut Command::new("warroom-no-such-opener")).is_err());
    }
}
