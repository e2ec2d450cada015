//! FFI collaborator API for the UI shell.
//!
//! # Responsibility
//! - Expose load/save/backup/folder/version calls to Dart via FRB.
//! - Move the document across the boundary as a JSON string.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures are returned as envelopes with `ok=false`, never raised.
//! - The data directory is resolved once per process.

use log::warn;
use std::sync::OnceLock;
use warroom_core::{
    core_version, init_logging as init_logging_inner, normalize_title as normalize_title_inner,
    Document, DocumentStore, JsonFileStore, StorageConfig,
};

static STORE: OnceLock<JsonFileStore> = OnceLock::new();

/// Document payload envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataResponse {
    pub ok: bool,
    /// Pretty JSON document; empty when `ok=false`.
    pub json: String,
    pub message: String,
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Backup envelope mirroring `{success, file?} | {success:false, error}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupResponse {
    pub success: bool,
    pub file: Option<String>,
    pub error: Option<String>,
}

/// Title normalization envelope for input fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleResponse {
    pub ok: bool,
    /// Normalized title; empty when rejected.
    pub title: String,
    pub message: String,
}

/// Returns the application version string.
#[flutter_rust_bridge::frb(sync)]
pub fn app_version() -> String {
    core_version().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and an error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Loads the persisted document, creating or resetting it when needed.
#[flutter_rust_bridge::frb(sync)]
pub fn load_data() -> DataResponse {
    load_data_from(resolve_store())
}

/// Replaces the persisted document with `json`.
///
/// Malformed payloads are rejected and leave the file untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn save_data(json: String) -> ActionResponse {
    save_data_to(resolve_store(), json.as_str())
}

/// Copies the backing file into the backups folder.
#[flutter_rust_bridge::frb(sync)]
pub fn backup_data() -> BackupResponse {
    let report = resolve_store().backup();
    BackupResponse {
        success: report.success,
        file: report.file.map(|path| path.display().to_string()),
        error: report.error,
    }
}

/// Reveals the storage folder in the platform file browser.
#[flutter_rust_bridge::frb(sync)]
pub fn open_storage_folder() -> ActionResponse {
    match resolve_store().open_storage_folder() {
        Ok(()) => ActionResponse::success("Storage folder opened."),
        Err(err) => ActionResponse::failure(format!("open_storage_folder failed: {err}")),
    }
}

/// Normalizes a task or mission title typed by the user.
#[flutter_rust_bridge::frb(sync)]
pub fn normalize_title(raw: String) -> TitleResponse {
    match normalize_title_inner(raw.as_str()) {
        Ok(title) => TitleResponse {
            ok: true,
            title,
            message: String::new(),
        },
        Err(err) => TitleResponse {
            ok: false,
            title: String::new(),
            message: err.to_string(),
        },
    }
}

fn load_data_from(store: &impl DocumentStore) -> DataResponse {
    let loaded = store
        .load()
        .map_err(|err| err.to_string())
        .and_then(|document| {
            serde_json::to_string_pretty(&document).map_err(|err| err.to_string())
        });
    match loaded {
        Ok(json) => DataResponse {
            ok: true,
            json,
            message: String::new(),
        },
        Err(err) => {
            warn!("event=ffi_load module=ffi status=error error={err}");
            DataResponse {
                ok: false,
                json: String::new(),
                message: format!("load_data failed: {err}"),
            }
        }
    }
}

fn save_data_to(store: &impl DocumentStore, json: &str) -> ActionResponse {
    let document = match serde_json::from_str::<Document>(json) {
        Ok(document) => document,
        Err(err) => {
            warn!("event=ffi_save module=ffi status=rejected error={err}");
            return ActionResponse::failure(format!("save_data rejected payload: {err}"));
        }
    };
    match store.save(&document) {
        Ok(()) => ActionResponse::success("Saved."),
        Err(err) => ActionResponse::failure(format!("save_data failed: {err}")),
    }
}

fn resolve_store() -> &'static JsonFileStore {
    STORE.get_or_init(|| JsonFileStore::new(StorageConfig::from_env()))
}
