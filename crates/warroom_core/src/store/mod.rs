//! Persistence gateway for the task/mission document.
//!
//! # Responsibility
//! - Define the load/save contract the state manager depends on.
//! - Keep file-system details out of the service layer.
//!
//! # Invariants
//! - `load()` never fails because of unparseable content; corrupt data is
//!   replaced with the default document.
//! - `save()` always writes the whole document; there is no diffing.
//! - Backup failures are reported as data, never as errors.

pub mod json_store;
pub mod memory_store;

use crate::model::document::Document;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by document stores.
#[derive(Debug)]
pub enum StoreError {
    /// File-system failure while touching `path`.
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    /// Document could not be encoded.
    Serialize(serde_json::Error),
    /// Platform file browser could not be launched.
    OpenFolder { path: PathBuf, reason: String },
}

impl StoreError {
    pub(crate) fn io(action: &'static str, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io {
                action,
                path,
                source,
            } => write!(f, "failed to {action} `{}`: {source}", path.display()),
            Self::Serialize(err) => write!(f, "failed to encode document: {err}"),
            Self::OpenFolder { path, reason } => {
                write!(f, "failed to open folder `{}`: {reason}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::OpenFolder { .. } => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Load/save contract for the persisted document.
pub trait DocumentStore {
    /// Returns the stored document, substituting defaults when the backing
    /// data is missing or corrupt.
    fn load(&self) -> StoreResult<Document>;
    /// Overwrites the backing data with `document`.
    fn save(&self, document: &Document) -> StoreResult<()>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn load(&self) -> StoreResult<Document> {
        (**self).load()
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        (**self).save(document)
    }
}

/// Outcome envelope of a backup request.
///
/// Serialized as `{ "success": true, "file": ... }` or
/// `{ "success": false, "error": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BackupReport {
    pub(crate) fn created(file: PathBuf) -> Self {
        Self {
            success: true,
            file: Some(file),
            error: None,
        }
    }

    pub(crate) fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            file: None,
            error: Some(error.into()),
        }
    }
}

/// Pretty JSON encoding shared by all stores (two-space indent).
pub(crate) fn encode_document(document: &Document) -> StoreResult<String> {
    serde_json::to_string_pretty(document).map_err(StoreError::from)
}
