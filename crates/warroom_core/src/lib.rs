//! Core domain logic for WAR ROOM.
//! This crate is the single source of truth for task/mission invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::StorageConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::Document;
pub use model::id::RecordId;
pub use model::mission::{CompletionState, Mission, MissionId};
pub use model::settings::Settings;
pub use model::task::{Task, TaskId};
pub use service::eligibility::is_eligible;
pub use service::state_manager::{
    DeletedMission, DeletedTask, MissionDeleteMode, ServiceError, ServiceResult, StateManager,
    UndoOutcome,
};
pub use service::title::{normalize_title, TitleError, MAX_TITLE_CHARS};
pub use service::undo::UNDO_WINDOW;
pub use service::visibility::{
    filter_for_visibility, MissionGroup, ParseVisibilityModeError, VisibilityMode, VisibleBoard,
};
pub use store::json_store::JsonFileStore;
pub use store::memory_store::MemoryStore;
pub use store::{BackupReport, DocumentStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
