//! Task domain model.
//!
//! # Responsibility
//! - Define the atomic work item and its mutation helpers.
//!
//! # Invariants
//! - `id` is assigned once and never reused for another task.
//! - Every mutation helper refreshes `updated_at`.
//! - `created_at == updated_at` for a freshly created task.
//! - Fields this version does not know are carried in `extra` and written
//!   back unchanged.

use crate::model::id::RecordId;
use crate::model::mission::MissionId;
use crate::model::now_epoch_ms;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable identifier for a task.
pub type TaskId = RecordId;

/// Atomic work item, optionally grouped under a mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub is_done: bool,
    /// `None` marks a standalone task.
    #[serde(default)]
    pub mission_id: Option<MissionId>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Creates an open, standalone task with a generated id.
    ///
    /// The title is stored as given; length and blank checks belong to the
    /// input boundary (see `service::title`).
    pub fn new(title: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: TaskId::generate(),
            title: title.into(),
            is_done: false,
            mission_id: None,
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        }
    }

    /// Flips completion and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.is_done = !self.is_done;
        self.touch();
        self.is_done
    }

    /// Points this task at a mission, or detaches it with `None`.
    pub fn assign(&mut self, mission_id: Option<MissionId>) {
        self.mission_id = mission_id;
        self.touch();
    }

    pub fn rename(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    /// Returns whether this task is owned by `mission_id`.
    pub fn belongs_to(&self, mission_id: &MissionId) -> bool {
        self.mission_id.as_ref() == Some(mission_id)
    }

    fn touch(&mut self) {
        self.updated_at = now_epoch_ms().max(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::Task;
    use serde_json::json;

    #[test]
    fn unknown_fields_survive_roundtrip() {
        let task: Task = serde_json::from_value(json!({
            "id": "t1",
            "title": "ship it",
            "priority": 3,
            "tags": ["ops"]
        }))
        .unwrap();
        assert_eq!(task.extra.get("priority"), Some(&json!(3)));

        let encoded = serde_json::to_value(&task).unwrap();
        assert_eq!(encoded["id"], json!("t1"));
        assert_eq!(encoded["priority"], json!(3));
        assert_eq!(encoded["tags"], json!(["ops"]));
    }

    #[test]
    fn new_task_has_no_extra_fields() {
        let encoded = serde_json::to_value(Task::new("fresh")).unwrap();
        let mut keys: Vec<_> = encoded.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            ["createdAt", "id", "isDone", "missionId", "title", "updatedAt"]
        );
    }
}
