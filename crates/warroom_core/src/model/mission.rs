//! Mission domain model.
//!
//! # Responsibility
//! - Define the named task grouping and its manual completion flag.
//!
//! # Invariants
//! - `is_manually_completed` is user-asserted and stored; eligibility is
//!   derived and never stored.
//! - Every mutation helper refreshes `updated_at`.
//! - Unknown fields are carried in `extra` and written back unchanged.

use crate::model::id::RecordId;
use crate::model::now_epoch_ms;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable identifier for a mission.
pub type MissionId = RecordId;

/// Named grouping of tasks with an independent completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: MissionId,
    pub title: String,
    #[serde(default)]
    pub is_manually_completed: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Mission {
    /// Creates an open mission with a generated id.
    pub fn new(title: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: MissionId::generate(),
            title: title.into(),
            is_manually_completed: false,
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        }
    }

    /// Sets the manual completion flag.
    ///
    /// Returns `true` when the stored value changed.
    pub fn set_manually_completed(&mut self, completed: bool) -> bool {
        if self.is_manually_completed == completed {
            return false;
        }
        self.is_manually_completed = completed;
        self.touch();
        true
    }

    pub fn rename(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = now_epoch_ms().max(self.updated_at);
    }
}

/// Display-level completion state of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    /// The user marked the mission complete.
    ManuallyCompleted,
    /// All owned tasks are done, but the user has not confirmed yet.
    Eligible,
    /// At least one owned task is open, or no task is owned.
    InProgress,
}

impl CompletionState {
    /// Combines the stored flag with derived eligibility.
    ///
    /// The manual flag wins; eligibility is only advisory.
    pub fn resolve(is_manually_completed: bool, eligible: bool) -> Self {
        if is_manually_completed {
            Self::ManuallyCompleted
        } else if eligible {
            Self::Eligible
        } else {
            Self::InProgress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CompletionState, Mission};
    use serde_json::json;

    #[test]
    fn unknown_fields_survive_roundtrip() {
        let mission: Mission = serde_json::from_value(json!({
            "id": "m1",
            "title": "Alpha",
            "color": "#ff0000"
        }))
        .unwrap();
        assert!(!mission.is_manually_completed);

        let encoded = serde_json::to_value(&mission).unwrap();
        assert_eq!(encoded["color"], json!("#ff0000"));
        assert_eq!(encoded["isManuallyCompleted"], json!(false));
    }

    #[test]
    fn manual_flag_wins_and_eligible_is_not_completed() {
        assert_eq!(
            CompletionState::resolve(true, false),
            CompletionState::ManuallyCompleted
        );
        assert_eq!(CompletionState::resolve(false, true), CompletionState::Eligible);
        assert_eq!(
            CompletionState::resolve(false, false),
            CompletionState::InProgress
        );
    }
}
