//! Persisted top-level aggregate.
//!
//! # Responsibility
//! - Hold the task, mission and settings collections as one unit.
//!
//! # Invariants
//! - Collection order is meaningful (display order, undo positions).
//! - Lookups by id never assume a referenced mission exists.

use crate::model::mission::{Mission, MissionId};
use crate::model::settings::Settings;
use crate::model::task::{Task, TaskId};
use serde::{Deserialize, Serialize};

/// Full state written to and read from the backing file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub missions: Vec<Mission>,
    #[serde(default)]
    pub settings: Settings,
}

impl Document {
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn mission(&self, id: &MissionId) -> Option<&Mission> {
        self.missions.iter().find(|mission| &mission.id == id)
    }

    pub fn task_position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }

    pub fn mission_position(&self, id: &MissionId) -> Option<usize> {
        self.missions.iter().position(|mission| &mission.id == id)
    }

    /// Tasks owned by `mission_id`, in collection order.
    pub fn tasks_for_mission(&self, mission_id: &MissionId) -> impl Iterator<Item = &Task> + '_ {
        let mission_id = mission_id.clone();
        self.tasks
            .iter()
            .filter(move |task| task.belongs_to(&mission_id))
    }
}

#[cfg(test)]
mod tests {
    use super::Document;
    use crate::model::mission::Mission;
    use crate::model::task::Task;

    #[test]
    fn lookups_resolve_by_id_and_position() {
        let mission = Mission::new("Alpha");
        let mut owned = Task::new("owned");
        owned.mission_id = Some(mission.id.clone());
        let loose = Task::new("loose");

        let document = Document {
            tasks: vec![loose.clone(), owned.clone()],
            missions: vec![mission.clone()],
            ..Document::default()
        };

        assert_eq!(document.task(&owned.id), Some(&owned));
        assert_eq!(document.task_position(&owned.id), Some(1));
        assert_eq!(document.mission_position(&mission.id), Some(0));
        assert_eq!(document.mission(&"m-gone".into()), None);
        let titles: Vec<_> = document
            .tasks_for_mission(&mission.id)
            .map(|task| task.title.as_str())
            .collect();
        assert_eq!(titles, ["owned"]);
    }
}
