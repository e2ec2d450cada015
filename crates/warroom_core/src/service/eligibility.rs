//! Derived mission completion rules.
//!
//! # Invariants
//! - A mission is eligible iff it owns at least one task and every owned
//!   task is done. A mission with no tasks is never eligible.
//! - A manually completed mission must stay eligible; `stale_completions`
//!   finds the ones that are not.

use crate::model::mission::{CompletionState, Mission, MissionId};
use crate::model::task::Task;

/// Returns whether `mission_id` owns >= 1 task and all of them are done.
pub fn is_eligible(mission_id: &MissionId, tasks: &[Task]) -> bool {
    let mut owned = tasks
        .iter()
        .filter(|task| task.belongs_to(mission_id))
        .peekable();
    owned.peek().is_some() && owned.all(|task| task.is_done)
}

/// Display completion state of one mission.
pub fn completion_state(mission: &Mission, tasks: &[Task]) -> CompletionState {
    CompletionState::resolve(
        mission.is_manually_completed,
        is_eligible(&mission.id, tasks),
    )
}

/// Ids of missions flagged complete that are no longer eligible.
pub fn stale_completions(missions: &[Mission], tasks: &[Task]) -> Vec<MissionId> {
    missions
        .iter()
        .filter(|mission| mission.is_manually_completed && !is_eligible(&mission.id, tasks))
        .map(|mission| mission.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{completion_state, is_eligible, stale_completions};
    use crate::model::mission::{CompletionState, Mission};
    use crate::model::task::Task;

    fn owned(mission: &Mission, title: &str, done: bool) -> Task {
        let mut task = Task::new(title);
        task.mission_id = Some(mission.id.clone());
        task.is_done = done;
        task
    }

    #[test]
    fn mission_without_tasks_is_never_eligible() {
        let mission = Mission::new("empty");
        assert!(!is_eligible(&mission.id, &[Task::new("unrelated")]));
    }

    #[test]
    fn eligibility_requires_every_owned_task_done() {
        let mission = Mission::new("Alpha");
        let mut tasks = vec![owned(&mission, "a", true), owned(&mission, "b", false)];
        assert!(!is_eligible(&mission.id, &tasks));

        tasks[1].is_done = true;
        assert!(is_eligible(&mission.id, &tasks));

        tasks.push(Task::new("standalone open task"));
        assert!(is_eligible(&mission.id, &tasks));
    }

    #[test]
    fn manual_flag_wins_over_advisory_eligibility() {
        let mut mission = Mission::new("Alpha");
        let tasks = vec![owned(&mission, "a", true)];
        assert_eq!(completion_state(&mission, &tasks), CompletionState::Eligible);

        mission.is_manually_completed = true;
        assert_eq!(
            completion_state(&mission, &tasks),
            CompletionState::ManuallyCompleted
        );
        assert!(stale_completions(&[mission.clone()], &tasks).is_empty());
        assert_eq!(stale_completions(&[mission.clone()], &[]), vec![mission.id.clone()]);
    }
}
