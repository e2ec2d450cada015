//! Task/mission state manager.
//!
//! # Responsibility
//! - Own the canonical in-memory document for one session.
//! - Apply mutations, then persist the full snapshot through a store.
//! - Answer derived-state queries (eligibility, visibility grouping).
//!
//! # Invariants
//! - Every applied mutation is followed by exactly one full save.
//! - Unknown ids are logged no-ops that return `Ok(None)` and skip saving.
//! - After any task mutation, no mission keeps `is_manually_completed`
//!   while it is not eligible.
//! - A failed save keeps the in-memory mutation and surfaces
//!   `ServiceError::Persist`; callers may retry with `persist()`.

use crate::model::document::Document;
use crate::model::mission::{CompletionState, Mission, MissionId};
use crate::model::settings::Settings;
use crate::model::task::{Task, TaskId};
use crate::service::eligibility::{completion_state, is_eligible, stale_completions};
use crate::service::undo::{DeletePayload, UndoSlot};
use crate::service::visibility::{filter_for_visibility, VisibilityMode, VisibleBoard};
use crate::store::{DocumentStore, StoreError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from state manager operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Initial load failed.
    Load(StoreError),
    /// Mutation applied in memory but the snapshot was not saved.
    Persist(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "failed to load state: {err}"),
            Self::Persist(err) => write!(f, "state changed but was not saved: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) | Self::Persist(err) => Some(err),
        }
    }
}

/// Mission delete policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionDeleteMode {
    /// Delete the mission only; its tasks become standalone.
    DetachTasks,
    /// Delete the mission and every task it owns.
    DeleteTasks,
}

/// Result of a task delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedTask {
    pub task: Task,
    /// Position the task held before removal.
    pub index: usize,
}

/// Result of a mission delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedMission {
    pub mission: Mission,
    /// Position the mission held before removal.
    pub index: usize,
    pub mode: MissionDeleteMode,
    /// Pre-delete snapshots of the affected tasks (detached or removed).
    pub tasks: Vec<Task>,
}

/// What an undo brought back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    TaskRestored(TaskId),
    MissionRestored {
        mission_id: MissionId,
        restored_tasks: usize,
    },
}

/// Owned, injectable state container for one session.
pub struct StateManager<S: DocumentStore> {
    store: S,
    document: Document,
    undo: UndoSlot,
}

impl<S: DocumentStore> StateManager<S> {
    /// Loads the document through `store` and wraps it.
    pub fn open(store: S) -> ServiceResult<Self> {
        let document = store.load().map_err(ServiceError::Load)?;
        info!(
            "event=state_open module=service status=ok tasks={} missions={}",
            document.tasks.len(),
            document.missions.len()
        );
        Ok(Self::with_document(store, document))
    }

    /// Wraps an already loaded document without touching the store.
    pub fn with_document(store: S, document: Document) -> Self {
        Self {
            store,
            document,
            undo: UndoSlot::default(),
        }
    }

    /// Overrides the undo expiry window.
    pub fn with_undo_window(mut self, window: Duration) -> Self {
        self.undo = UndoSlot::new(window);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tasks(&self) -> &[Task] {
        &self.document.tasks
    }

    pub fn missions(&self) -> &[Mission] {
        &self.document.missions
    }

    pub fn settings(&self) -> &Settings {
        &self.document.settings
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.document.task(id)
    }

    pub fn mission(&self, id: &MissionId) -> Option<&Mission> {
        self.document.mission(id)
    }

    /// Tasks owned by `mission_id`, in collection order.
    pub fn tasks_for_mission(&self, mission_id: &MissionId) -> Vec<&Task> {
        self.document.tasks_for_mission(mission_id).collect()
    }

    /// Saves the full current snapshot.
    pub fn persist(&self) -> ServiceResult<()> {
        self.store.save(&self.document).map_err(|err| {
            warn!("event=state_persist module=service status=error error={err}");
            ServiceError::Persist(err)
        })
    }

    /// Appends a new open, standalone task.
    pub fn add_task(&mut self, title: impl Into<String>) -> ServiceResult<Task> {
        let task = Task::new(title);
        self.document.tasks.push(task.clone());
        info!(
            "event=task_add module=service status=ok task_id={} total={}",
            task.id,
            self.document.tasks.len()
        );
        self.persist()?;
        Ok(task)
    }

    /// Appends a new open mission.
    pub fn add_mission(&mut self, title: impl Into<String>) -> ServiceResult<Mission> {
        let mission = Mission::new(title);
        self.document.missions.push(mission.clone());
        info!(
            "event=mission_add module=service status=ok mission_id={} total={}",
            mission.id,
            self.document.missions.len()
        );
        self.persist()?;
        Ok(mission)
    }

    /// Flips a task's completion.
    pub fn toggle_task(&mut self, id: &TaskId) -> ServiceResult<Option<Task>> {
        let Some(task) = self.task_mut(id) else {
            warn!("event=task_toggle module=service status=not_found task_id={id}");
            return Ok(None);
        };
        let is_done = task.toggle();
        let task = task.clone();
        debug!("event=task_toggle module=service status=ok task_id={id} is_done={is_done}");

        self.reconcile_completions();
        self.persist()?;
        Ok(Some(task))
    }

    /// Moves a task under a mission, or detaches it with `None`.
    ///
    /// The mission id is not checked; a dangling reference reads as
    /// standalone.
    pub fn assign_task_to_mission(
        &mut self,
        task_id: &TaskId,
        mission_id: Option<MissionId>,
    ) -> ServiceResult<Option<Task>> {
        let dangling = mission_id
            .as_ref()
            .is_some_and(|id| self.document.mission(id).is_none());
        let Some(task) = self.task_mut(task_id) else {
            warn!("event=task_assign module=service status=not_found task_id={task_id}");
            return Ok(None);
        };
        task.assign(mission_id);
        let task = task.clone();
        if dangling {
            warn!(
                "event=task_assign module=service status=dangling task_id={task_id} mission_id={}",
                task.mission_id.as_ref().map(|id| id.as_str()).unwrap_or_default()
            );
        }

        self.reconcile_completions();
        self.persist()?;
        Ok(Some(task))
    }

    pub fn rename_task(
        &mut self,
        id: &TaskId,
        title: impl Into<String>,
    ) -> ServiceResult<Option<Task>> {
        let Some(task) = self.task_mut(id) else {
            warn!("event=task_rename module=service status=not_found task_id={id}");
            return Ok(None);
        };
        task.rename(title);
        let task = task.clone();
        self.persist()?;
        Ok(Some(task))
    }

    pub fn rename_mission(
        &mut self,
        id: &MissionId,
        title: impl Into<String>,
    ) -> ServiceResult<Option<Mission>> {
        let Some(mission) = self.mission_mut(id) else {
            warn!("event=mission_rename module=service status=not_found mission_id={id}");
            return Ok(None);
        };
        mission.rename(title);
        let mission = mission.clone();
        self.persist()?;
        Ok(Some(mission))
    }

    /// Sets or clears a mission's manual completion.
    ///
    /// Completing requires eligibility; an ineligible mission is returned
    /// unchanged and nothing is saved. Clearing always applies.
    pub fn set_mission_completed(
        &mut self,
        id: &MissionId,
        completed: bool,
    ) -> ServiceResult<Option<Mission>> {
        let eligible = is_eligible(id, &self.document.tasks);
        let Some(mission) = self.mission_mut(id) else {
            warn!("event=mission_complete module=service status=not_found mission_id={id}");
            return Ok(None);
        };
        if completed && !eligible {
            warn!("event=mission_complete module=service status=rejected reason=not_eligible mission_id={id}");
            return Ok(Some(mission.clone()));
        }

        mission.set_manually_completed(completed);
        let mission = mission.clone();
        info!("event=mission_complete module=service status=ok mission_id={id} completed={completed}");
        self.persist()?;
        Ok(Some(mission))
    }

    /// Applies `update` to the settings bag and saves.
    pub fn update_settings(&mut self, update: impl FnOnce(&mut Settings)) -> ServiceResult<()> {
        update(&mut self.document.settings);
        self.persist()
    }

    /// Removes a task and records it for undo.
    pub fn delete_task(&mut self, id: &TaskId) -> ServiceResult<Option<DeletedTask>> {
        let Some(index) = self.document.task_position(id) else {
            warn!("event=task_delete module=service status=not_found task_id={id}");
            return Ok(None);
        };
        let task = self.document.tasks.remove(index);
        let cleared_missions = self.reconcile_completions();

        self.undo.record(
            DeletePayload::Task {
                task: task.clone(),
                index,
                cleared_missions,
            },
            Instant::now(),
        );
        info!("event=task_delete module=service status=ok task_id={id} index={index}");
        self.persist()?;
        Ok(Some(DeletedTask { task, index }))
    }

    /// Removes a mission and makes its tasks standalone.
    pub fn delete_mission_only(&mut self, id: &MissionId) -> ServiceResult<Option<DeletedMission>> {
        self.delete_mission(id, MissionDeleteMode::DetachTasks)
    }

    /// Removes a mission together with every task it owns.
    pub fn delete_mission_and_tasks(
        &mut self,
        id: &MissionId,
    ) -> ServiceResult<Option<DeletedMission>> {
        self.delete_mission(id, MissionDeleteMode::DeleteTasks)
    }

    /// Removes a mission using `mode` and records it for undo.
    pub fn delete_mission(
        &mut self,
        id: &MissionId,
        mode: MissionDeleteMode,
    ) -> ServiceResult<Option<DeletedMission>> {
        let Some(index) = self.document.mission_position(id) else {
            warn!("event=mission_delete module=service status=not_found mission_id={id}");
            return Ok(None);
        };
        let mission = self.document.missions.remove(index);

        let (payload, tasks) = match mode {
            MissionDeleteMode::DetachTasks => {
                let mut detached = Vec::new();
                for task in self.document.tasks.iter_mut().filter(|t| t.belongs_to(id)) {
                    detached.push(task.clone());
                    task.assign(None);
                }
                let payload = DeletePayload::MissionOnly {
                    mission: mission.clone(),
                    index,
                    detached: detached.clone(),
                };
                (payload, detached)
            }
            MissionDeleteMode::DeleteTasks => {
                let mut removed = Vec::new();
                let mut kept = Vec::with_capacity(self.document.tasks.len());
                for (position, task) in std::mem::take(&mut self.document.tasks)
                    .into_iter()
                    .enumerate()
                {
                    if task.belongs_to(id) {
                        removed.push((position, task));
                    } else {
                        kept.push(task);
                    }
                }
                self.document.tasks = kept;
                let tasks: Vec<Task> = removed.iter().map(|(_, task)| task.clone()).collect();
                let payload = DeletePayload::MissionAndTasks {
                    mission: mission.clone(),
                    index,
                    removed,
                };
                (payload, tasks)
            }
        };

        self.reconcile_completions();
        self.undo.record(payload, Instant::now());
        info!(
            "event=mission_delete module=service status=ok mission_id={id} mode={mode:?} tasks={}",
            tasks.len()
        );
        self.persist()?;
        Ok(Some(DeletedMission {
            mission,
            index,
            mode,
            tasks,
        }))
    }

    /// Returns whether a delete can still be undone.
    pub fn has_pending_undo(&self) -> bool {
        self.undo.is_pending(Instant::now())
    }

    /// Drops the pending undo once its window has passed.
    pub fn expire_pending_undo(&mut self) -> bool {
        self.undo.expire(Instant::now())
    }

    /// Reverses the most recent delete, if it has not expired.
    ///
    /// A second call without an intervening delete is a no-op.
    pub fn undo_last_delete(&mut self) -> ServiceResult<Option<UndoOutcome>> {
        let Some(payload) = self.undo.take(Instant::now()) else {
            debug!("event=undo module=service status=empty");
            return Ok(None);
        };

        let outcome = match payload {
            DeletePayload::Task {
                task,
                index,
                cleared_missions,
            } => {
                let task_id = task.id.clone();
                insert_clamped(&mut self.document.tasks, index, task);
                for snapshot in cleared_missions {
                    if let Some(mission) = self.mission_mut(&snapshot.id) {
                        mission.is_manually_completed = snapshot.is_manually_completed;
                        mission.updated_at = snapshot.updated_at;
                    }
                }
                UndoOutcome::TaskRestored(task_id)
            }
            DeletePayload::MissionOnly {
                mission,
                index,
                detached,
            } => {
                let mission_id = mission.id.clone();
                insert_clamped(&mut self.document.missions, index, mission);
                let mut restored_tasks = 0;
                for snapshot in detached {
                    if let Some(task) = self.task_mut(&snapshot.id) {
                        *task = snapshot;
                        restored_tasks += 1;
                    }
                }
                UndoOutcome::MissionRestored {
                    mission_id,
                    restored_tasks,
                }
            }
            DeletePayload::MissionAndTasks {
                mission,
                index,
                removed,
            } => {
                let mission_id = mission.id.clone();
                insert_clamped(&mut self.document.missions, index, mission);
                let restored_tasks = removed.len();
                for (position, task) in removed {
                    insert_clamped(&mut self.document.tasks, position, task);
                }
                UndoOutcome::MissionRestored {
                    mission_id,
                    restored_tasks,
                }
            }
        };

        self.reconcile_completions();
        info!("event=undo module=service status=ok outcome={outcome:?}");
        self.persist()?;
        Ok(Some(outcome))
    }

    /// Derived eligibility of one mission.
    pub fn compute_eligibility(&self, mission_id: &MissionId) -> bool {
        is_eligible(mission_id, &self.document.tasks)
    }

    /// Display completion state of one mission.
    pub fn completion_state(&self, mission_id: &MissionId) -> Option<CompletionState> {
        self.document
            .mission(mission_id)
            .map(|mission| completion_state(mission, &self.document.tasks))
    }

    /// Groups the current collections for display under `mode`.
    pub fn visible(&self, mode: VisibilityMode) -> VisibleBoard<'_> {
        filter_for_visibility(mode, &self.document.missions, &self.document.tasks)
    }

    fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.document.tasks.iter_mut().find(|task| &task.id == id)
    }

    fn mission_mut(&mut self, id: &MissionId) -> Option<&mut Mission> {
        self.document
            .missions
            .iter_mut()
            .find(|mission| &mission.id == id)
    }

    /// Clears manual completion on missions that lost eligibility.
    ///
    /// Returns pre-change snapshots of the affected missions.
    fn reconcile_completions(&mut self) -> Vec<Mission> {
        let stale = stale_completions(&self.document.missions, &self.document.tasks);
        let mut cleared = Vec::with_capacity(stale.len());
        for mission_id in stale {
            if let Some(mission) = self.mission_mut(&mission_id) {
                cleared.push(mission.clone());
                mission.set_manually_completed(false);
                info!("event=mission_reopen module=service status=ok mission_id={mission_id}");
            }
        }
        cleared
    }
}

fn insert_clamped<T>(items: &mut Vec<T>, index: usize, item: T) {
    let index = index.min(items.len());
    items.insert(index, item);
}
