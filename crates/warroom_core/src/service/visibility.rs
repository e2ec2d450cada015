//! Visibility modes and the pure display filter.
//!
//! # Responsibility
//! - Group tasks under their missions for rendering.
//! - Hide or show completed work according to the active mode.
//!
//! # Invariants
//! - Filtering never mutates the collections.
//! - Eligibility is computed over all tasks, not only the visible ones.
//! - Tasks whose mission no longer exists are grouped as standalone.

use crate::model::mission::{CompletionState, Mission, MissionId};
use crate::model::task::Task;
use crate::service::eligibility::is_eligible;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Display filter applied to the task/mission collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityMode {
    /// Everything.
    #[default]
    Overview,
    /// Open work only: completed missions and done standalone tasks hidden.
    Focus,
    /// Finished work only: completed missions and done tasks.
    Accomplishment,
}

impl VisibilityMode {
    pub const ALL: [Self; 3] = [Self::Overview, Self::Focus, Self::Accomplishment];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Focus => "focus",
            Self::Accomplishment => "accomplishment",
        }
    }

    fn shows_mission(self, mission: &Mission) -> bool {
        match self {
            Self::Overview => true,
            Self::Focus => !mission.is_manually_completed,
            Self::Accomplishment => mission.is_manually_completed,
        }
    }

    fn shows_mission_task(self, task: &Task) -> bool {
        match self {
            Self::Overview | Self::Focus => true,
            Self::Accomplishment => task.is_done,
        }
    }

    fn shows_standalone_task(self, task: &Task) -> bool {
        match self {
            Self::Overview => true,
            Self::Focus => !task.is_done,
            Self::Accomplishment => task.is_done,
        }
    }
}

impl Display for VisibilityMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unknown visibility mode strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVisibilityModeError(pub String);

impl Display for ParseVisibilityModeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported visibility mode `{}`; expected overview|focus|accomplishment",
            self.0
        )
    }
}

impl Error for ParseVisibilityModeError {}

impl FromStr for VisibilityMode {
    type Err = ParseVisibilityModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "overview" => Ok(Self::Overview),
            "focus" => Ok(Self::Focus),
            "accomplishment" => Ok(Self::Accomplishment),
            other => Err(ParseVisibilityModeError(other.to_string())),
        }
    }
}

/// One visible mission with its visible tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionGroup<'a> {
    pub mission: &'a Mission,
    /// Derived from all owned tasks, including hidden ones.
    pub eligible: bool,
    pub completion: CompletionState,
    pub tasks: Vec<&'a Task>,
}

/// Renderable grouping produced by [`filter_for_visibility`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleBoard<'a> {
    /// Visible missions in collection order.
    pub missions: Vec<MissionGroup<'a>>,
    /// Visible standalone tasks in collection order.
    pub standalone: Vec<&'a Task>,
}

impl VisibleBoard<'_> {
    /// Total visible tasks across groups and standalone.
    pub fn task_count(&self) -> usize {
        self.standalone.len()
            + self
                .missions
                .iter()
                .map(|group| group.tasks.len())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty() && self.standalone.is_empty()
    }
}

/// Groups and filters the collections for display under `mode`.
pub fn filter_for_visibility<'a>(
    mode: VisibilityMode,
    missions: &'a [Mission],
    tasks: &'a [Task],
) -> VisibleBoard<'a> {
    let mut owned: HashMap<MissionId, Vec<&'a Task>> = missions
        .iter()
        .map(|mission| (mission.id.clone(), Vec::new()))
        .collect();
    let mut standalone = Vec::new();

    for task in tasks {
        match task.mission_id.as_ref().and_then(|id| owned.get_mut(id)) {
            Some(group) => group.push(task),
            None => {
                if mode.shows_standalone_task(task) {
                    standalone.push(task);
                }
            }
        }
    }

    let missions = missions
        .iter()
        .filter(|mission| mode.shows_mission(mission))
        .map(|mission| {
            let eligible = is_eligible(&mission.id, tasks);
            let tasks = owned
                .remove(&mission.id)
                .unwrap_or_default()
                .into_iter()
                .filter(|task| mode.shows_mission_task(task))
                .collect();
            MissionGroup {
                mission,
                eligible,
                completion: CompletionState::resolve(mission.is_manually_completed, eligible),
                tasks,
            }
        })
        .collect();

    VisibleBoard {
        missions,
        standalone,
    }
}
