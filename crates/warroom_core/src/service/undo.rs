//! Single-level undo for delete operations.
//!
//! # Invariants
//! - At most one delete can be undone; recording a new delete replaces it.
//! - A pending undo expires after its window and then behaves as absent.
//! - Taking the payload clears the slot.

use crate::model::mission::Mission;
use crate::model::task::Task;
use log::debug;
use std::time::{Duration, Instant};

/// How long a delete stays undoable.
pub const UNDO_WINDOW: Duration = Duration::from_secs(6);

/// Everything needed to reverse one delete.
#[derive(Debug, Clone, PartialEq)]
pub enum DeletePayload {
    /// A single task removal.
    Task {
        task: Task,
        index: usize,
        /// Pre-delete snapshots of missions whose manual completion was
        /// cleared because this task disappeared. Only the flag and
        /// `updated_at` are restored from them.
        cleared_missions: Vec<Mission>,
    },
    /// Mission removed, its tasks detached.
    MissionOnly {
        mission: Mission,
        index: usize,
        /// Pre-detach snapshots of the formerly owned tasks.
        detached: Vec<Task>,
    },
    /// Mission removed together with its tasks.
    MissionAndTasks {
        mission: Mission,
        index: usize,
        /// Removed tasks with their original positions, ascending.
        removed: Vec<(usize, Task)>,
    },
}

#[derive(Debug, Clone)]
struct PendingUndo {
    payload: DeletePayload,
    expires_at: Instant,
}

/// Depth-one undo history with an expiry window.
#[derive(Debug, Clone)]
pub struct UndoSlot {
    pending: Option<PendingUndo>,
    window: Duration,
}

impl Default for UndoSlot {
    fn default() -> Self {
        Self::new(UNDO_WINDOW)
    }
}

impl UndoSlot {
    pub fn new(window: Duration) -> Self {
        Self {
            pending: None,
            window,
        }
    }

    /// Stores `payload`, discarding any earlier pending delete.
    pub fn record(&mut self, payload: DeletePayload, now: Instant) {
        if self.pending.is_some() {
            debug!("event=undo_replace module=service status=ok");
        }
        self.pending = Some(PendingUndo {
            payload,
            expires_at: now + self.window,
        });
    }

    /// Returns whether an unexpired payload is waiting.
    pub fn is_pending(&self, now: Instant) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| now < pending.expires_at)
    }

    /// Takes the payload if it has not expired. Always clears the slot.
    pub fn take(&mut self, now: Instant) -> Option<DeletePayload> {
        let pending = self.pending.take()?;
        if now < pending.expires_at {
            Some(pending.payload)
        } else {
            debug!("event=undo_expired module=service status=ok");
            None
        }
    }

    /// Drops an expired payload. Returns `true` when something was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.pending.is_some() && !self.is_pending(now) {
            self.pending = None;
            debug!("event=undo_expired module=service status=ok");
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{DeletePayload, UndoSlot, UNDO_WINDOW};
    use crate::model::task::Task;
    use std::time::{Duration, Instant};

    fn payload(title: &str) -> DeletePayload {
        DeletePayload::Task {
            task: Task::new(title),
            index: 0,
            cleared_missions: Vec::new(),
        }
    }

    #[test]
    fn take_returns_payload_once() {
        let now = Instant::now();
        let mut slot = UndoSlot::default();
        slot.record(payload("a"), now);

        assert!(slot.is_pending(now));
        assert!(slot.take(now).is_some());
        assert!(slot.take(now).is_none());
    }

    #[test]
    fn payload_expires_after_window() {
        let now = Instant::now();
        let mut slot = UndoSlot::default();
        slot.record(payload("a"), now);

        let later = now + UNDO_WINDOW;
        assert!(!slot.is_pending(later));
        assert!(slot.expire(later));
        assert!(slot.take(now).is_none());
    }

    #[test]
    fn newer_delete_replaces_older_one() {
        let now = Instant::now();
        let mut slot = UndoSlot::new(Duration::from_secs(60));
        slot.record(payload("first"), now);
        slot.record(payload("second"), now);

        match slot.take(now) {
            Some(DeletePayload::Task { task, .. }) => assert_eq!(task.title, "second"),
            other => panic!("unexpected payload: {other:?}"),
        }
    }
}
