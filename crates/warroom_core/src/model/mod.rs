//! Task/mission domain model and the persisted document aggregate.
//!
//! # Responsibility
//! - Define canonical data structures used by the state manager.
//! - Own the JSON wire shape of the persisted document.
//!
//! # Invariants
//! - Every task and mission is identified by a stable opaque string id.
//! - Timestamps are Unix epoch milliseconds.
//! - A task references at most one mission; dangling references are
//!   resolved as standalone at read time.

pub mod document;
pub mod id;
pub mod mission;
pub mod settings;
pub mod task;

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current wall-clock time in Unix epoch milliseconds.
///
/// Clocks set before the epoch collapse to `0`.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
