//! Core use-case services.
//!
//! # Responsibility
//! - Own in-memory task/mission state and every mutation on it.
//! - Derive eligibility and visibility without touching storage.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod eligibility;
pub mod state_manager;
pub mod title;
pub mod undo;
pub mod visibility;
