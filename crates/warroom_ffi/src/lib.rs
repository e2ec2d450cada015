//! Flutter-facing bridge for the WAR ROOM core.

pub mod api;
