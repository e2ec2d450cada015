//! Display preferences stored alongside tasks and missions.
//!
//! # Invariants
//! - Known keys always have a value after load (missing keys take defaults).
//! - Unknown keys are preserved verbatim across load/save.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Theme applied when the document does not carry one.
pub const DEFAULT_THEME: &str = "dark";

/// Open key-value bag of display preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_true")]
    pub show_completed_tasks: bool,
    #[serde(default = "default_true")]
    pub show_completed_missions: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Keys the core does not interpret, kept for the UI shell.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_completed_tasks: true,
            show_completed_missions: true,
            theme: default_theme(),
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// Reads an uninterpreted preference.
    pub fn extra_value(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Stores an uninterpreted preference, returning the previous value.
    pub fn set_extra_value(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.extra.insert(key.into(), value)
    }
}

fn default_true() -> bool {
    true
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}
