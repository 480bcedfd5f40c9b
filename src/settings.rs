//! Application settings, persisted through eframe storage.
//!
//! Only presentation preferences live here. Viewport zoom/pan always start
//! fresh at 100% and are never stored.

use serde::{Deserialize, Serialize};

use crate::widgets::viewport::transition::TRANSITION_SECS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Show the controls help overlay (F1)
    pub show_help: bool,
    /// Ease the view transform toward button/wheel changes
    pub smooth_transitions: bool,
    /// Transition duration in seconds
    pub transition_secs: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            show_help: false,
            smooth_transitions: true,
            transition_secs: TRANSITION_SECS,
        }
    }
}

impl AppSettings {
    /// Restore from a persisted JSON string; unknown or missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                None
            }
        }
    }

    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}
