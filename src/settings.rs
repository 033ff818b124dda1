//! Player settings
//!
//! Persisted as JSON next to the executable config dir by the shell; loads
//! fall back to defaults with a log line rather than an error.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Placeholder identity when the player gives no usable name
pub const DEFAULT_PLAYER_NAME: &str = "anon";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display name submitted with scores
    pub player_name: String,
    /// Base URL of the leaderboard/commentary server; None plays offline
    pub api_base: Option<String>,
    /// Vibrate on flaps, countdown ticks, and crashes (where supported)
    pub haptics: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            api_base: None,
            haptics: true,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("settings file {} unreadable: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no settings at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Best-effort save; failures are logged, never fatal.
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("could not save settings to {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("could not serialize settings: {e}"),
        }
    }

    /// Trimmed player name, or the placeholder when empty. A missing name
    /// never blocks a run.
    pub fn display_name(&self) -> &str {
        let trimmed = self.player_name.trim();
        if trimmed.is_empty() {
            DEFAULT_PLAYER_NAME
        } else {
            trimmed
        }
    }
}
