//! Player preferences
//!
//! Persisted as JSON next to the high score, under its own key.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Particle bursts on hits and pickups
    pub particles: bool,
    /// Freeze the scrolling grid
    pub reduced_motion: bool,
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particles: true,
            reduced_motion: false,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "grid_runner_settings";

    /// Load settings, falling back to defaults on missing or bad JSON
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings: {}", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings
    pub fn save<S: KeyValueStore>(&self, store: &mut S) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Failed to save settings: {}", e),
            },
            Err(e) => log::warn!("Failed to encode settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_missing_settings_are_default() {
        assert_eq!(Settings::load(&MemoryStore::new()), Settings::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let store = MemoryStore::with_entry(Settings::STORAGE_KEY, r#"{"show_fps":true}"#);
        let settings = Settings::load(&store);
        assert!(settings.show_fps);
        assert!(settings.particles);
    }

    #[test]
    fn test_malformed_json_is_default() {
        let store = MemoryStore::with_entry(Settings::STORAGE_KEY, "{not json");
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            particles: false,
            reduced_motion: true,
            show_fps: true,
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }
}
