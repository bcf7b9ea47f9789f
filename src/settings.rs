//! Game settings and preferences
//!
//! Persisted as JSON in LocalStorage on the web; native builds use defaults.

use serde::{Deserialize, Serialize};

use crate::consts::BALL_SERVE_SPEED;

/// Default location of the sprite atlas manifest
pub const DEFAULT_ATLAS_MANIFEST: &str = "./assets/sprites/spritesData.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Path or URL of the TexturePacker manifest; the atlas image is resolved next to it
    pub atlas_manifest: String,
    /// Let the trajectory predictor drive the right paddle
    pub ai_opponent: bool,
    /// Ball speed on every serve (world units per tick)
    pub serve_speed: f32,
    /// Log frames per second once a second
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            atlas_manifest: DEFAULT_ATLAS_MANIFEST.to_string(),
            ai_opponent: true,
            serve_speed: BALL_SERVE_SPEED,
            show_fps: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "flappy_pong_settings";

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native builds have no persistent store
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "ai_opponent": false }"#).unwrap();
        assert!(!settings.ai_opponent);
        assert_eq!(settings.atlas_manifest, DEFAULT_ATLAS_MANIFEST);
        assert_eq!(settings.serve_speed, BALL_SERVE_SPEED);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            atlas_manifest: "/static/atlas.json".to_string(),
            ai_opponent: false,
            serve_speed: 4.5,
            show_fps: true,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_written_back_settings_carry_every_field() {
        let stored = Settings::from_json(r#"{ "show_fps": true }"#).unwrap();
        let json = serde_json::to_value(&stored).unwrap();
        for key in ["atlas_manifest", "ai_opponent", "serve_speed", "show_fps"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["show_fps"], serde_json::Value::Bool(true));
    }

    #[test]
    fn test_invalid_json() {
        assert!(Settings::from_json("[1, 2]").is_err());
    }
}
