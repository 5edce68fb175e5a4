use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use facemood_core::shared::constants::{DEFAULT_CAMERA_INDEX, DEFAULT_THRESHOLD};

const MAX_THRESHOLD: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub dark_mode: bool,
    /// Minimum confidence (0-100) for a face to be shown and logged.
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
    #[serde(default)]
    pub camera_index: u32,
}

fn default_threshold() -> u32 {
    DEFAULT_THRESHOLD as u32
}

pub fn clamp_threshold(threshold: u32) -> u32 {
    threshold.min(MAX_THRESHOLD)
}

fn default_font_scale() -> f32 {
    1.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            threshold: default_threshold(),
            font_scale: default_font_scale(),
            camera_index: DEFAULT_CAMERA_INDEX,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceMood").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .map(|json| Self::from_json(&json))
            .unwrap_or_default()
    }

    /// Unreadable settings fall back to defaults; out-of-range values are
    /// clamped.
    fn from_json(json: &str) -> Self {
        let mut settings: Self = serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("Ignoring invalid settings file: {e}");
            Self::default()
        });
        settings.threshold = clamp_threshold(settings.threshold);
        settings
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Ok(json) = serde_json::to_string_pretty(self) {
                if let Err(e) = fs::write(&path, json) {
                    log::warn!("Failed to save settings to {}: {e}", path.display());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.dark_mode);
        assert_eq!(settings.threshold, 50);
        assert_eq!(settings.camera_index, 0);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings = Settings::from_json(r#"{"dark_mode": true}"#);
        assert!(settings.dark_mode);
        assert_eq!(settings.threshold, 50);
        assert!((settings.font_scale - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            dark_mode: true,
            threshold: 70,
            font_scale: 1.2,
            camera_index: 1,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json), settings);
    }

    #[test]
    fn test_threshold_above_range_is_clamped() {
        let settings = Settings::from_json(r#"{"threshold": 250}"#);
        assert_eq!(settings.threshold, 100);
    }

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }
}
