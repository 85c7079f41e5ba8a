//=========================================================================
// Settings
//=========================================================================
//
// Persisted key → value configuration store.
//
// Backed by a flat JSON object on disk. Loaded once at startup, read with
// per-key defaults, flushed once at shutdown.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

//=== Internal Dependencies ===============================================

use crate::core::render::MAX_SURFACE_DIMENSION;
use crate::core::time::frame_duration;
use crate::core::EngineError;

//=== Constants ===========================================================

/// Default on-disk location, relative to the working directory.
pub const DEFAULT_SETTINGS_PATH: &str = "data/settings.json";

//=== Settings ============================================================

/// Flat JSON settings store with typed, defaulted reads.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    path: Option<PathBuf>,
    values: Map<String, Value>,
}

impl Settings {
    /// Store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads `path`. A missing or unreadable file yields an empty store
    /// that will still be saved back to `path`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let values = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Map<String, Value>>(&text) {
                Ok(values) => {
                    info!(target: "settings", "Loaded {} settings from {}", values.len(), path.display());
                    values
                }
                Err(e) => {
                    warn!(target: "settings", "Ignoring malformed {}: {}", path.display(), e);
                    Map::new()
                }
            },
            Err(e) => {
                debug!(target: "settings", "No settings at {} ({}), using defaults", path.display(), e);
                Map::new()
            }
        };

        Self {
            path: Some(path),
            values,
        }
    }

    /// Reads `key`, falling back to `default` when it is missing or has
    /// the wrong type.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.values.get(key) {
            Some(value) => match T::deserialize(value) {
                Ok(v) => v,
                Err(e) => {
                    warn!(target: "settings", "Setting '{}' has unexpected type ({}), using default", key, e);
                    default
                }
            },
            None => default,
        }
    }

    /// Stores `value` under `key`.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), EngineError> {
        self.values.insert(key.to_owned(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes the store back to its file. In-memory stores are untouched.
    pub fn save(&self) -> Result<(), EngineError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, serde_json::to_string_pretty(&self.values)?)?;
        debug!(target: "settings", "Saved settings to {}", path.display());
        Ok(())
    }
}

//=== EngineConfig ========================================================

/// Typed view of the settings the engine itself consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub screen_w: u32,
    pub screen_h: u32,
    pub fps: f64,
    pub can_fullscreen: bool,
    pub can_take_screenshots: bool,
    pub can_exit_via_escape: bool,
    pub admin: bool,
    pub sound_volume: f32,
    pub music_volume: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            screen_w: 640,
            screen_h: 480,
            fps: 60.0,
            can_fullscreen: true,
            can_take_screenshots: true,
            can_exit_via_escape: true,
            admin: false,
            sound_volume: crate::core::audio::DEFAULT_SOUND_VOLUME,
            music_volume: crate::core::audio::DEFAULT_MUSIC_VOLUME,
        }
    }
}

impl EngineConfig {
    /// Reads every field from `settings`, defaulting missing keys.
    pub fn from_settings(settings: &Settings) -> Self {
        let d = Self::default();
        Self {
            screen_w: settings.get("screen_w", d.screen_w),
            screen_h: settings.get("screen_h", d.screen_h),
            fps: settings.get("fps", d.fps),
            can_fullscreen: settings.get("can_fullscreen", d.can_fullscreen),
            can_take_screenshots: settings.get("can_take_screenshots", d.can_take_screenshots),
            can_exit_via_escape: settings.get("can_exit_via_escape", d.can_exit_via_escape),
            admin: settings.get("admin", d.admin),
            sound_volume: settings.get("sound_volume", d.sound_volume),
            music_volume: settings.get("music_volume", d.music_volume),
        }
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<(), EngineError> {
        frame_duration(self.fps)?;

        if self.screen_w == 0 || self.screen_h == 0 {
            return Err(EngineError::Configuration(format!(
                "screen size must be non-zero, got {}x{}",
                self.screen_w, self.screen_h
            )));
        }
        if self.screen_w > MAX_SURFACE_DIMENSION || self.screen_h > MAX_SURFACE_DIMENSION {
            return Err(EngineError::Configuration(format!(
                "screen size {}x{} exceeds {} pixels per side",
                self.screen_w, self.screen_h, MAX_SURFACE_DIMENSION
            )));
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
