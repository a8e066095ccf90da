//! Game settings and tunables
//!
//! Persisted separately from the best score. Every field has a default, so a
//! partial or stale settings blob still loads.

use serde::{Deserialize, Serialize};

use crate::consts::{COUNTDOWN_FROM, ROUND_SECONDS, SPAWN_INTERVAL_MS};
use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Round ===
    /// Length of a round in seconds
    pub round_seconds: u32,
    /// Countdown start value before a round
    pub countdown_from: u32,
    /// Milliseconds between target spawns
    pub spawn_interval_ms: f64,
    /// Fixed RNG seed; `None` lets the host pick one per session
    pub seed: Option<u64>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,

    // === Visual ===
    /// Draw the dotted trajectory while aiming
    pub aim_preview: bool,

    // === Accessibility ===
    /// Reduced motion (no shake or flash on heavy hits)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_seconds: ROUND_SECONDS,
            countdown_from: COUNTDOWN_FROM,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            seed: None,

            master_volume: 0.8,
            muted: false,

            aim_preview: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "evil_meter_settings";

    /// Parse settings JSON, then clamp values into playable ranges.
    ///
    /// Only a JSON object is accepted; serde would otherwise fill fields from
    /// an array by position.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(StoreError::Corrupt("settings are not a JSON object".into()));
        }
        let settings = Settings::deserialize(value)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn sanitized(mut self) -> Self {
        self.round_seconds = self.round_seconds.max(1);
        self.countdown_from = self.countdown_from.max(1);
        if !self.spawn_interval_ms.is_finite() || self.spawn_interval_ms < 50.0 {
            self.spawn_interval_ms = SPAWN_INTERVAL_MS;
        }
        self.master_volume = if self.master_volume.is_finite() {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            Settings::default().master_volume
        };
        self
    }

    /// Load settings from a JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring bad settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
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
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}
