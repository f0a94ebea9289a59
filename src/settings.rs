//! Game settings and preferences
//!
//! Persisted as a small JSON file next to the binary (or wherever the host
//! points it).

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tuning::{Arena, Variant, VariantConfig};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Which game to run
    pub variant: Variant,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,

    // === Playfield ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Audio ===
    /// Background music loop
    pub music_enabled: bool,
    /// Event sound effects
    pub sfx_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        let arena = Arena::default();
        Self {
            variant: Variant::default(),
            seed: None,

            canvas_width: arena.width,
            canvas_height: arena.height,

            // Music starts off until the player opts in
            music_enabled: false,
            sfx_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
        }
    }
}

impl Settings {
    /// Preset tuning for the chosen variant on the configured canvas
    pub fn variant_config(&self) -> VariantConfig {
        VariantConfig::preset(self.variant)
            .with_arena(Arena::new(self.canvas_width, self.canvas_height))
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
