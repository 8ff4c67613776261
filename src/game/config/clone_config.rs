//! Clone Tool Configuration
//!
//! Everything the clone tool reads at construction: key bindings, hold timing,
//! capture flags and the preview colour table. Stored as JSON so bindings can be
//! remapped without touching tool code. Missing fields fall back to defaults.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::input::{KeyBinding, KeyBindings};

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Errors that can occur while loading or saving a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// Standard I/O error.
    IoError(std::io::Error),
    /// JSON serialization/deserialization error.
    JsonError(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::JsonError(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::JsonError(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::JsonError(e)
    }
}

// ============================================================================
// COLOURS
// ============================================================================

/// Selection box colours per phase (RGBA, linear).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewColors {
    /// Footprint being dragged out
    pub base: [f32; 4],
    /// Box being extruded
    pub height: [f32; 4],
    /// Live selection
    pub move_apply: [f32; 4],
    /// Pointer off the map
    pub invalid: [f32; 4],
}

impl Default for PreviewColors {
    fn default() -> Self {
        Self {
            base: [0.2, 0.6, 1.0, 0.35],
            height: [0.2, 0.9, 0.5, 0.35],
            move_apply: [1.0, 0.75, 0.2, 0.35],
            invalid: [1.0, 0.2, 0.2, 0.35],
        }
    }
}

// ============================================================================
// CONFIG
// ============================================================================

/// Clone tool settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloneToolConfig {
    /// Key/action table
    pub bindings: Vec<KeyBinding>,
    /// Seconds a height/move key must be held before it starts repeating
    pub repeat_delay_secs: f32,
    /// Seconds between repeats while held
    pub repeat_interval_secs: f32,
    /// Seconds the reset key must be held to drop the selection
    pub reset_hold_secs: f32,
    /// Capture air cells too, so pasting carves out space
    pub include_air: bool,
    /// Capture every stacked object per cell instead of only the top one
    pub include_stacked: bool,
    pub colors: PreviewColors,
}

impl Default for CloneToolConfig {
    fn default() -> Self {
        Self {
            bindings: KeyBindings::default_entries(),
            repeat_delay_secs: 0.4,
            repeat_interval_secs: 0.08,
            reset_hold_secs: 1.0,
            include_air: false,
            include_stacked: false,
            colors: PreviewColors::default(),
        }
    }
}

impl CloneToolConfig {
    /// Build the key lookup table.
    pub fn key_bindings(&self) -> KeyBindings {
        KeyBindings::from_entries(&self.bindings)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration file.
    pub fn load_json(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        info!("[Clone Tool] Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save to a configuration file, creating parent directories.
    pub fn save_json(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        info!("[Clone Tool] Saved config to {}", path.display());
        Ok(())
    }
}
