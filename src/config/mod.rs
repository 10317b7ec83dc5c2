//! Configuration module for the event viewer
//!
//! Settings are plain data passed explicitly into every pipeline stage. This
//! module adds persistence on top of [`settings`]:
//!
//! - JSON settings files (primary format, `serde_json`)
//! - TOML settings files, selected by the `.toml` extension
//!
//! # Example
//!
//! ```ignore
//! use event_viewer::config::Settings;
//!
//! let mut settings = Settings::load_or_default("viewer.json");
//! settings.unknown.label = "Offline".to_string();
//! settings.save("viewer.json")?;
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{Result, ViewerError};
use std::path::Path;

/// Settings file extension selecting the TOML parser
pub const TOML_EXTENSION: &str = "toml";

impl Settings {
    /// Load settings from a JSON or TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ViewerError::Config(format!("Failed to read settings file {:?}: {}", path, e))
        })?;

        if is_toml(path) {
            toml::from_str(&content).map_err(|e| {
                ViewerError::Config(format!("Failed to parse settings file {:?}: {}", path, e))
            })
        } else {
            serde_json::from_str(&content).map_err(|e| {
                ViewerError::Config(format!("Failed to parse settings file {:?}: {}", path, e))
            })
        }
    }

    /// Load settings, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save settings to disk, as TOML for `.toml` paths and pretty JSON otherwise
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_toml(path) {
            toml::to_string_pretty(self)
                .map_err(|e| ViewerError::Serialization(format!("Failed to serialize settings: {}", e)))?
        } else {
            serde_json::to_string_pretty(self)
                .map_err(|e| ViewerError::Serialization(format!("Failed to serialize settings: {}", e)))?
        };

        std::fs::write(path, content).map_err(|e| {
            ViewerError::Config(format!("Failed to write settings file {:?}: {}", path, e))
        })
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TOML_EXTENSION))
}

// ==================== Tests ====================
