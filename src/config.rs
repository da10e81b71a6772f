use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::data::range::RangeMode;

/// Environment variable naming the settings file.
pub const SETTINGS_ENV: &str = "RUSTY_STOPFLOW_SETTINGS";

/// Settings file used when [`SETTINGS_ENV`] is unset.
pub const DEFAULT_SETTINGS_FILE: &str = "rusty-stopflow.json";

// ---------------------------------------------------------------------------
// StyleConfig – shared by every plot surface
// ---------------------------------------------------------------------------

/// Numeric drawing parameters applied identically to all surfaces on refresh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub font_size: f32,
    pub line_width: f32,
    /// Marker radius as a multiple of the line width.
    pub marker_ratio: f32,
    /// Draw every n-th sample of a scatter trace.
    pub marker_stride: usize,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            line_width: 1.5,
            marker_ratio: 2.0,
            marker_stride: 1,
        }
    }
}

impl StyleConfig {
    pub fn marker_radius(&self) -> f32 {
        self.line_width * self.marker_ratio
    }
}

// ---------------------------------------------------------------------------
// Settings – persisted session defaults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub style: StyleConfig,
    pub svd_components: usize,
    pub scale_by_singular_value: bool,
    pub range_from: f64,
    pub range_to: f64,
    pub range_steps: usize,
    pub range_mode: RangeMode,
    /// Directory of the last import or export.
    pub last_directory: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            style: StyleConfig::default(),
            svd_components: 3,
            scale_by_singular_value: false,
            range_from: 0.001,
            range_to: 1.0,
            range_steps: 10,
            range_mode: RangeMode::Log,
            last_directory: None,
        }
    }
}

impl Settings {
    /// Path from [`SETTINGS_ENV`], or [`DEFAULT_SETTINGS_FILE`].
    pub fn default_path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing settings {}", path.display()))
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => {
                info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("Ignoring settings file: {e:#}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("serialising settings")?;
        std::fs::write(path, text).with_context(|| format!("writing settings {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{"svd_components": 5, "style": {"line_width": 3.0}}"#)
            .unwrap();
        assert_eq!(s.svd_components, 5);
        assert_eq!(s.style.line_width, 3.0);
        assert_eq!(s.style.font_size, StyleConfig::default().font_size);
        assert_eq!(s.range_mode, RangeMode::Log);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings::default();
        settings.scale_by_singular_value = true;
        settings.style.marker_stride = 4;
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn broken_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_or_default(&path), Settings::default());
        assert_eq!(
            Settings::load_or_default(&dir.path().join("missing.json")),
            Settings::default()
        );
    }
}
