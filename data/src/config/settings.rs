use super::theme::PaletteSpec;
use crate::chart::area::SummaryMetric;
use crate::chart::brush::BrushWindow;
use crate::util::ok_or_default;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_ENV: &str = "FLYHIGH_SETTINGS";
const SETTINGS_DIR: &str = "flyhigh";
const SETTINGS_FILE: &str = "settings.json";
/// Relative to the working directory. Holds the two input CSVs.
pub const DEFAULT_DATA_DIR: &str = "dataset";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSpec {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 1000.0,
        }
    }
}

/// Brush window applied at startup, before any interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefaultWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Default for DefaultWindow {
    fn default() -> Self {
        Self {
            start: Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).single().unwrap_or_default(),
            end: Utc.with_ymd_and_hms(2019, 6, 8, 0, 0, 0).single().unwrap_or_default(),
        }
    }
}

impl From<DefaultWindow> for BrushWindow {
    fn from(window: DefaultWindow) -> Self {
        BrushWindow::new(window.start, window.end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub window: WindowSpec,
    #[serde(deserialize_with = "ok_or_default")]
    pub default_window: DefaultWindow,
    /// Largest subset that is still redrawn while a brush drag is in progress.
    pub preview_limit: usize,
    pub line_width: f32,
    pub line_alpha: f32,
    /// Pieces each gradient segment is split into when sampled along its radius.
    pub gradient_steps: usize,
    pub brush_height: f32,
    #[serde(deserialize_with = "ok_or_default")]
    pub brush_metric: SummaryMetric,
    #[serde(deserialize_with = "ok_or_default")]
    pub palette: PaletteSpec,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            window: WindowSpec::default(),
            default_window: DefaultWindow::default(),
            preview_limit: 60,
            line_width: 3.0,
            line_alpha: 0.6,
            gradient_steps: 4,
            brush_height: 100.0,
            brush_metric: SummaryMetric::default(),
            palette: PaletteSpec::default(),
        }
    }
}

impl Settings {
    /// Reads the settings file if there is one. Any failure falls back to defaults.
    pub fn load() -> Self {
        let Some(path) = settings_path() else {
            log::info!("No settings location available, using defaults");
            return Self::default();
        };

        match Self::read(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                log::warn!("{err} ({}), using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(raw)?;
        Ok(settings.sanitized())
    }

    fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !self.window.width.is_finite() || self.window.width <= 0.0 {
            self.window.width = defaults.window.width;
        }
        if !self.window.height.is_finite() || self.window.height <= 0.0 {
            self.window.height = defaults.window.height;
        }
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            self.line_width = defaults.line_width;
        }
        if !self.line_alpha.is_finite() {
            self.line_alpha = defaults.line_alpha;
        }
        self.line_alpha = self.line_alpha.clamp(0.0, 1.0);
        if !self.brush_height.is_finite() || self.brush_height <= 0.0 {
            self.brush_height = defaults.brush_height;
        }
        self.gradient_steps = self.gradient_steps.max(1);

        self
    }
}

fn settings_path() -> Option<PathBuf> {
    std::env::var_os(SETTINGS_ENV)
        .map(PathBuf::from)
        .or_else(|| dirs_next::config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_data_dir_is_not_the_data_crate() {
        let settings = Settings::default();

        assert_eq!(settings.data_dir, PathBuf::from("dataset"));
        assert_ne!(settings.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn empty_object_yields_defaults() {
        let settings = Settings::from_json("{}").expect("valid json");

        assert_eq!(settings.preview_limit, 60);
        assert_eq!(settings.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(settings.default_window, DefaultWindow::default());
        assert_eq!(settings.brush_metric, SummaryMetric::EndPrice);
    }

    #[test]
    fn bad_fields_fall_back_individually() {
        let raw = r#"{
            "preview_limit": 25,
            "brush_metric": "modePrice",
            "default_window": { "start": "yesterday" },
            "line_alpha": 3.5,
            "gradient_steps": 0,
            "window": { "width": -20.0 }
        }"#;
        let settings = Settings::from_json(raw).expect("valid json");

        assert_eq!(settings.preview_limit, 25);
        assert_eq!(settings.brush_metric, SummaryMetric::EndPrice);
        assert_eq!(settings.default_window, DefaultWindow::default());
        assert_eq!(settings.line_alpha, 1.0);
        assert_eq!(settings.gradient_steps, 1);
        assert_eq!(settings.window.width, 1600.0);
    }

    #[test]
    fn custom_window_and_metric_are_read() {
        let raw = r#"{
            "brush_metric": "medianPrice",
            "default_window": {
                "start": "2019-07-01T00:00:00Z",
                "end": "2019-07-03T00:00:00Z"
            }
        }"#;
        let settings = Settings::from_json(raw).expect("valid json");
        let window = BrushWindow::from(settings.default_window);

        assert_eq!(settings.brush_metric, SummaryMetric::MedianPrice);
        assert_eq!(
            window.start(),
            Utc.with_ymd_and_hms(2019, 7, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Json(_))
        ));
    }
}
