//! Viewer settings, persisted as JSON between sessions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV: &str = "FREQ_RESPONSE_CONFIG";

pub const DEFAULT_CONFIG_FILE: &str = "freq-response-viewer.json";

/// How modal frequencies are marked on amplitude charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalMarker {
    /// Vertical line at each modal frequency.
    #[default]
    Lines,
    /// Marker on the curve at the sample closest to each modal frequency.
    Markers,
}

/// Options shared by every amplitude chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// Shade the area under each curve.
    pub fill: bool,
    /// Draw a marker on every sample.
    pub markers: bool,
    pub marker_size: f32,
    pub locate_modal_freq_with: ModalMarker,
    /// Mark the maximum amplitude of each curve.
    pub locate_peaks: bool,
    /// Modal frequencies of the open simulation, in Hz.
    #[serde(skip)]
    pub modal_freq: Vec<f64>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            fill: false,
            markers: false,
            marker_size: 2.0,
            locate_modal_freq_with: ModalMarker::Lines,
            locate_peaks: false,
            modal_freq: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Simulation folder opened last; reopened on start.
    pub last_folder: Option<PathBuf>,
    pub plot: PlotOptions,
    /// Where chart PNGs and table CSVs are written.
    pub export_dir: Option<PathBuf>,
}

impl ViewerConfig {
    /// `$FREQ_RESPONSE_CONFIG`, or `freq-response-viewer.json` in the working directory.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load settings from [`Self::default_path`]; never fails.
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring settings: {e:#}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_plain_lines() {
        let options = PlotOptions::default();
        assert!(!options.fill && !options.markers && !options.locate_peaks);
        assert_eq!(options.locate_modal_freq_with, ModalMarker::Lines);
        assert!(options.modal_freq.is_empty());
    }

    #[test]
    fn saved_settings_load_back_without_modal_frequencies() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("settings.json");

        let mut config = ViewerConfig {
            last_folder: Some(PathBuf::from("/runs/sim4")),
            export_dir: Some(PathBuf::from("/runs/exports")),
            ..Default::default()
        };
        config.plot.fill = true;
        config.plot.locate_modal_freq_with = ModalMarker::Markers;
        config.plot.modal_freq = vec![12.0, 40.0];
        config.save_to(&path).expect("saved");

        let text = std::fs::read_to_string(&path).expect("written");
        assert!(text.contains(r#""locate_modal_freq_with": "markers""#), "{text}");
        let json: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert!(json["plot"].get("modal_freq").is_none(), "{text}");
        assert!(!text.contains(r#""modal_freq""#), "{text}");

        let loaded = ViewerConfig::load_from(&path).expect("loads");
        assert_eq!(loaded.last_folder, config.last_folder);
        assert!(loaded.plot.fill);
        assert_eq!(loaded.plot.locate_modal_freq_with, ModalMarker::Markers);
        assert!(loaded.plot.modal_freq.is_empty());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{ "plot": { "marker_size": 4.5 } }"#).expect("parses");
        assert_eq!(config.plot.marker_size, 4.5);
        assert!(config.last_folder.is_none());
        assert_eq!(config.plot.locate_modal_freq_with, ModalMarker::Lines);
    }

    #[test]
    fn malformed_file_is_an_error_with_path() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("written");
        let err = ViewerConfig::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }
}
