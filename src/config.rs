//! Configuration file support.
//!
//! Serializes user preferences, keybindings and the behavioural tuning
//! constants so they can be exported, edited and re-imported as JSON.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::keybindings::KeyBindings;
use crate::transform::Size;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Keybinding configuration
    #[serde(default)]
    pub keybindings: KeyBindings,

    /// Behavioural constants for zoom, fitting, duplication and rotation
    #[serde(default)]
    pub tuning: Tuning,
}

fn default_app_name() -> String {
    "campus-map".to_string()
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Behavioural constants. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// `k` in the wheel zoom factor `exp(-delta * k)`
    pub zoom_sensitivity: f64,
    /// Fraction of the viewport used by fit-to-image
    pub fit_margin: f64,
    /// Document offset applied to duplicated features
    pub duplicate_offset: (f64, f64),
    /// Rotation snap step in degrees
    pub rotate_snap_degrees: f64,
    /// Screen padding when the viewer frames a feature
    pub frame_padding: f64,
    /// Maximum scale when the viewer frames a feature
    pub frame_max_scale: f64,
    /// Vertex handle radius (document units)
    pub vertex_handle_radius: f64,
    /// Opacity of the reference image in overlay exports
    pub background_opacity: f64,
    /// Overlay canvas when no reference image is loaded
    pub default_canvas: Size,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            zoom_sensitivity: constants::ZOOM_SENSITIVITY,
            fit_margin: constants::FIT_MARGIN,
            duplicate_offset: constants::DUPLICATE_OFFSET,
            rotate_snap_degrees: constants::ROTATE_SNAP_DEGREES,
            frame_padding: constants::FRAME_PADDING,
            frame_max_scale: constants::FRAME_MAX_SCALE,
            vertex_handle_radius: constants::VERTEX_HANDLE_RADIUS,
            background_opacity: constants::BACKGROUND_OPACITY,
            default_canvas: Size::new(
                constants::DEFAULT_CANVAS_WIDTH,
                constants::DEFAULT_CANVAS_HEIGHT,
            ),
        }
    }
}

impl Tuning {
    /// Rotation snap step in radians.
    pub fn rotate_snap_radians(&self) -> f64 {
        self.rotate_snap_degrees.to_radians()
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
            keybindings: KeyBindings::default(),
            tuning: Tuning::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "campus-map-config.json"
    }

    /// Get the default config file path for auto-load/save.
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("campus-map").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("campus-map")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from_path(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to a file, creating parent directories as needed.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Save configuration to the default path.
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save_to_path(&path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_matches_constants() {
        let tuning = Tuning::default();
        assert_eq!(tuning.zoom_sensitivity, 0.0015);
        assert_eq!(tuning.fit_margin, 0.95);
        assert_eq!(tuning.duplicate_offset, (10.0, 10.0));
        assert_eq!(tuning.frame_max_scale, 6.0);
        assert!((tuning.rotate_snap_radians() - std::f64::consts::PI / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = AppConfig::new();
        config.preferences.log_level = LogLevel::Debug;
        config.tuning.frame_padding = 12.0;

        let json = config.to_json().unwrap();
        let loaded = AppConfig::from_json(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let loaded = AppConfig::from_json(r#"{"version":1,"tuning":{"fit_margin":0.8}}"#).unwrap();
        assert_eq!(loaded.tuning.fit_margin, 0.8);
        assert_eq!(loaded.tuning.zoom_sensitivity, 0.0015);
        assert_eq!(loaded.keybindings, KeyBindings::default());
        assert_eq!(loaded.app_name, "campus-map");
    }

    #[test]
    fn test_rejects_newer_version() {
        let err = AppConfig::from_json(r#"{"version":99}"#).unwrap_err();
        assert!(matches!(err, ConfigError::VersionTooNew { file_version: 99, .. }));
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }
}
