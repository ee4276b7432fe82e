//! Widget configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ClipperError, ClipperResult};

/// Global widget configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipperConfig {
    /// Where the last explicit device choice is persisted.
    pub storage: StorageConfig,

    /// Camera constraints and preview hints.
    pub capture: CaptureDefaults,

    /// Binary-to-text transport settings.
    pub transport: TransportConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Persistence keys for the device selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key holding the last chosen camera id.
    pub camera_key: String,

    /// Key holding the last chosen microphone id.
    pub mic_key: String,

    /// Optional JSON file backing the key-value store.
    pub path: Option<PathBuf>,
}

/// Orientation hint passed to the platform when opening the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    #[default]
    User,
    Environment,
}

/// Default camera constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureDefaults {
    /// Requested camera aspect ratio (width / height).
    pub aspect_ratio: f64,

    /// Requested camera orientation.
    pub facing: FacingMode,

    /// Whether the preview is shown mirrored (selfie view).
    pub mirror_preview: bool,
}

/// Transport payload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Number of bytes fed to the base64 encoder at a time.
    pub block_size: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "clipper=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            camera_key: "multimodal-camera".to_string(),
            mic_key: "multimodal-mic".to_string(),
            path: None,
        }
    }
}

impl Default for CaptureDefaults {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            facing: FacingMode::User,
            mirror_preview: true,
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { block_size: 1024 }
    }
}

impl TransportConfig {
    pub fn validate(&self) -> ClipperResult<()> {
        if self.block_size == 0 {
            return Err(ClipperError::config("transport.block_size must be > 0"));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl ClipperConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(path: &std::path::Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str::<Self>(&content) {
                    Ok(config) => match config.transport.validate() {
                        Ok(()) => return config,
                        Err(e) => tracing::warn!("Invalid config at {:?}: {}", path, e),
                    },
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> ClipperResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    config_base_dir().join("clipper").join("config.json")
}

/// Default location of the persisted device selection.
pub fn default_store_path() -> PathBuf {
    config_base_dir().join("clipper").join("devices.json")
}

fn config_base_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        })
}
