//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{CoverError, CoverResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Optional font and logo assets.
    pub assets: AssetConfig,

    /// Export surface and encoding settings.
    pub export: ExportSettings,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Paths to assets loaded at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// TrueType/OpenType font used for the title and subtitle.
    /// Text layers are skipped when unset.
    pub font_path: Option<PathBuf>,

    /// Brand logo drawn in the top-right corner.
    pub logo_path: Option<PathBuf>,
}

/// Export parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Width of the exported image in pixels.
    pub target_width: u32,

    /// Height of the exported image in pixels.
    pub target_height: u32,

    /// Preview surface size as a multiple of the target size.
    pub preview_scale: f64,

    /// Lossy encoding quality in `(0.0, 1.0]`.
    pub quality: f32,

    /// File name the export is delivered under.
    pub file_name: String,

    /// Directory exports are written to.
    pub output_dir: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "coverforge=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            target_width: 1280,
            target_height: 720,
            preview_scale: 2.0,
            quality: 0.95,
            file_name: "image.webp".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl ExportSettings {
    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> CoverResult<()> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(CoverError::config("target size must be non-zero"));
        }
        if !(self.preview_scale.is_finite() && self.preview_scale > 0.0) {
            return Err(CoverError::config("preview_scale must be positive"));
        }
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(CoverError::config("quality must be within (0, 1]"));
        }
        if self.file_name.trim().is_empty() {
            return Err(CoverError::config("file_name must not be empty"));
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

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("coverforge").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_defaults() {
        let export = ExportSettings::default();
        assert_eq!((export.target_width, export.target_height), (1280, 720));
        assert_eq!(export.preview_scale, 2.0);
        assert_eq!(export.file_name, "image.webp");
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"assets":{"font_path":"/fonts/mono.ttf"}}"#).unwrap();
        assert_eq!(
            config.assets.font_path,
            Some(PathBuf::from("/fonts/mono.ttf"))
        );
        assert!(config.assets.logo_path.is_none());
        assert_eq!(config.export.target_width, 1280);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_bad_quality() {
        let export = ExportSettings {
            quality: 0.0,
            ..ExportSettings::default()
        };
        assert!(export.validate().is_err());
    }

    #[test]
    fn test_load_from_missing_path_is_default() {
        let config = AppConfig::load_from(std::path::Path::new("/nonexistent/coverforge.json"));
        assert_eq!(config.export.quality, 0.95);
    }
}
