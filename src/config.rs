use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{
    error::{ConfigError, Result},
    timeline::transform::Dimensions,
};

/// Main configuration for clipmerge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Render target settings
    pub render: RenderConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Media library settings
    pub library: LibraryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            export: ExportConfig::default(),
            library: LibraryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.render.validate()?;
        self.export.validate()?;
        Ok(())
    }
}

/// Render target configuration
///
/// The render size is the reference app's "display bounds" made explicit:
/// a caller-supplied target rather than a global screen singleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Render target width in pixels
    pub width: f64,

    /// Render target height in pixels
    pub height: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 844.0,
        }
    }
}

impl RenderConfig {
    /// The render target as dimensions.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    fn validate(&self) -> Result<()> {
        if self.width <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "render.width".to_string(),
                value: self.width.to_string()
            }.into());
        }

        if self.height <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "render.height".to_string(),
                value: self.height.to_string()
            }.into());
        }

        Ok(())
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output container format
    pub container: String,

    /// Quality setting (0-100, higher is better)
    pub quality: u8,

    /// Optimize the container layout for streaming playback
    pub optimize_for_streaming: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            container: "mov".to_string(),
            quality: 100,
            optimize_for_streaming: true,
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<()> {
        if self.quality > 100 {
            return Err(ConfigError::InvalidValue {
                key: "export.quality".to_string(),
                value: self.quality.to_string()
            }.into());
        }

        if !matches!(self.container.as_str(), "mov" | "mp4") {
            return Err(ConfigError::InvalidValue {
                key: "export.container".to_string(),
                value: self.container.clone()
            }.into());
        }

        Ok(())
    }
}

/// Media library configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Copy finished exports into the library directory
    pub save_to_library: bool,

    /// Library directory (defaults to "./library" when enabled)
    pub directory: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            save_to_library: false,
            directory: None,
        }
    }
}

impl LibraryConfig {
    /// The effective library directory.
    pub fn directory(&self) -> PathBuf {
        self.directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("library"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let original_config = Config::default();

        // Save and load
        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config.render.width, loaded_config.render.width);
        assert_eq!(original_config.export.quality, loaded_config.export.quality);
        assert_eq!(
            original_config.export.container,
            loaded_config.export.container
        );
    }

    #[test]
    fn test_invalid_render_size() {
        let mut config = Config::default();
        config.render.width = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_container() {
        let mut config = Config::default();
        config.export.container = "webm".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::from_file("does/not/exist.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_library_directory_default() {
        let config = LibraryConfig::default();
        assert_eq!(config.directory(), PathBuf::from("library"));
    }
}
