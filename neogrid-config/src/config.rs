//! `Config` struct, YAML persistence and validation.

use crate::color::Rgb;
use crate::defaults;
use crate::error::ConfigError;
use crate::types::{LogLevel, VsyncMode};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Font family name, or a path to a TTF/OTF file
    #[serde(default = "defaults::font_family")]
    pub font_family: String,

    /// Font size in typographic points
    #[serde(default = "defaults::font_size")]
    pub font_size: f32,

    /// DPI override. `None` uses the platform DPI times the window scale factor.
    #[serde(default)]
    pub dpi: Option<f32>,

    /// Draw box-drawing and block-element characters procedurally
    #[serde(default = "defaults::box_drawing")]
    pub box_drawing: bool,

    #[serde(default = "defaults::default_foreground")]
    pub default_foreground: Rgb,

    #[serde(default = "defaults::default_background")]
    pub default_background: Rgb,

    /// Default color for undercurl and other "special" decorations
    #[serde(default = "defaults::default_special")]
    pub default_special: Rgb,

    /// Grid size used until the editor sends its first resize
    #[serde(default = "defaults::initial_rows")]
    pub initial_rows: usize,

    #[serde(default = "defaults::initial_cols")]
    pub initial_cols: usize,

    /// Glyph atlas texture width in texels (fixed for the atlas lifetime)
    #[serde(default = "defaults::atlas_width")]
    pub atlas_width: u32,

    /// Glyph atlas starting height in texels
    #[serde(default = "defaults::atlas_initial_height")]
    pub atlas_initial_height: u32,

    /// Height ceiling for atlas growth; further overflow resets the atlas
    #[serde(default = "defaults::atlas_max_height")]
    pub atlas_max_height: u32,

    #[serde(default)]
    pub vsync: VsyncMode,

    #[serde(default = "defaults::window_title")]
    pub window_title: String,

    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font_family: defaults::font_family(),
            font_size: defaults::font_size(),
            dpi: None,
            box_drawing: defaults::box_drawing(),
            default_foreground: defaults::default_foreground(),
            default_background: defaults::default_background(),
            default_special: defaults::default_special(),
            initial_rows: defaults::initial_rows(),
            initial_cols: defaults::initial_cols(),
            atlas_width: defaults::atlas_width(),
            atlas_initial_height: defaults::atlas_initial_height(),
            atlas_max_height: defaults::atlas_max_height(),
            vsync: VsyncMode::default(),
            window_title: defaults::window_title(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating it with defaults
    /// when missing.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            log::info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save_to(&config_path) {
                log::error!("Failed to save default config: {}", e);
            }
            Ok(config)
        }
    }

    /// Load and validate configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Config = serde_yaml_ng::from_str(&contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::Parse)?;

        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(ConfigError::Io)?;
        fs::rename(&temp_path, path).map_err(ConfigError::Io)?;

        Ok(())
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("neogrid").join("config.yaml")
            } else {
                PathBuf::from("config.yaml")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("neogrid").join("config.yaml")
            } else {
                PathBuf::from("config.yaml")
            }
        }
    }

    /// Check field values that serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(ConfigError::Validation(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }
        if let Some(dpi) = self.dpi
            && !(dpi.is_finite() && dpi > 0.0)
        {
            return Err(ConfigError::Validation(format!(
                "dpi must be positive, got {dpi}"
            )));
        }
        if self.initial_rows == 0 || self.initial_cols == 0 {
            return Err(ConfigError::Validation(format!(
                "initial grid must be non-empty, got {}x{}",
                self.initial_rows, self.initial_cols
            )));
        }
        if self.atlas_width == 0 || self.atlas_initial_height == 0 {
            return Err(ConfigError::Validation(
                "atlas dimensions must be non-zero".to_string(),
            ));
        }
        if self.atlas_initial_height > self.atlas_max_height {
            return Err(ConfigError::Validation(format!(
                "atlas_initial_height ({}) exceeds atlas_max_height ({})",
                self.atlas_initial_height, self.atlas_max_height
            )));
        }
        Ok(())
    }
}
