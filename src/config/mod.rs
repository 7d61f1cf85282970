//! Configuration: cell style, localization and platform integration

mod localization;
mod style;

pub use localization::ChatLocalization;
pub use style::{ChatStyle, StyleColor};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a renderer needs besides the message itself.
///
/// Passed explicitly to renderers instead of living in globals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub style: ChatStyle,
    pub localization: ChatLocalization,
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Command used to open links (defaults to `xdg-open`, or `open` on macOS).
    pub opener: Option<String>,
    pub style: ChatStyle,
    pub localization: ChatLocalization,
}

impl Config {
    /// Get config directory path
    fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "chat-cells", "chat-cells")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let mut config: Self = toml::from_str(&content).context("Failed to parse config file")?;
        config.localization.sanitize_date_format();
        Ok(config)
    }

    /// Serialize to the on-disk TOML form.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            style: self.style.clone(),
            localization: self.localization.clone(),
        }
    }

    pub fn opener(&self) -> &str {
        match self.opener.as_deref() {
            Some(cmd) => cmd,
            None if cfg!(target_os = "macos") => "open",
            None => "xdg-open",
        }
    }
}
