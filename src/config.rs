//! Application configuration.
//!
//! Defaults, then an optional JSON file, then environment overrides.

use crate::EdgeIdStrategy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "OGBT_CONFIG";
/// Config file used when `OGBT_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "ogbt.json";

/// Light/dark colour scheme of the shell
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other scheme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

impl std::str::FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(anyhow::anyhow!("Unknown theme: {}", other)),
        }
    }
}

/// Shell and surface settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlowConfig {
    pub theme: Theme,

    /// Whether the sidebar starts expanded
    pub sidebar_open: bool,

    pub show_minimap: bool,

    pub show_controls: bool,

    /// Spacing of the dotted background, in canvas units
    pub background_gap: f32,

    pub edge_ids: EdgeIdStrategy,

    /// Initial window size (width, height)
    pub window_size: [f32; 2],
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            sidebar_open: true,
            show_minimap: true,
            show_controls: true,
            background_gap: 12.0,
            edge_ids: EdgeIdStrategy::Sequential,
            window_size: [1280.0, 800.0],
        }
    }
}

impl FlowConfig {
    /// Load from the file named by `OGBT_CONFIG` (or `ogbt.json`) and the process environment
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_file_path())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Path named by `OGBT_CONFIG`, or `ogbt.json` in the working directory
    pub fn config_file_path() -> PathBuf {
        std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load from a file, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Apply `OGBT_THEME` and `OGBT_EDGE_IDS` overrides
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let theme: Option<Theme> = lookup("OGBT_THEME")
            .map(|v| v.parse())
            .transpose()
            .context("Invalid OGBT_THEME")?;
        let edge_ids: Option<EdgeIdStrategy> = lookup("OGBT_EDGE_IDS")
            .map(|v| v.parse())
            .transpose()
            .context("Invalid OGBT_EDGE_IDS")?;

        // Nothing is applied unless every override parses
        if let Some(theme) = theme {
            self.theme = theme;
        }
        if let Some(edge_ids) = edge_ids {
            self.edge_ids = edge_ids;
        }
        Ok(())
    }

    /// Save to a file as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }
}
