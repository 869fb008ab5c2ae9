// ABOUTME: Configuration management for kube-render
// ABOUTME: Loads logging and strictness settings from a YAML file, then applies environment overrides

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub strict_mode: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit `--config` path, then apply environment overrides.
    ///
    /// No file is read unless a path is given.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let mut config = match path {
            Some(config_path) if config_path.exists() => {
                let contents = std::fs::read_to_string(&config_path)
                    .with_context(|| format!("Failed to read config {}", config_path.display()))?;
                serde_yaml::from_str(&contents)
                    .with_context(|| format!("Invalid config {}", config_path.display()))?
            }
            _ => Config::default(),
        };

        config.merge_env()?;
        Ok(config)
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        if let Ok(level) = std::env::var("KUBE_RENDER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("KUBE_RENDER_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(strict) = std::env::var("KUBE_RENDER_STRICT") {
            self.strict_mode = strict
                .parse()
                .with_context(|| format!("KUBE_RENDER_STRICT must be true or false, got '{}'", strict))?;
        }

        Ok(())
    }
}
