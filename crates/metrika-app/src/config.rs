//! Configuration management
//!
//! Config stored at: ~/.config/metrika/config.json

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use metrika_types::{ConfigError, OutputFormat, Result};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Daily water intake goal in liters
    #[serde(default = "default_water_goal")]
    pub water_goal_liters: f64,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    /// Data directory override
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Text recognizer command template; sidecar transcripts when unset
    #[serde(default)]
    pub recognizer_command: Option<String>,

    /// Enable the recognition result cache
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Cache directory override
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Deadline for store and recognizer calls, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_water_goal() -> f64 {
    2.0
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            water_goal_liters: default_water_goal(),
            output_format: default_output_format(),
            data_dir: None,
            recognizer_command: None,
            cache_enabled: true,
            cache_dir: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound)?
            .join("metrika");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Data directory holding the health store
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| ConfigError::NotFound)?
            .join("metrika");
        Ok(data_dir)
    }

    /// Recognition cache directory
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }

        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| ConfigError::NotFound)?
            .join("metrika");
        Ok(cache_dir)
    }

    /// Deadline applied to every external call
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file. Writes a sibling temp file first so a failed
    /// write never truncates the existing config.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::rename(&tmp, &path).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Metrika Configuration")?;
        writeln!(f, "=====================")?;
        writeln!(f)?;
        writeln!(f, "Water goal:     {:.2} L", self.water_goal_liters)?;
        writeln!(f, "Output format:  {}", self.output_format)?;
        writeln!(
            f,
            "Recognizer:     {}",
            self.recognizer_command
                .as_deref()
                .unwrap_or("(sidecar transcript)")
        )?;
        writeln!(f, "Cache enabled:  {}", self.cache_enabled)?;
        writeln!(
            f,
            "Cache dir:      {}",
            self.cache_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Timeout:        {}s", self.timeout_secs)?;
        writeln!(
            f,
            "Data dir:       {}",
            self.data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}
