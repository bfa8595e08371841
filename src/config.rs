use crate::history::DEFAULT_MAX_ENTRIES;
use crate::scoring::ThreatLevel;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_history_path")]
    pub path: String,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow::anyhow!(
                "Unsupported format: {}. Use text or json",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Exit non-zero when any result reaches this tier
    pub fail_on: Option<ThreatLevel>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_true() -> bool {
    true
}

fn default_history_path() -> String {
    "qr-shield-history.json".to_string()
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_history_path(),
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            output: OutputConfig::default(),
            logging: Some(LoggingConfig {
                level: "info".to_string(),
            }),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        let config: Config = serde_yaml::from_str(&content).with_context(|| {
            format!("Failed to parse YAML config: {}", path.as_ref().display())
        })?;
        Ok(config)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(&path, content).with_context(|| {
            format!("Failed to write config file: {}", path.as_ref().display())
        })?;
        Ok(())
    }

    pub fn log_level(&self) -> Option<log::LevelFilter> {
        self.logging
            .as_ref()
            .and_then(|logging| logging.level.parse().ok())
    }
}

/// Missing config is normal for a command-line tool; only a broken file is worth a warning.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Config {
    if !path.as_ref().exists() {
        log::debug!(
            "No config at {}, using defaults",
            path.as_ref().display()
        );
        return Config::default();
    }

    match Config::from_file(&path) {
        Ok(config) => {
            log::info!("Loaded configuration from: {}", path.as_ref().display());
            config
        }
        Err(e) => {
            log::warn!("Failed to load config ({:#}), using defaults", e);
            Config::default()
        }
    }
}
