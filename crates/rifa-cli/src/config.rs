//! `rifa.toml` loading

use anyhow::{Context, Result};
use rifa_copywriter::GeminiConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read from the working directory when `--config` is absent
pub(crate) const DEFAULT_CONFIG_FILE: &str = "rifa.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AppConfig {
    pub(crate) storage: StorageConfig,
    pub(crate) logging: LoggingConfig,
    pub(crate) copywriter: CopywriterConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct StorageConfig {
    pub(crate) data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("rifa-data"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum LogFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LoggingConfig {
    pub(crate) level: String,
    pub(crate) format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Plain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CopywriterConfig {
    pub(crate) api_key: Option<String>,
    pub(crate) model: String,
    pub(crate) endpoint: String,
    pub(crate) timeout_secs: u64,
}

impl Default for CopywriterConfig {
    fn default() -> Self {
        let gemini = GeminiConfig::default();
        Self {
            api_key: None,
            model: gemini.model,
            endpoint: gemini.endpoint,
            timeout_secs: gemini.timeout.as_secs(),
        }
    }
}

impl AppConfig {
    /// Load `path`, or `rifa.toml` if present, then apply env overrides
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::read(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::read(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub(crate) fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// `RIFA_DATA_DIR` and `GEMINI_API_KEY` take precedence over the file
    pub(crate) fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("RIFA_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup("GEMINI_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.copywriter.api_key = Some(key);
        }
    }

    pub(crate) fn gemini(&self) -> GeminiConfig {
        let config = GeminiConfig {
            api_key: None,
            model: self.copywriter.model.clone(),
            endpoint: self.copywriter.endpoint.clone(),
            timeout: Duration::from_secs(self.copywriter.timeout_secs),
        };
        match &self.copywriter.api_key {
            Some(key) => config.with_api_key(key.clone()),
            None => config,
        }
    }
}
