use chrono::TimeDelta;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::query::{parse_tolerance, DEFAULT_MAX_DISTANCE_M, DEFAULT_TOLERANCE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Root searched recursively for JSON/VTT source pairs.
    pub directory: PathBuf,
}

/// Defaults applied when a request leaves a parameter out.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_max_distance")]
    pub max_distance_m: f64,
    #[serde(
        default = "default_tolerance",
        deserialize_with = "deserialize_tolerance"
    )]
    pub tolerance: TimeDelta,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_distance_m: default_max_distance(),
            tolerance: default_tolerance(),
        }
    }
}

fn default_max_distance() -> f64 {
    DEFAULT_MAX_DISTANCE_M
}

fn default_tolerance() -> TimeDelta {
    DEFAULT_TOLERANCE
}

fn deserialize_tolerance<'de, D>(deserializer: D) -> Result<TimeDelta, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_tolerance(&s).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }
}
