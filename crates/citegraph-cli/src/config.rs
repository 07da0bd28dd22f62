//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use citegraph_graph::NodeScope;
use serde::Deserialize;

/// Global configuration for citegraph
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub resolve: ResolveConfig,
    pub graph: GraphConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub default_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_dir: PathBuf::from("./data"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    pub api_url: String,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub api_key: Option<String>,
    /// Milliseconds between lookups
    pub delay_ms: u64,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            api_url: citegraph_resolve::api::DEFAULT_API_URL.to_string(),
            api_key: std::env::var("S2_API_KEY").ok(),
            delay_ms: 1000,
            timeout_secs: 30,
        }
    }
}

impl ResolveConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub write_matrix: bool,
    #[serde(deserialize_with = "deserialize_scope")]
    pub scope: NodeScope,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            write_matrix: true,
            scope: NodeScope::default(),
        }
    }
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

fn deserialize_scope<'de, D>(deserializer: D) -> Result<NodeScope, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    NodeScope::from_name(&s).ok_or_else(|| {
        serde::de::Error::custom(format!("unknown scope {s:?}, expected touched or corpus"))
    })
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./citegraph.toml (current directory)
    /// 2. the user config directory (e.g. ~/.config/citegraph/config.toml)
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("citegraph.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(dirs) = directories::ProjectDirs::from("", "", "citegraph") {
            let user_config = dirs.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
