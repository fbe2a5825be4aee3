use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::provider::{UnitGroup, visualcrossing::DEFAULT_BASE_URL};

pub const ENV_API_TOKEN: &str = "API_TOKEN";
pub const ENV_WEATHER_API_KEY: &str = "WEATHER_API_KEY";
pub const ENV_WEATHER_API_BASE_URL: &str = "WEATHER_API_BASE_URL";
pub const ENV_WEATHER_UNIT_GROUP: &str = "WEATHER_UNIT_GROUP";

/// Where and how the upstream provider is queried.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub unit_group: UnitGroup,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), unit_group: UnitGroup::default() }
    }
}

/// Listen address of the HTTP service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

/// Process-wide configuration, assembled once at startup.
///
/// Example TOML:
/// ```toml
/// api_token = "..."
/// weather_api_key = "..."
///
/// [upstream]
/// unit_group = "metric"
///
/// [server]
/// port = 5000
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Shared secret callers must send as `token`.
    pub api_token: Option<String>,

    /// Upstream provider credential.
    pub weather_api_key: Option<String>,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load the config file (if any) and overlay the process environment.
    ///
    /// With an explicit `path` the file must exist; otherwise the platform
    /// config file is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(path) => Self::load_file(path)?,
            None => {
                let path = Self::config_file_path()?;
                if path.exists() { Self::load_file(&path)? } else { Self::default() }
            }
        };

        cfg.apply_env(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Override values with whatever `lookup` returns for the known variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api_token = Some(token);
        }

        if let Some(key) = lookup(ENV_WEATHER_API_KEY) {
            self.weather_api_key = Some(key);
        }

        if let Some(base_url) = lookup(ENV_WEATHER_API_BASE_URL) {
            self.upstream.base_url = base_url;
        }

        if let Some(unit) = lookup(ENV_WEATHER_UNIT_GROUP) {
            self.upstream.unit_group = UnitGroup::try_from(unit.as_str())
                .with_context(|| format!("Invalid {ENV_WEATHER_UNIT_GROUP} value"))?;
        }

        Ok(())
    }

    pub fn api_token(&self) -> Result<&str> {
        required(self.api_token.as_deref(), ENV_API_TOKEN, "api_token")
    }

    pub fn weather_api_key(&self) -> Result<&str> {
        required(self.weather_api_key.as_deref(), ENV_WEATHER_API_KEY, "weather_api_key")
    }

    /// Path to the optional config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn required<'a>(value: Option<&'a str>, env: &str, key: &str) -> Result<&'a str> {
    value.filter(|v| !v.is_empty()).ok_or_else(|| {
        anyhow!(
            "No {key} configured.\n\
             Hint: set the {env} environment variable (or `{key}` in the config file)."
        )
    })
}
