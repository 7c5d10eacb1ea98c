use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const CONFIG_FILE_PATH: &str = "config.toml";
const DEFAULT_FAN_OUT_LIMIT: usize = 4;
const DEFAULT_INSIGHT_CACHE_CAPACITY: usize = 128;
const DEFAULT_INSIGHT_CACHE_TTL_SECS: u64 = 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration key: {0}")]
    MissingKey(String),

    #[error("invalid value for configuration key {key}: {value:?}")]
    InvalidKey { key: String, value: String },

    #[error("failed to read config file {path}: {message}")]
    File { path: PathBuf, message: String },
}

/// How the dispatcher invokes registered providers for one prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// One provider completes before the next starts.
    #[default]
    Sequential,
    /// All providers run at once; the dispatcher joins them before returning.
    Concurrent,
}

impl FromStr for DispatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "serial" => Ok(Self::Sequential),
            "concurrent" | "parallel" => Ok(Self::Concurrent),
            other => Err(format!("unknown dispatch mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub openai_base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub ets_base_url: Option<String>,
    #[serde(default)]
    pub dispatch_mode: DispatchMode,
    #[serde(default = "default_fan_out_limit")]
    pub fan_out_limit: usize,
    #[serde(default = "default_insight_cache_capacity")]
    pub insight_cache_capacity: usize,
    #[serde(default = "default_insight_cache_ttl_secs")]
    pub insight_cache_ttl_secs: u64,
    /// Provider names to register, in registration order.
    #[serde(default)]
    pub providers: Vec<String>,
}

fn default_fan_out_limit() -> usize {
    DEFAULT_FAN_OUT_LIMIT
}

fn default_insight_cache_capacity() -> usize {
    DEFAULT_INSIGHT_CACHE_CAPACITY
}

fn default_insight_cache_ttl_secs() -> u64 {
    DEFAULT_INSIGHT_CACHE_TTL_SECS
}

pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".travel-context")
}

pub fn config_json_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Resolves one typed value from the process environment.
pub fn config_value<T: FromStr>(key: &str) -> Result<T, ConfigError> {
    value_from(key, |k| std::env::var(k).ok())
}

fn value_from<T, F>(key: &str, lookup: F) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).ok_or_else(|| ConfigError::MissingKey(key.to_string()))?;
    raw.trim().parse().map_err(|_| ConfigError::InvalidKey {
        key: key.to_string(),
        value: raw,
    })
}

fn optional_value<T, F>(key: &str, lookup: &F) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match value_from(key, lookup) {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::MissingKey(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: None,
            model: None,
            temperature: None,
            ets_base_url: None,
            dispatch_mode: DispatchMode::default(),
            fan_out_limit: DEFAULT_FAN_OUT_LIMIT,
            insight_cache_capacity: DEFAULT_INSIGHT_CACHE_CAPACITY,
            insight_cache_ttl_secs: DEFAULT_INSIGHT_CACHE_TTL_SECS,
            providers: Vec::new(),
        }
    }
}

impl Config {
    /// Loads `~/.travel-context/config.json`, falling back to `./config.toml`,
    /// then applies environment overrides. Environment values always win.
    pub fn load() -> Result<Self, ConfigError> {
        let json_path = config_json_path();
        let mut config = if json_path.exists() {
            Self::from_file(&json_path)?
        } else if Path::new(CONFIG_FILE_PATH).exists() {
            Self::from_file(Path::new(CONFIG_FILE_PATH))?
        } else {
            log::debug!("No config file found, using defaults");
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Reads a JSON or TOML config file, chosen by extension.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file_error = |message: String| ConfigError::File {
            path: path.to_path_buf(),
            message,
        };

        let content = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| file_error(e.to_string()))?
            }
            _ => toml::from_str(&content).map_err(|e| file_error(e.to_string()))?,
        };

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Applies overrides from `lookup` (the process environment in [`Config::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = optional_value::<String, _>(API_KEY_ENV, &lookup)? {
            self.openai_api_key = Some(api_key);
        }
        if let Some(base_url) = optional_value::<String, _>("OPENAI_BASE_URL", &lookup)? {
            self.openai_base_url = Some(base_url);
        }
        if let Some(model) = optional_value::<String, _>("OPENAI_MODEL", &lookup)? {
            self.model = Some(model);
        }
        if let Some(temperature) = optional_value::<f32, _>("OPENAI_TEMPERATURE", &lookup)? {
            self.temperature = Some(temperature);
        }
        if let Some(ets_base_url) = optional_value::<String, _>("ETS_BASE_URL", &lookup)? {
            self.ets_base_url = Some(ets_base_url);
        }
        if let Some(mode) = optional_value::<DispatchMode, _>("CONTEXT_DISPATCH_MODE", &lookup)? {
            self.dispatch_mode = mode;
        }
        if let Some(limit) = optional_value::<usize, _>("CONTEXT_FAN_OUT_LIMIT", &lookup)? {
            self.fan_out_limit = limit;
        }
        if let Some(capacity) = optional_value::<usize, _>("INSIGHT_CACHE_CAPACITY", &lookup)? {
            self.insight_cache_capacity = capacity;
        }
        if let Some(ttl) = optional_value::<u64, _>("INSIGHT_CACHE_TTL_SECS", &lookup)? {
            self.insight_cache_ttl_secs = ttl;
        }
        if let Some(providers) = lookup("CONTEXT_PROVIDERS") {
            self.providers = providers
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(())
    }

    /// The completion API key; startup cannot proceed without it.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        match self.openai_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::MissingKey(API_KEY_ENV.to_string())),
        }
    }
}
