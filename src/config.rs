use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Remote REST store connection
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RemoteConfig {
    /// Base URL of the store (e.g. "https://project.supabase.co")
    pub url: Option<String>,
    /// Static bearer credential sent with every call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl RemoteConfig {
    /// Returns true if both url and api_key are set
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.api_key.is_some()
    }

    /// First characters of the key, for display
    pub fn masked_key(&self) -> Option<String> {
        self.api_key
            .as_ref()
            .map(|key| format!("{}...", key.chars().take(8).collect::<String>()))
    }
}

/// HTTP read endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Directory with dashboard assets served on unmatched routes
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: None,
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Path to the SQLite database
    pub database_path: ConfigValue<PathBuf>,
    /// Default log file for parse, import and sync
    pub log_path: Option<ConfigValue<PathBuf>>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    pub remote: RemoteConfig,
    pub server: ServerConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    database_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
    remote: Option<RemoteConfig>,
    server: Option<ServerConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let default_db_path = Self::default_data_dir().join("health_data.db");

        // Start with defaults
        let mut database_path = ConfigValue::new(default_db_path, ConfigSource::Default);
        let mut log_path = None;
        let mut config_file = None;
        let mut remote = RemoteConfig::default();
        let mut server = ServerConfig::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(db_path) = file_config.database_path {
                let resolved = Self::resolve_relative(&path, db_path);
                database_path = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(log) = file_config.log_path {
                let resolved = Self::resolve_relative(&path, log);
                log_path = Some(ConfigValue::new(resolved, ConfigSource::File));
            }
            if let Some(remote_config) = file_config.remote {
                remote = remote_config;
            }
            if let Some(mut server_config) = file_config.server {
                server_config.static_dir = server_config
                    .static_dir
                    .map(|dir| Self::resolve_relative(&path, dir));
                server = server_config;
            }
        }

        // Apply environment variable overrides
        if let Ok(db_path) = std::env::var("HEALTHLOG_DATABASE_PATH") {
            database_path = ConfigValue::new(PathBuf::from(db_path), ConfigSource::Environment);
        }
        if let Ok(log) = std::env::var("HEALTHLOG_LOG_PATH") {
            log_path = Some(ConfigValue::new(
                PathBuf::from(log),
                ConfigSource::Environment,
            ));
        }
        if let Ok(url) = std::env::var("HEALTHLOG_REMOTE_URL") {
            remote.url = Some(url);
        }
        if let Ok(key) = std::env::var("HEALTHLOG_REMOTE_API_KEY") {
            remote.api_key = Some(key);
        }
        if let Some(port) = std::env::var("HEALTHLOG_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            server.port = port;
        }

        Ok(Self {
            database_path,
            log_path,
            config_file,
            remote,
            server,
        })
    }

    /// Relative paths in the config file are resolved against its directory
    fn resolve_relative(config_path: &std::path::Path, path: PathBuf) -> PathBuf {
        if path.is_relative() {
            config_path
                .parent()
                .map(|p| p.join(&path))
                .unwrap_or(path)
        } else {
            path
        }
    }

    /// Default config directory (platform-specific), e.g. ~/.config/healthlog/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("healthlog")
    }

    /// Default data directory (platform-specific), e.g. ~/.local/share/healthlog/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("healthlog")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
