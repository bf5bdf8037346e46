use crate::generator::{GeneratorError, GeneratorResult, KeywordMode};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "sqldraft";
const CONFIG_FILE: &str = "config.toml";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub enum LogLevel {
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    Info,
    #[default]
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub console_output: bool,
    pub file_output: bool,
    pub file_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: LogLevel::Warn,
            console_output: true,
            file_output: false,
            file_path: default_log_file_path(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MatchingConfig {
    /// How request keywords are detected: substring (default) or word_boundary
    pub keyword_mode: KeywordMode,
    /// How long a loaded template library is reused; 0 reloads it on every request
    pub cache_ttl_seconds: u64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        MatchingConfig {
            keyword_mode: KeywordMode::Substring,
            cache_ttl_seconds: 300,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
    pub database_path: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        AuditConfig {
            enabled: true,
            database_path: PathBuf::from("logs.db"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub recipient: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        NotificationConfig {
            enabled: true,
            recipient: "dev@example.com".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding one SQL template per file
    pub library_dir: PathBuf,
    /// Name recorded in the audit log when none is given
    pub default_user: String,
    pub matching: MatchingConfig,
    pub audit: AuditConfig,
    pub notification: NotificationConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            library_dir: PathBuf::from("library"),
            default_user: std::env::var("USER").unwrap_or_else(|_| "jdoe".to_string()),
            matching: MatchingConfig::default(),
            audit: AuditConfig::default(),
            notification: NotificationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Directory holding config.toml and the log file
    pub fn get_config_directory() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR))
    }

    pub fn get_config_path() -> Option<PathBuf> {
        Self::get_config_directory().map(|dir| dir.join(CONFIG_FILE))
    }

    /// Load the user's config file, falling back to defaults when it is missing or broken
    pub fn load() -> Self {
        let Some(path) = Self::get_config_path() else {
            return Config::default();
        };
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Config::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error reading config file {} ({e}), using defaults", path.display());
                Config::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> GeneratorResult<Self> {
        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> GeneratorResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml = toml::to_string(self).map_err(|e| {
            GeneratorError::ConfigurationError(format!("Serialization error: {e}"))
        })?;
        let mut file = File::create(path)?;
        file.write_all(toml.as_bytes())?;
        Ok(())
    }
}

fn default_log_file_path() -> String {
    Config::get_config_directory()
        .map(|dir| dir.join("sqldraft.log"))
        .unwrap_or_else(|| PathBuf::from("sqldraft.log"))
        .to_string_lossy()
        .to_string()
}
