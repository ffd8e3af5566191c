//! TOML-based configuration.
//!
//! Supports a config file (sqldag.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [server]
//! port = 8000
//! open_browser = true
//!
//! [project]
//! path = "${HOME}/projects/warehouse/sql"
//! dialect = "bigquery"
//! discovery = false
//! document = "sql_diagram.json"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::dialect::Dialect;
use crate::persist::DEFAULT_DOCUMENT;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Embedded web server configuration.
    #[serde(default)]
    pub server: ServerSettings,

    /// Default project configuration.
    #[serde(default)]
    pub project: ProjectSettings,
}

/// Web server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Port to bind on localhost.
    pub port: u16,

    /// Open the system browser once the server is listening.
    pub open_browser: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8000,
            open_browser: true,
        }
    }
}

/// Project configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Folder containing the SQL files (supports ${ENV_VAR} expansion).
    pub path: String,

    /// SQL dialect used for reference extraction.
    pub dialect: Dialect,

    /// Emit ghost external nodes for unresolvable dependencies.
    pub discovery: bool,

    /// Configuration document loaded on startup.
    pub document: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            path: String::new(),
            dialect: Dialect::default(),
            discovery: false,
            document: DEFAULT_DOCUMENT.to_string(),
        }
    }
}

impl ProjectSettings {
    /// Get the project path with environment variables expanded.
    pub fn resolved_path(&self) -> Result<PathBuf, SettingsError> {
        Ok(PathBuf::from(expand_env_vars(&self.path)?))
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SQLDAG_CONFIG`
    /// 2. `./sqldag.toml`
    /// 3. `~/.config/sqldag/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SQLDAG_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("sqldag.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("sqldag").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' {
            if chars.peek() == Some(&'{') {
                chars.next();
                let mut var_name = String::new();
                while let Some(ch) = chars.next() {
                    if ch == '}' {
                        break;
                    }
                    var_name.push(ch);
                }
                let value = env::var(&var_name)
                    .map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
                result.push_str(&value);
            } else {
                let mut var_name = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_alphanumeric() || ch == '_' {
                        var_name.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if var_name.is_empty() {
                    result.push('$');
                } else {
                    let value = env::var(&var_name)
                        .map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
                    result.push_str(&value);
                }
            }
        } else {
            result.push(c);
        }
    }

    Ok(result)
}
