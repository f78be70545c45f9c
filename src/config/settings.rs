//! TOML-based configuration for Cubist.
//!
//! Supports a config file (cubist.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [cube]
//! server = "${CUBE_SERVER}"
//! catalog = "MultidimensionalProject1"
//! name = "DW"
//!
//! [bridge]
//! path = "./bridge/cubist-bridge"
//! timeout_secs = 30
//!
//! [server]
//! host = "127.0.0.1"
//! port = 5000
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

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
    /// Cube connection configuration.
    pub cube: CubeSettings,

    /// Bridge process configuration.
    pub bridge: BridgeSettings,

    /// HTTP server configuration.
    pub server: ServerSettings,
}

/// Cube connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CubeSettings {
    /// Cube server address (supports ${ENV_VAR} expansion).
    pub server: String,

    /// Catalog (database) holding the cube.
    pub catalog: String,

    /// Cube name queries run against.
    pub name: String,
}

impl Default for CubeSettings {
    fn default() -> Self {
        Self {
            server: "localhost".to_string(),
            catalog: "MultidimensionalProject1".to_string(),
            name: "DW".to_string(),
        }
    }
}

impl CubeSettings {
    /// Get the server address with environment variables expanded.
    pub fn resolved_server(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.server)
    }
}

/// Bridge process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Path to the bridge binary (searched in common locations if unset).
    pub path: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            path: None,
            timeout_secs: 30,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,

    /// Bind port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
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
    /// 1. Environment variable `CUBIST_CONFIG`
    /// 2. `./cubist.toml`
    /// 3. `~/.config/cubist/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("CUBIST_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("cubist.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("cubist").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    /// Get the configured bridge binary path, env-expanded.
    pub fn bridge_path(&self) -> Option<PathBuf> {
        let path = self.bridge.path.as_ref()?;
        let expanded = expand_env_vars(path).ok()?;
        Some(PathBuf::from(expanded))
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next(); // consume '{'
        }

        let mut var_name = String::new();
        while let Some(&ch) = chars.peek() {
            if braced {
                if ch == '}' {
                    chars.next(); // consume '}'
                    break;
                }
                var_name.push(ch);
                chars.next();
            } else if ch.is_alphanumeric() || ch == '_' {
                var_name.push(ch);
                chars.next();
            } else {
                break;
            }
        }

        if var_name.is_empty() {
            // A lone $, keep it
            result.push('$');
        } else {
            let value =
                env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
            result.push_str(&value);
        }
    }

    Ok(result)
}
