//! Configuration types for the tasktrack server.
//!
//! Configuration is read once at startup from a TOML file and passed
//! explicitly to whatever needs it:
//!
//! ```toml
//! secrets_file = "../data.json"
//!
//! [server]
//! bind = "0.0.0.0:8000"
//!
//! [auth]
//! token_url = "token"
//!
//! [database]
//! backend = "postgres"
//! host = "localhost"
//! database = "task_tracker"
//! password_env = "TASKTRACK_DB_PASSWORD"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! The optional secrets file is JSON of the form
//! `{"password": "<database password>", "token": "<token endpoint>"}`.

pub mod database;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use database::{DatabaseConfig, PoolConfig, StoreBackend};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "TASKTRACK_CONFIG";

/// Config file used when neither a flag nor the env var names one.
pub const DEFAULT_CONFIG_PATH: &str = "tasktrack.toml";

/// Complete tasktrack configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrackerConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// JSON file holding the database password and token endpoint.
    /// Relative paths resolve against the config file's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:8000"
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Path of the password-grant endpoint, with or without a leading slash.
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_url: default_token_url(),
        }
    }
}

impl AuthConfig {
    /// The token endpoint as an absolute route path.
    pub fn token_route(&self) -> String {
        let trimmed = self.token_url.trim().trim_start_matches('/');
        if trimmed.is_empty() {
            format!("/{}", default_token_url())
        } else {
            format!("/{trimmed}")
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Externally supplied secrets.
#[derive(Debug, Clone, Deserialize)]
pub struct Secrets {
    /// Database password.
    #[serde(default)]
    pub password: Option<String>,
    /// Token endpoint identifier.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_token_url() -> String {
    "token".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Where the loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file at the resolved path; built-in defaults are in effect.
    Defaults,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("secrets file parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TrackerConfig {
    /// Parse configuration from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration from a TOML file and apply its secrets file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = read(path)?;
        let mut config = Self::from_toml(&content)?;

        if let Some(secrets_file) = config.secrets_file.clone() {
            let secrets_path = if secrets_file.is_absolute() {
                secrets_file
            } else {
                path.parent()
                    .map(|p| p.join(&secrets_file))
                    .unwrap_or(secrets_file)
            };
            let secrets = Secrets::from_file(&secrets_path)?;
            config.apply_secrets(secrets);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    /// Does not log; the caller reports the returned [`ConfigSource`].
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<(Self, ConfigSource), ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Ok((Self::from_file(path)?, ConfigSource::File(path.to_path_buf())))
        } else {
            Ok((Self::default(), ConfigSource::Defaults))
        }
    }

    /// Resolve the config path: the explicit argument (a CLI flag, which
    /// also reads `TASKTRACK_CONFIG`), else `tasktrack.toml`.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn apply_secrets(&mut self, secrets: Secrets) {
        if let Some(password) = secrets.password {
            self.database.password = Some(password);
        }
        if let Some(token) = secrets.token {
            self.auth.token_url = token;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind.trim().is_empty() {
            return Err(ConfigError::Config("server.bind must not be empty".to_string()));
        }
        if self.database.pool.max_connections == 0 {
            return Err(ConfigError::Config(
                "database.pool.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Secrets {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = read(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
