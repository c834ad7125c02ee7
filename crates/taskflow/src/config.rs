//! Client configuration.
//!
//! Loaded from a JSON file or from environment variables. Durations are
//! written as whole milliseconds:
//!
//! ```json
//! {
//!   "directory": { "base_url": "https://xyz.supabase.co", "anon_key": "..." },
//!   "session": { "inactivity_timeout": 3600000 },
//!   "store_path": "/home/me/.taskflow/session.json"
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use taskflow_directory::RestDirectoryConfig;
use taskflow_session::SessionConfig;

use crate::TaskflowError;

/// Environment variable holding the directory base URL.
pub const ENV_URL: &str = "TASKFLOW_SUPABASE_URL";
/// Environment variable holding the anon key.
pub const ENV_KEY: &str = "TASKFLOW_SUPABASE_KEY";
/// Environment variable overriding the session file location.
pub const ENV_STORE_PATH: &str = "TASKFLOW_STORE_PATH";

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskflowConfig {
    pub directory: DirectorySettings,
    pub session: SessionSettings,
    /// File backing the persisted session.
    pub store_path: PathBuf,
}

impl Default for TaskflowConfig {
    fn default() -> Self {
        Self {
            directory: DirectorySettings::default(),
            session: SessionSettings::default(),
            store_path: PathBuf::from("taskflow-session.json"),
        }
    }
}

/// Where the member table lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorySettings {
    pub base_url: String,
    pub anon_key: String,
    pub table: String,
    #[serde(with = "duration_ms")]
    pub timeout: Duration,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        let rest = RestDirectoryConfig::default();
        Self {
            base_url: rest.base_url,
            anon_key: rest.anon_key,
            table: rest.table,
            timeout: rest.timeout,
        }
    }
}

impl From<&DirectorySettings> for RestDirectoryConfig {
    fn from(s: &DirectorySettings) -> Self {
        Self {
            base_url: s.base_url.clone(),
            anon_key: s.anon_key.clone(),
            table: s.table.clone(),
            timeout: s.timeout,
        }
    }
}

/// Session timing, mirrored from [`SessionConfig`] with millisecond serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    #[serde(with = "duration_ms")]
    pub inactivity_timeout: Duration,
    #[serde(with = "duration_ms")]
    pub activity_write_interval: Duration,
    #[serde(with = "duration_ms")]
    pub poll_interval: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionConfig::default().into()
    }
}

impl From<SessionConfig> for SessionSettings {
    fn from(c: SessionConfig) -> Self {
        Self {
            inactivity_timeout: c.inactivity_timeout,
            activity_write_interval: c.activity_write_interval,
            poll_interval: c.poll_interval,
        }
    }
}

impl From<&SessionSettings> for SessionConfig {
    fn from(s: &SessionSettings) -> Self {
        Self {
            inactivity_timeout: s.inactivity_timeout,
            activity_write_interval: s.activity_write_interval,
            poll_interval: s.poll_interval,
        }
        .validated()
    }
}

impl TaskflowConfig {
    /// Loads config from a JSON file. Missing fields take their defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, TaskflowError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| {
            TaskflowError::ConfigIo {
                path: path.to_path_buf(),
                source,
            }
        })?;
        serde_json::from_str(&contents).map_err(|source| TaskflowError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes config as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), TaskflowError> {
        let path = path.as_ref();
        let io_err = |source: std::io::Error| TaskflowError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| {
            TaskflowError::ConfigParse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        std::fs::write(path, json).map_err(io_err)
    }

    /// Builds config from the process environment.
    ///
    /// # Errors
    /// [`TaskflowError::Config`] if the URL or key variable is unset or empty.
    pub fn from_env() -> Result<Self, TaskflowError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds config from any variable source. `from_env` reads the
    /// process environment through this.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, TaskflowError> {
        let required = |name: &str| {
            var(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| TaskflowError::Config(format!("{name} is not set")))
        };

        let mut config = Self::default();
        config.directory.base_url = required(ENV_URL)?;
        config.directory.anon_key = required(ENV_KEY)?;
        if let Some(path) = var(ENV_STORE_PATH).filter(|p| !p.is_empty()) {
            config.store_path = PathBuf::from(path);
        }
        Ok(config)
    }

    /// Session timing, with zero intervals replaced by defaults.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::from(&self.session)
    }

    /// Connection settings for the REST directory.
    pub fn rest_config(&self) -> RestDirectoryConfig {
        RestDirectoryConfig::from(&self.directory)
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
