use directories::ProjectDirs;
use log::{debug, LevelFilter};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path, path::PathBuf};
use thiserror::Error;

use crate::connections::backend::DEFAULT_BAUD_RATE;
use crate::connections::device::DEFAULT_NETWORK_PORT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to locate config dir")]
    NoConfigDir,
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

/// Settings read at startup.
///
/// JSON looks like `{ "serial_baud": 115200, "default_network_port": 4403, "log_level": "info" }`;
/// every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub serial_baud: u32,
    pub default_network_port: u16,
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            serial_baud: DEFAULT_BAUD_RATE,
            default_network_port: DEFAULT_NETWORK_PORT,
            log_level: "info".to_owned(),
        }
    }
}

impl DashboardConfig {
    /// `~/.config/meshdash` on Linux, `%APPDATA%\meshdash` on Windows, etc.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("", "", "meshdash")
            .map(|proj| proj.config_dir().to_path_buf())
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load `path`, falling back to defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No config at {:?}; using defaults", path);
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn log_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }
}
