//! Database configuration file.
//!
//! The file is TOML with dotted keys:
//!
//! ```toml
//! database.url = "db/db.db"
//! database.logURL = "logs"
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_FILE: &str = "config/database.toml";

/// Default connection string
pub const DEFAULT_CONNECTION_STRING: &str = "db/db.db";

/// Default log directory
pub const DEFAULT_LOG_DIRECTORY: &str = "logs";

/// Settings the executor and logging need at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Store connection string (path or `sqlite:`/`jdbc:sqlite:` URL)
    pub connection_string: String,
    /// Directory receiving log files
    pub log_directory: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connection_string: DEFAULT_CONNECTION_STRING.to_string(),
            log_directory: PathBuf::from(DEFAULT_LOG_DIRECTORY),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    database: DatabaseSection,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
    url: Option<String>,
    #[serde(rename = "logURL", alias = "log_url")]
    log_url: Option<String>,
}

impl Config {
    /// Reads configuration from a file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::parse(&text)
    }

    /// Parses configuration text.
    pub fn parse(text: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        let defaults = Config::default();
        Ok(Config {
            connection_string: file
                .database
                .url
                .unwrap_or(defaults.connection_string),
            log_directory: file
                .database
                .log_url
                .map(PathBuf::from)
                .unwrap_or(defaults.log_directory),
        })
    }

    /// Set the connection string
    pub fn with_connection_string<S: Into<String>>(mut self, connection_string: S) -> Self {
        self.connection_string = connection_string.into();
        self
    }

    /// Set the log directory
    pub fn with_log_directory<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.log_directory = dir.into();
        self
    }
}
