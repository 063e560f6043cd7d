//! Runtime configuration for opening a tracker.
//!
//! Front ends fill `TrackerConfig` from flags/environment; the core only
//! derives file locations from it and picks the storage backend.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// File name of the host slot database inside the data directory.
pub const DB_FILE_NAME: &str = "job_tracker.sqlite3";
/// Subdirectory of the data directory holding rolling logs.
pub const LOG_DIR_NAME: &str = "logs";

/// Manifest-style string for automatic backend selection.
pub const BACKEND_AUTO: &str = "auto";
/// Manifest-style string for the SQLite slot backend.
pub const BACKEND_HOST_SLOT: &str = "host";
/// Manifest-style string for the JSON file backend.
pub const BACKEND_LOCAL_FILE: &str = "file";

/// Which storage backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendPreference {
    /// Probe the host slot store, fall back to the local file store.
    #[default]
    Auto,
    HostSlot,
    LocalFile,
}

impl BackendPreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => BACKEND_AUTO,
            Self::HostSlot => BACKEND_HOST_SLOT,
            Self::LocalFile => BACKEND_LOCAL_FILE,
        }
    }
}

/// Parses a backend preference; surrounding whitespace is ignored.
pub fn parse_backend_preference(value: &str) -> Result<BackendPreference, ConfigError> {
    match value.trim() {
        "" => Err(ConfigError::EmptyBackend),
        BACKEND_AUTO => Ok(BackendPreference::Auto),
        BACKEND_HOST_SLOT => Ok(BackendPreference::HostSlot),
        BACKEND_LOCAL_FILE => Ok(BackendPreference::LocalFile),
        other => Err(ConfigError::UnsupportedBackend(other.to_string())),
    }
}

/// Configuration parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyBackend,
    UnsupportedBackend(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBackend => write!(f, "storage backend value must not be empty"),
            Self::UnsupportedBackend(value) => write!(
                f,
                "storage backend is unsupported: {value} (expected auto|host|file)"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Where and how a tracker persists its collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub backend: BackendPreference,
}

impl TrackerConfig {
    /// Config with automatic backend selection and the build's default level.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_level: default_log_level().to_string(),
            backend: BackendPreference::Auto,
        }
    }

    pub fn with_backend(mut self, backend: BackendPreference) -> Self {
        self.backend = backend;
        self
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_backend_preference, BackendPreference, ConfigError, TrackerConfig};

    #[test]
    fn parses_all_backend_preferences() {
        assert_eq!(
            parse_backend_preference("auto").unwrap(),
            BackendPreference::Auto
        );
        assert_eq!(
            parse_backend_preference(" host ").unwrap(),
            BackendPreference::HostSlot
        );
        assert_eq!(
            parse_backend_preference("file").unwrap(),
            BackendPreference::LocalFile
        );
    }

    #[test]
    fn rejects_empty_and_unknown_backends() {
        assert_eq!(
            parse_backend_preference("  ").unwrap_err(),
            ConfigError::EmptyBackend
        );
        assert_eq!(
            parse_backend_preference("chrome").unwrap_err(),
            ConfigError::UnsupportedBackend("chrome".to_string())
        );
    }

    #[test]
    fn derives_paths_from_data_dir() {
        let config = TrackerConfig::new("/tmp/jobs");
        assert_eq!(config.db_path().to_str(), Some("/tmp/jobs/job_tracker.sqlite3"));
        assert_eq!(config.log_dir().to_str(), Some("/tmp/jobs/logs"));
        assert_eq!(config.backend, BackendPreference::Auto);
    }
}
