//! Storage root and runtime settings.
//!
//! # Responsibility
//! - Resolve where the gradebook database and logs live.
//! - Open the migrated database for a given root.
//!
//! # Invariants
//! - All persisted state lives under `root`; nothing is process-global.
//! - `root` is never empty.

use crate::db::{open_db, DbError};
use crate::logging::default_log_level;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DB_FILE_NAME: &str = "gradebook.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    EmptyRoot,
    Io { path: PathBuf, source: std::io::Error },
    Db(DbError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRoot => write!(f, "storage root cannot be empty"),
            Self::Io { path, source } => {
                write!(f, "cannot prepare storage root `{}`: {source}", path.display())
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyRoot => None,
            Self::Io { source, .. } => Some(source),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for ConfigError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Runtime settings for one gradebook instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradebookConfig {
    root: PathBuf,
    log_level: String,
}

impl GradebookConfig {
    /// Builds a config rooted at `root` with the build-mode default log level.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(ConfigError::EmptyRoot);
        }
        Ok(Self {
            root,
            log_level: default_log_level().to_string(),
        })
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join(LOG_DIR_NAME)
    }

    /// Creates the storage root if it does not exist yet.
    pub fn prepare(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.root).map_err(|source| ConfigError::Io {
            path: self.root.clone(),
            source,
        })
    }

    /// Prepares the root and opens the migrated gradebook database.
    pub fn open_db(&self) -> Result<Connection, ConfigError> {
        self.prepare()?;
        Ok(open_db(self.db_path())?)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, GradebookConfig};

    #[test]
    fn paths_are_derived_from_root() {
        let config = GradebookConfig::new("/srv/grades").unwrap();
        assert!(config.db_path().ends_with("gradebook.sqlite3"));
        assert!(config.db_path().starts_with("/srv/grades"));
        assert!(config.log_dir().ends_with("logs"));
    }

    #[test]
    fn empty_root_is_rejected() {
        assert!(matches!(
            GradebookConfig::new(""),
            Err(ConfigError::EmptyRoot)
        ));
    }

    #[test]
    fn open_db_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = GradebookConfig::new(dir.path().join("nested/root"))
            .unwrap()
            .with_log_level("warn");

        let conn = config.open_db().unwrap();
        drop(conn);
        assert!(config.db_path().exists());
        assert_eq!(config.log_level(), "warn");
    }
}
