//! Gradebook database bootstrap.
//!
//! `open_db` / `open_db_in_memory` hand out connections with foreign keys on
//! and every migration in `migrations` applied; repositories refuse any other
//! connection (see `repo::schema`).

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open, migrate or query the gradebook database.
#[derive(Debug)]
pub enum DbError {
    /// The database file (or memory db) could not be opened at all.
    Open {
        location: String,
        source: rusqlite::Error,
    },
    /// The file carries a schema written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => {
                write!(f, "cannot open gradebook database `{location}`: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "gradebook file uses schema v{db_version}; this build reads up to v{latest_supported}"
            ),
            Self::Sqlite(source) => write!(f, "sqlite: {source}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Sqlite(source) => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
