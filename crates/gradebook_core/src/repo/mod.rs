//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the registry and
//!   per-subject grade stores.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths validate input before any SQL mutation.
//! - Multi-statement writes run inside one immediate transaction.
//! - Read paths reject malformed persisted data instead of masking it.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod grade_repo;
pub(crate) mod schema;
pub mod subject_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for registry and grade store operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// Write targeted a subject that has no registry entry / grade store.
    SubjectNotFound(String),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::SubjectNotFound(name) => write!(f, "subject not registered: `{name}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted grade data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
