//! Import/export of the flat JSON file layout.
//!
//! Layout: `subjects.json` holds a JSON array of subject names; each subject
//! has a `<subject>.json` object mapping assignment names to grades.
//!
//! # Invariants
//! - A missing `subjects.json` means nothing to import; a missing subject
//!   document means an empty grade store.
//! - Every document is parsed and every subject name checked before the
//!   first write, so bad input fails without touching the database or the
//!   export directory.
//! - An import is one transaction: it lands completely or not at all.
//! - Subject documents never resolve outside the target directory.

use crate::model::grade::GradeBook;
use crate::model::validation::validate_subject_name;
use crate::repo::grade_repo::{replace_grades_in, GradeRepository, SqliteGradeRepository};
use crate::repo::schema::{ensure_tables, GRADES_TABLE, GRADE_STORES_TABLE, SUBJECTS_TABLE};
use crate::repo::subject_repo::{register_subject_in, SqliteSubjectRepository, SubjectRepository};
use crate::repo::RepoError;
use log::{info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Registry document file name.
pub const SUBJECTS_FILE: &str = "subjects.json";

const DOCUMENT_EXTENSION: &str = ".json";

#[derive(Debug)]
pub enum LegacyImportError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The subject name cannot be mapped to a document inside the directory.
    UnsafeSubjectName(String),
    Repo(RepoError),
}

impl Display for LegacyImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot access `{}`: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "malformed document `{}`: {source}", path.display())
            }
            Self::UnsafeSubjectName(name) => {
                write!(f, "subject `{name}` cannot be stored as a document file name")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LegacyImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::UnsafeSubjectName(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for LegacyImportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for LegacyImportError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyImportReport {
    pub subjects_seen: usize,
    pub subjects_created: usize,
    pub grades_imported: usize,
}

/// Imports a legacy directory into the registry and grade stores.
///
/// Subjects already registered keep their position; their grade store is
/// replaced by the imported document. Nothing is written unless every
/// subject imports.
pub fn import_legacy_dir(
    dir: impl AsRef<Path>,
    conn: &Connection,
) -> Result<LegacyImportReport, LegacyImportError> {
    let dir = dir.as_ref();
    ensure_tables(conn, &[SUBJECTS_TABLE, GRADE_STORES_TABLE, GRADES_TABLE])?;

    let names: Vec<String> = read_document(&dir.join(SUBJECTS_FILE))?.unwrap_or_default();
    let mut documents = Vec::with_capacity(names.len());
    for name in names {
        validate_subject_name(&name).map_err(RepoError::from)?;
        let path = dir.join(subject_file_name(&name)?);
        let book: GradeBook = read_document(&path)?.unwrap_or_default();
        book.validate().map_err(RepoError::from)?;
        documents.push((name, book));
    }

    let mut report = LegacyImportReport {
        subjects_seen: documents.len(),
        ..LegacyImportReport::default()
    };
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    for (name, book) in &documents {
        if register_subject_in(&tx, name)?.is_created() {
            report.subjects_created += 1;
        }
        replace_grades_in(&tx, name, book)?;
        report.grades_imported += book.len();
    }
    tx.commit()?;

    info!(
        "event=legacy_import module=legacy status=ok subjects_seen={} subjects_created={} grades_imported={}",
        report.subjects_seen, report.subjects_created, report.grades_imported
    );
    Ok(report)
}

/// Writes every subject and its grades in the legacy layout.
///
/// Existing files with the same names are overwritten. Returns the number of
/// subject documents written.
pub fn export_legacy_dir(
    dir: impl AsRef<Path>,
    conn: &Connection,
) -> Result<usize, LegacyImportError> {
    let dir = dir.as_ref();
    let subjects = SqliteSubjectRepository::try_new(conn)?;
    let grades = SqliteGradeRepository::try_new(conn)?;

    let names = subjects.list_subjects()?;
    let mut documents = Vec::with_capacity(names.len());
    for name in &names {
        let file_name = subject_file_name(name).inspect_err(|_| {
            warn!("event=legacy_export module=legacy status=error error_code=unsafe_subject_name");
        })?;
        documents.push((file_name, grades.load_grades(name)?));
    }

    std::fs::create_dir_all(dir).map_err(|source| LegacyImportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for (file_name, book) in &documents {
        write_document(&dir.join(file_name), book)?;
    }
    write_document(&dir.join(SUBJECTS_FILE), &names)?;

    info!(
        "event=legacy_export module=legacy status=ok subjects={}",
        names.len()
    );
    Ok(names.len())
}

/// Maps a subject to its document file name, refusing names that would
/// leave the directory or shadow the registry document.
fn subject_file_name(subject: &str) -> Result<String, LegacyImportError> {
    let unsafe_name = || LegacyImportError::UnsafeSubjectName(subject.to_string());
    if subject.contains(['/', '\\', '\0']) || matches!(subject, "." | "..") {
        return Err(unsafe_name());
    }

    let file_name = format!("{subject}{DOCUMENT_EXTENSION}");
    if file_name == SUBJECTS_FILE {
        return Err(unsafe_name());
    }
    let mut components = Path::new(&file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(file_name),
        _ => Err(unsafe_name()),
    }
}

fn read_document<T>(path: &Path) -> Result<Option<T>, LegacyImportError>
where
    T: serde::de::DeserializeOwned,
{
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(LegacyImportError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| LegacyImportError::Json {
            path: path.to_path_buf(),
            source,
        })
}

fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<(), LegacyImportError> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .map_err(|source| LegacyImportError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    std::fs::write(path, buffer).map_err(|source| LegacyImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
