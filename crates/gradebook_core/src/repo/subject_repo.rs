//! Subject registry contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the ordered list of subject names.
//! - Create each subject's empty grade store together with its registry entry.
//! - Own the global clear, the only deletion path in the system.
//!
//! # Invariants
//! - Registry entry and grade store are created in one transaction; a failure
//!   leaves neither behind.
//! - `list_subjects` returns names in first-registration order.
//! - `clear_all` removes stores before the registry, in one transaction.

use crate::model::subject::{ClearSummary, SubjectRegistration};
use crate::model::validation::validate_subject_name;
use crate::repo::schema::{ensure_tables, GRADE_STORES_TABLE, SUBJECTS_TABLE};
use crate::repo::RepoResult;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Repository interface for the subject registry.
pub trait SubjectRepository {
    /// Lists registered subject names in insertion order.
    fn list_subjects(&self) -> RepoResult<Vec<String>>;
    /// Returns whether `name` is registered (exact, case-sensitive match).
    fn contains_subject(&self, name: &str) -> RepoResult<bool>;
    /// Registers `name` and creates its empty grade store.
    fn register_subject(&self, name: &str) -> RepoResult<SubjectRegistration>;
    /// Removes every grade store and then the whole registry.
    fn clear_all(&self) -> RepoResult<ClearSummary>;
}

/// SQLite-backed subject registry.
pub struct SqliteSubjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSubjectRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &[SUBJECTS_TABLE, GRADE_STORES_TABLE])?;
        Ok(Self { conn })
    }
}

impl SubjectRepository for SqliteSubjectRepository<'_> {
    fn list_subjects(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM subjects ORDER BY position ASC;")?;
        let mut rows = stmt.query([])?;
        let mut subjects = Vec::new();
        while let Some(row) = rows.next()? {
            subjects.push(row.get("name")?);
        }
        Ok(subjects)
    }

    fn contains_subject(&self, name: &str) -> RepoResult<bool> {
        subject_exists(self.conn, name)
    }

    fn register_subject(&self, name: &str) -> RepoResult<SubjectRegistration> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let registration = register_subject_in(&tx, name)?;
        tx.commit()?;
        Ok(registration)
    }

    fn clear_all(&self) -> RepoResult<ClearSummary> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let grades_removed = tx.execute("DELETE FROM grades;", [])?;
        tx.execute("DELETE FROM grade_stores;", [])?;
        let subjects_removed = tx.execute("DELETE FROM subjects;", [])?;
        tx.commit()?;

        Ok(ClearSummary {
            subjects_removed,
            grades_removed,
        })
    }
}

/// Registers `name` on a connection whose transaction the caller owns.
pub(crate) fn register_subject_in(
    conn: &Connection,
    name: &str,
) -> RepoResult<SubjectRegistration> {
    validate_subject_name(name)?;
    if subject_exists(conn, name)? {
        return Ok(SubjectRegistration::AlreadyRegistered);
    }

    conn.execute(
        "INSERT INTO subjects (name, position)
         SELECT ?1, COALESCE(MAX(position), 0) + 1
         FROM subjects;",
        [name],
    )?;
    conn.execute("INSERT INTO grade_stores (subject) VALUES (?1);", [name])?;
    Ok(SubjectRegistration::Created)
}

fn subject_exists(conn: &Connection, name: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM subjects WHERE name = ?1);",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
