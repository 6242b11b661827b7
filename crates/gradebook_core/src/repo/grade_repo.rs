//! Per-subject grade store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Read and replace one subject's assignment -> grade mapping.
//! - Upsert single grades without rewriting the whole mapping.
//!
//! # Invariants
//! - Stores are never created implicitly: writes to an unregistered subject
//!   fail with `RepoError::SubjectNotFound`.
//! - Reading an unknown subject yields an empty `GradeBook`, not an error.
//! - A non-numeric persisted grade fails the whole read.

use crate::model::grade::GradeBook;
use crate::model::validation::{validate_assignment_name, validate_grade};
use crate::repo::schema::{ensure_tables, store_exists, GRADES_TABLE, GRADE_STORES_TABLE};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

/// Repository interface for per-subject grade stores.
pub trait GradeRepository {
    /// Loads the mapping for `subject` in first-insertion order.
    fn load_grades(&self, subject: &str) -> RepoResult<GradeBook>;
    /// Replaces the whole mapping for `subject` with `book`.
    fn save_grades(&self, subject: &str, book: &GradeBook) -> RepoResult<()>;
    /// Sets one grade, keeping the assignment's position if it already exists.
    fn upsert_grade(&self, subject: &str, assignment: &str, grade: f64) -> RepoResult<()>;
}

/// SQLite-backed grade store.
pub struct SqliteGradeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGradeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &[GRADE_STORES_TABLE, GRADES_TABLE])?;
        Ok(Self { conn })
    }
}

impl GradeRepository for SqliteGradeRepository<'_> {
    fn load_grades(&self, subject: &str) -> RepoResult<GradeBook> {
        let mut stmt = self.conn.prepare(
            "SELECT assignment, grade
             FROM grades
             WHERE subject = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([subject])?;
        let mut book = GradeBook::new();
        while let Some(row) = rows.next()? {
            let assignment: String = row.get("assignment")?;
            let grade = parse_grade(row, &assignment)?;
            book.set(assignment, grade);
        }
        Ok(book)
    }

    fn save_grades(&self, subject: &str, book: &GradeBook) -> RepoResult<()> {
        book.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        replace_grades_in(&tx, subject, book)?;
        tx.commit()?;

        Ok(())
    }

    fn upsert_grade(&self, subject: &str, assignment: &str, grade: f64) -> RepoResult<()> {
        validate_assignment_name(assignment)?;
        validate_grade(grade)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_store(&tx, subject)?;

        tx.execute(
            "INSERT INTO grades (subject, assignment, grade, position)
             VALUES (
                ?1,
                ?2,
                ?3,
                (SELECT COALESCE(MAX(position), 0) + 1 FROM grades WHERE subject = ?1)
             )
             ON CONFLICT(subject, assignment) DO UPDATE SET
                grade = excluded.grade,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![subject, assignment, grade],
        )?;
        tx.commit()?;

        Ok(())
    }
}

/// Replaces `subject`'s grades on a connection whose transaction the caller
/// owns. `book` must already be validated.
pub(crate) fn replace_grades_in(
    conn: &Connection,
    subject: &str,
    book: &GradeBook,
) -> RepoResult<()> {
    ensure_store(conn, subject)?;

    conn.execute("DELETE FROM grades WHERE subject = ?1;", [subject])?;
    let mut insert = conn.prepare(
        "INSERT INTO grades (subject, assignment, grade, position)
         VALUES (?1, ?2, ?3, ?4);",
    )?;
    for (index, entry) in book.iter().enumerate() {
        let position = i64::try_from(index + 1).map_err(|_| {
            RepoError::InvalidData(format!("grade position {index} overflows i64"))
        })?;
        insert.execute(params![
            subject,
            entry.assignment.as_str(),
            entry.grade,
            position
        ])?;
    }
    Ok(())
}

fn ensure_store(conn: &Connection, subject: &str) -> RepoResult<()> {
    if !store_exists(conn, subject)? {
        return Err(RepoError::SubjectNotFound(subject.to_string()));
    }
    Ok(())
}

fn parse_grade(row: &Row<'_>, assignment: &str) -> RepoResult<f64> {
    match row.get_ref("grade")? {
        ValueRef::Real(value) => Ok(value),
        // SQLite stores integral REAL values as INTEGER under some affinities.
        ValueRef::Integer(value) => Ok(value as f64),
        ValueRef::Null => Err(RepoError::InvalidData(format!(
            "missing grade for assignment `{assignment}` in grades.grade"
        ))),
        ValueRef::Text(_) | ValueRef::Blob(_) => Err(RepoError::InvalidData(format!(
            "non-numeric grade for assignment `{assignment}` in grades.grade"
        ))),
    }
}
