//! Connection readiness checks shared by SQLite repositories.

use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;

pub(crate) struct RequiredTable {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

pub(crate) const SUBJECTS_TABLE: RequiredTable = RequiredTable {
    name: "subjects",
    columns: &["name", "position"],
};

pub(crate) const GRADE_STORES_TABLE: RequiredTable = RequiredTable {
    name: "grade_stores",
    columns: &["subject"],
};

pub(crate) const GRADES_TABLE: RequiredTable = RequiredTable {
    name: "grades",
    columns: &["subject", "assignment", "grade", "position"],
};

/// Fails fast when a connection was not opened through `db::open_db*`.
pub(crate) fn ensure_tables(conn: &Connection, tables: &[RequiredTable]) -> RepoResult<()> {
    for table in tables {
        if !table_exists(conn, table.name)? {
            return Err(RepoError::MissingRequiredTable(table.name));
        }
        for &column in table.columns {
            if !table_has_column(conn, table.name, column)? {
                return Err(RepoError::MissingRequiredColumn {
                    table: table.name,
                    column,
                });
            }
        }
    }
    Ok(())
}

/// Returns whether `subject` currently owns a grade store.
pub(crate) fn store_exists(conn: &Connection, subject: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM grade_stores WHERE subject = ?1);",
        [subject],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
