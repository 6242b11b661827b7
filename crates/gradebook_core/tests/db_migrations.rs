use gradebook_core::db::migrations::{latest_version, schema_version};
use gradebook_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "subjects");
    assert_table_exists(&conn, "grade_stores");
    assert_table_exists(&conn, "grades");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gradebook.sqlite3");

    let first = open_db(&path).unwrap();
    assert_eq!(schema_version(&first).unwrap(), latest_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second).unwrap(), latest_version());
    assert_table_exists(&second, "grades");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_failure_reports_the_database_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("gradebook.sqlite3");

    match open_db(&path).unwrap_err() {
        DbError::Open { location, .. } => {
            assert_eq!(location, path.display().to_string());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!path.exists());
}

#[test]
fn foreign_keys_are_enforced() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO grades (subject, assignment, grade, position) VALUES ('Ghost', 'HW1', 1.0, 1);",
        [],
    );
    assert!(result.is_err());
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
