use gradebook_core::db::{open_db, open_db_in_memory};
use gradebook_core::{
    GradeBook, GradeService, RepoError, SqliteGradeRepository, SqliteSubjectRepository,
    SubjectRepository, ValidationError,
};
use rusqlite::Connection;

fn register(conn: &Connection, names: &[&str]) {
    let subjects = SqliteSubjectRepository::try_new(conn).unwrap();
    for name in names {
        subjects.register_subject(name).unwrap();
    }
}

#[test]
fn unknown_subject_loads_as_empty_mapping() {
    let conn = open_db_in_memory().unwrap();
    let service = GradeService::new(SqliteGradeRepository::try_new(&conn).unwrap());

    assert!(service.load_grades("Nowhere").unwrap().is_empty());
}

#[test]
fn re_adding_an_assignment_overwrites_instead_of_accumulating() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, &["Math"]);
    let service = GradeService::new(SqliteGradeRepository::try_new(&conn).unwrap());

    service.add_grade("Math", "Quiz1", 90.0).unwrap();
    service.add_grade("Math", "Quiz1", 95.0).unwrap();

    let book = service.load_grades("Math").unwrap();
    assert_eq!(book.len(), 1);
    assert_eq!(book.get("Quiz1"), Some(95.0));
}

#[test]
fn overwritten_assignment_keeps_its_position() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, &["Math"]);
    let service = GradeService::new(SqliteGradeRepository::try_new(&conn).unwrap());

    service.add_grade("Math", "HW1", 70.0).unwrap();
    service.add_grade("Math", "HW2", 80.0).unwrap();
    service.add_grade("Math", "HW1", 75.0).unwrap();

    let expected: GradeBook = [("HW1", 75.0), ("HW2", 80.0)].into_iter().collect();
    assert_eq!(service.load_grades("Math").unwrap(), expected);
}

#[test]
fn grades_are_isolated_per_subject() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, &["Math", "Art"]);
    let service = GradeService::new(SqliteGradeRepository::try_new(&conn).unwrap());

    service.add_grade("Math", "HW1", 80.0).unwrap();
    service.add_grade("Art", "HW1", 60.0).unwrap();

    assert_eq!(service.load_grades("Math").unwrap().get("HW1"), Some(80.0));
    assert_eq!(service.load_grades("Art").unwrap().get("HW1"), Some(60.0));
}

#[test]
fn save_then_load_round_trips_the_mapping() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, &["Physics"]);
    let service = GradeService::new(SqliteGradeRepository::try_new(&conn).unwrap());

    let book: GradeBook = [("Lab 2", 91.25), ("Lab 1", -4.0), ("Final", 0.1)]
        .into_iter()
        .collect();
    service.save_grades("Physics", &book).unwrap();

    assert_eq!(service.load_grades("Physics").unwrap(), book);
}

#[test]
fn save_replaces_the_whole_mapping() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, &["Physics"]);
    let service = GradeService::new(SqliteGradeRepository::try_new(&conn).unwrap());

    service.add_grade("Physics", "Old", 50.0).unwrap();
    let replacement: GradeBook = [("New", 99.0)].into_iter().collect();
    service.save_grades("Physics", &replacement).unwrap();

    let loaded = service.load_grades("Physics").unwrap();
    assert_eq!(loaded, replacement);
    assert_eq!(loaded.get("Old"), None);

    service.save_grades("Physics", &GradeBook::new()).unwrap();
    assert!(service.load_grades("Physics").unwrap().is_empty());
}

#[test]
fn writes_to_unregistered_subject_do_not_create_a_store() {
    let conn = open_db_in_memory().unwrap();
    let service = GradeService::new(SqliteGradeRepository::try_new(&conn).unwrap());

    let err = service.add_grade("Ghost", "HW1", 50.0).unwrap_err();
    assert!(matches!(err, RepoError::SubjectNotFound(ref name) if name == "Ghost"));

    let book: GradeBook = [("HW1", 50.0)].into_iter().collect();
    let err = service.save_grades("Ghost", &book).unwrap_err();
    assert!(matches!(err, RepoError::SubjectNotFound(_)));

    let subjects = SqliteSubjectRepository::try_new(&conn).unwrap();
    assert!(subjects.list_subjects().unwrap().is_empty());
}

#[test]
fn invalid_grade_input_is_rejected_before_writing() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, &["Math"]);
    let service = GradeService::new(SqliteGradeRepository::try_new(&conn).unwrap());

    let err = service.add_grade("Math", " ", 50.0).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyAssignmentName)
    ));

    let err = service.add_grade("Math", "HW1", f64::NAN).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::NonFiniteGrade(_))
    ));

    let mut book = GradeBook::new();
    book.set("HW1", 80.0);
    book.set("", 90.0);
    assert!(service.save_grades("Math", &book).is_err());
    assert!(service.load_grades("Math").unwrap().is_empty());
}

#[test]
fn non_numeric_persisted_grade_fails_the_read() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, &["Math"]);
    conn.execute(
        "INSERT INTO grades (subject, assignment, grade, position)
         VALUES ('Math', 'HW1', 'not a number', 1);",
        [],
    )
    .unwrap();
    let service = GradeService::new(SqliteGradeRepository::try_new(&conn).unwrap());

    let err = service.load_grades("Math").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
    assert!(service.get_stats("Math").is_err());
}

#[test]
fn grades_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gradebook.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        register(&conn, &["Math"]);
        let service = GradeService::new(SqliteGradeRepository::try_new(&conn).unwrap());
        service.add_grade("Math", "HW1", 80.0).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let service = GradeService::new(SqliteGradeRepository::try_new(&conn).unwrap());
    assert_eq!(service.load_grades("Math").unwrap().get("HW1"), Some(80.0));
}
