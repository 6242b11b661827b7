//! Command-line front end for the gradebook core.
//!
//! # Responsibility
//! - Collect subject/assignment/grade input and validate it before calling core.
//! - Print core results verbatim; no business rules live here.

use clap::{Parser, Subcommand};
use gradebook_core::{
    core_version, export_legacy_dir, format_grade, import_legacy_dir, init_logging_from_config,
    GradeService, GradebookConfig, SqliteGradeRepository, SqliteSubjectRepository,
    SubjectRegistration, SubjectService,
};
use log::warn;
use rusqlite::Connection;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "gradebook", version, about = "Track assignment grades per subject")]
struct Cli {
    /// Directory holding the gradebook database and logs
    #[arg(long, env = "GRADEBOOK_HOME", value_name = "DIR", default_value = ".")]
    home: PathBuf,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, env = "GRADEBOOK_LOG_LEVEL", value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// List registered subjects in registration order
    Subjects,

    /// Register a subject
    AddSubject { name: String },

    /// Set one assignment grade and print the updated stats
    AddGrade {
        subject: String,
        #[arg(value_parser = parse_assignment)]
        assignment: String,
        #[arg(allow_negative_numbers = true, value_parser = parse_grade)]
        grade: f64,
    },

    /// List a subject's assignment grades
    Grades { subject: String },

    /// Print a subject's stats report
    Stats { subject: String },

    /// Delete every subject and grade
    Clear {
        /// Confirm the deletion; it cannot be undone
        #[arg(long)]
        yes: bool,
    },

    /// Import a directory of subjects.json + <subject>.json files
    Import { dir: PathBuf },

    /// Export to a directory of subjects.json + <subject>.json files
    Export { dir: PathBuf },

    /// Print the core library version
    Version,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if cli.command == Command::Version {
        println!("gradebook_core version={}", core_version());
        return Ok(());
    }

    let mut config = GradebookConfig::new(cli.home).map_err(|err| err.to_string())?;
    if let Some(level) = cli.log_level {
        config = config.with_log_level(level);
    }
    if let Err(err) = init_logging_from_config(&config) {
        // Logging is diagnostics only; commands still run without it.
        eprintln!("warning: logging disabled: {err}");
    }
    let conn = config.open_db().map_err(|err| err.to_string())?;

    dispatch(&conn, cli.command)
}

fn dispatch(conn: &Connection, command: Command) -> Result<(), String> {
    let subject_repo = SqliteSubjectRepository::try_new(conn).map_err(|err| err.to_string())?;
    let grade_repo = SqliteGradeRepository::try_new(conn).map_err(|err| err.to_string())?;

    match command {
        Command::Subjects => {
            let service = SubjectService::new(subject_repo);
            for name in service.list_subjects().map_err(|err| err.to_string())? {
                println!("{name}");
            }
        }
        Command::AddSubject { name } => {
            let service = SubjectService::new(subject_repo);
            match service.add_subject(&name).map_err(|err| err.to_string())? {
                SubjectRegistration::Created => println!("added subject {name}"),
                SubjectRegistration::AlreadyRegistered => {
                    println!("subject {name} already exists")
                }
            }
        }
        Command::AddGrade {
            subject,
            assignment,
            grade,
        } => {
            let service = GradeService::new(grade_repo);
            service
                .add_grade(&subject, &assignment, grade)
                .map_err(|err| err.to_string())?;
            println!("{}", service.get_stats(&subject).map_err(|err| err.to_string())?);
        }
        Command::Grades { subject } => {
            let service = GradeService::new(grade_repo);
            for entry in &service.load_grades(&subject).map_err(|err| err.to_string())? {
                println!("{}\t{}", entry.assignment, format_grade(entry.grade));
            }
        }
        Command::Stats { subject } => {
            let service = GradeService::new(grade_repo);
            let report = service.get_stats(&subject).map_err(|err| err.to_string())?;
            print!("{report}");
            if !report.ends_with('\n') {
                println!();
            }
        }
        Command::Clear { yes: false } => {
            warn!("event=cli_clear module=cli status=error error_code=confirmation_missing");
            return Err("clear deletes all data and cannot be undone; rerun with --yes".to_string());
        }
        Command::Clear { yes: true } => {
            let service = SubjectService::new(subject_repo);
            let summary = service.clear_all().map_err(|err| err.to_string())?;
            println!(
                "cleared {} subjects and {} grades",
                summary.subjects_removed, summary.grades_removed
            );
        }
        Command::Import { dir } => {
            let report = import_legacy_dir(&dir, conn).map_err(|err| err.to_string())?;
            println!(
                "imported {} subjects ({} new) and {} grades",
                report.subjects_seen, report.subjects_created, report.grades_imported
            );
        }
        Command::Export { dir } => {
            let written = export_legacy_dir(&dir, conn).map_err(|err| err.to_string())?;
            println!("exported {written} subjects");
        }
        Command::Version => println!("gradebook_core version={}", core_version()),
    }

    Ok(())
}

fn parse_assignment(raw: &str) -> Result<String, String> {
    let assignment = raw.trim();
    if assignment.is_empty() {
        return Err("please enter an assignment".to_string());
    }
    Ok(assignment.to_string())
}

fn parse_grade(raw: &str) -> Result<f64, String> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err("please enter a number for grade".to_string()),
    }
}
