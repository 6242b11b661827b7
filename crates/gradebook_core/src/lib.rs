//! Core persistence and statistics engine for the gradebook.
//! This crate is the single source of truth for registry/store invariants.

pub mod config;
pub mod db;
pub mod legacy;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;

pub use config::{ConfigError, GradebookConfig};
pub use legacy::{export_legacy_dir, import_legacy_dir, LegacyImportError, LegacyImportReport};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::grade::{GradeBook, GradeEntry};
pub use model::subject::{ClearSummary, SubjectRegistration};
pub use model::validation::ValidationError;
pub use repo::grade_repo::{GradeRepository, SqliteGradeRepository};
pub use repo::subject_repo::{SqliteSubjectRepository, SubjectRepository};
pub use repo::{RepoError, RepoResult};
pub use service::grade_service::GradeService;
pub use service::subject_service::SubjectService;
pub use stats::{format_grade, render_report, GradeSummary, NO_GRADES_REPORT};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
