//! Grade store use-case service.
//!
//! # Responsibility
//! - Load, replace and add grades for one subject at a time.
//! - Derive the stats report and summary from persisted grades.
//!
//! # Invariants
//! - `save_grades` has whole-mapping replace semantics; `add_grade` touches
//!   one assignment only.
//! - Stats are always computed from the persisted mapping, never cached.

use crate::model::grade::GradeBook;
use crate::repo::grade_repo::GradeRepository;
use crate::repo::RepoResult;
use crate::stats::{render_report, GradeSummary};
use log::{debug, info};

/// Use-case service wrapper for per-subject grade stores.
pub struct GradeService<R: GradeRepository> {
    repo: R,
}

impl<R: GradeRepository> GradeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the current mapping for `subject`; empty when it has none.
    pub fn load_grades(&self, subject: &str) -> RepoResult<GradeBook> {
        self.repo.load_grades(subject)
    }

    /// Replaces the whole mapping for a registered subject.
    pub fn save_grades(&self, subject: &str, book: &GradeBook) -> RepoResult<()> {
        self.repo.save_grades(subject, book)?;
        info!(
            "event=grades_save module=grades status=ok entries={}",
            book.len()
        );
        Ok(())
    }

    /// Sets `assignment` to `grade` for a registered subject, overwriting any
    /// previous value.
    pub fn add_grade(&self, subject: &str, assignment: &str, grade: f64) -> RepoResult<()> {
        self.repo.upsert_grade(subject, assignment, grade)?;
        info!("event=grade_add module=grades status=ok");
        Ok(())
    }

    /// Renders the plain-text stats report for `subject`.
    pub fn get_stats(&self, subject: &str) -> RepoResult<String> {
        let book = self.repo.load_grades(subject)?;
        debug!("event=stats_render module=stats entries={}", book.len());
        Ok(render_report(&book))
    }

    /// Computes structured statistics for `subject`.
    pub fn summarize(&self, subject: &str) -> RepoResult<GradeSummary> {
        let book = self.repo.load_grades(subject)?;
        Ok(GradeSummary::from_book(&book))
    }
}
