//! Subject registry use-case service.
//!
//! # Responsibility
//! - List and register subjects.
//! - Expose the global clear, which must reset registry and stores together.
//!
//! # Invariants
//! - Duplicate registration is silently idempotent, never an error.
//! - Logged events never include subject names.

use crate::model::subject::{ClearSummary, SubjectRegistration};
use crate::repo::subject_repo::SubjectRepository;
use crate::repo::RepoResult;
use log::{info, warn};
use std::time::Instant;

/// Use-case service wrapper for the subject registry.
pub struct SubjectService<R: SubjectRepository> {
    repo: R,
}

impl<R: SubjectRepository> SubjectService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns registered subject names in insertion order.
    ///
    /// A fresh store yields an empty list.
    pub fn list_subjects(&self) -> RepoResult<Vec<String>> {
        self.repo.list_subjects()
    }

    /// Returns whether `name` is registered.
    pub fn contains_subject(&self, name: &str) -> RepoResult<bool> {
        self.repo.contains_subject(name)
    }

    /// Registers `name` and creates its empty grade store.
    ///
    /// # Contract
    /// - Already-registered names return `AlreadyRegistered` and change nothing.
    /// - Either both the registry entry and the store exist afterwards, or
    ///   the call fails and neither was written.
    pub fn add_subject(&self, name: &str) -> RepoResult<SubjectRegistration> {
        let started_at = Instant::now();
        match self.repo.register_subject(name) {
            Ok(outcome) => {
                info!(
                    "event=subject_register module=registry status=ok created={} duration_ms={}",
                    outcome.is_created(),
                    started_at.elapsed().as_millis()
                );
                Ok(outcome)
            }
            Err(err) => {
                warn!(
                    "event=subject_register module=registry status=error duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    /// Removes every subject, every grade store and the registry.
    pub fn clear_all(&self) -> RepoResult<ClearSummary> {
        let started_at = Instant::now();
        let summary = self.repo.clear_all().inspect_err(|_| {
            warn!("event=clear_all module=registry status=error");
        })?;
        info!(
            "event=clear_all module=registry status=ok subjects_removed={} grades_removed={} duration_ms={}",
            summary.subjects_removed,
            summary.grades_removed,
            started_at.elapsed().as_millis()
        );
        Ok(summary)
    }
}
