//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the registry and grade-store APIs
//!   presentation layers call.
//! - Emit metadata-only diagnostic events for each use-case.

pub mod grade_service;
pub mod subject_service;
