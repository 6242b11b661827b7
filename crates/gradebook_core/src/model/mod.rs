//! Gradebook domain model.
//!
//! # Responsibility
//! - Define the data structures shared by repositories and services.
//! - Own the input rules every write path enforces.
//!
//! # Invariants
//! - A subject is identified by its exact (case-sensitive) name.
//! - A `GradeBook` never holds two entries for the same assignment.

pub mod grade;
pub mod subject;
pub mod validation;
