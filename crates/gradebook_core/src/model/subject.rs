//! Subject registry model.
//!
//! # Invariants
//! - Subject identity is the exact name string; `Math` and `math` differ.
//! - Registration is idempotent: a repeated name is reported, not rejected.

/// Outcome of registering a subject name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectRegistration {
    /// Registry entry and empty grade store were both created.
    Created,
    /// Name was already registered; nothing changed.
    AlreadyRegistered,
}

impl SubjectRegistration {
    /// Returns whether this registration created a new subject.
    pub fn is_created(self) -> bool {
        matches!(self, Self::Created)
    }
}

/// Row counts removed by a global clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearSummary {
    pub subjects_removed: usize,
    pub grades_removed: usize,
}
