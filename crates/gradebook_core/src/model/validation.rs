//! Input validation rules shared by every write path.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected write input.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Subject name is empty or whitespace-only.
    EmptySubjectName,
    /// Assignment name is empty or whitespace-only.
    EmptyAssignmentName,
    /// Grade is NaN or infinite and cannot be persisted as a number.
    NonFiniteGrade(f64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySubjectName => write!(f, "subject name cannot be empty"),
            Self::EmptyAssignmentName => write!(f, "assignment name cannot be empty"),
            Self::NonFiniteGrade(value) => write!(f, "grade must be a finite number, got {value}"),
        }
    }
}

impl Error for ValidationError {}

/// Checks that a subject name carries at least one non-whitespace character.
///
/// The name itself is stored verbatim; no trimming or case folding happens.
pub fn validate_subject_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptySubjectName);
    }
    Ok(())
}

/// Checks that an assignment name carries at least one non-whitespace character.
pub fn validate_assignment_name(assignment: &str) -> Result<(), ValidationError> {
    if assignment.trim().is_empty() {
        return Err(ValidationError::EmptyAssignmentName);
    }
    Ok(())
}

/// Checks that a grade can round-trip through storage as a plain number.
pub fn validate_grade(grade: f64) -> Result<(), ValidationError> {
    if !grade.is_finite() {
        return Err(ValidationError::NonFiniteGrade(grade));
    }
    Ok(())
}
