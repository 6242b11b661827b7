//! Per-subject grade mapping.
//!
//! # Responsibility
//! - Hold one subject's assignment -> grade mapping in a stable order.
//! - Define the JSON document shape (`{"HW1": 80.0, ...}`) used by legacy
//!   import/export.
//!
//! # Invariants
//! - At most one entry per assignment name.
//! - Re-setting an assignment overwrites its value in place; order is
//!   first-insertion order.

use crate::model::validation::{validate_assignment_name, validate_grade, ValidationError};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Formatter;

/// One assignment and its current grade.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeEntry {
    pub assignment: String,
    pub grade: f64,
}

/// Ordered assignment -> grade mapping for a single subject.
///
/// Equality is order-sensitive, which matches what `load_grades` returns
/// after `save_grades`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeBook {
    entries: Vec<GradeEntry>,
}

impl GradeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `assignment` to `grade`, returning the value it replaced.
    pub fn set(&mut self, assignment: impl Into<String>, grade: f64) -> Option<f64> {
        let assignment = assignment.into();
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|entry| entry.assignment == assignment)
        {
            return Some(std::mem::replace(&mut existing.grade, grade));
        }

        self.entries.push(GradeEntry { assignment, grade });
        None
    }

    pub fn get(&self, assignment: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.assignment == assignment)
            .map(|entry| entry.grade)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[GradeEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GradeEntry> {
        self.entries.iter()
    }

    /// Grade values in iteration order.
    pub fn grades(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|entry| entry.grade)
    }

    /// Checks every entry against write-path rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for entry in &self.entries {
            validate_assignment_name(&entry.assignment)?;
            validate_grade(entry.grade)?;
        }
        Ok(())
    }
}

impl<A: Into<String>> FromIterator<(A, f64)> for GradeBook {
    fn from_iter<T: IntoIterator<Item = (A, f64)>>(iter: T) -> Self {
        let mut book = Self::new();
        for (assignment, grade) in iter {
            book.set(assignment, grade);
        }
        book
    }
}

impl<'a> IntoIterator for &'a GradeBook {
    type Item = &'a GradeEntry;
    type IntoIter = std::slice::Iter<'a, GradeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for GradeBook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.assignment, &entry.grade)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for GradeBook {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(GradeBookVisitor)
    }
}

struct GradeBookVisitor;

impl<'de> Visitor<'de> for GradeBookVisitor {
    type Value = GradeBook;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("a map of assignment names to numeric grades")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut book = GradeBook::new();
        // Duplicate keys: last value wins, first position is kept.
        while let Some((assignment, grade)) = access.next_entry::<String, f64>()? {
            book.set(assignment, grade);
        }
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::GradeBook;

    #[test]
    fn set_overwrites_in_place() {
        let mut book = GradeBook::new();
        assert_eq!(book.set("Quiz1", 90.0), None);
        book.set("Quiz2", 70.0);
        assert_eq!(book.set("Quiz1", 95.0), Some(90.0));

        let names: Vec<&str> = book.iter().map(|e| e.assignment.as_str()).collect();
        assert_eq!(names, vec!["Quiz1", "Quiz2"]);
        assert_eq!(book.get("Quiz1"), Some(95.0));
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn json_document_keeps_key_order() {
        let book: GradeBook = serde_json::from_str(r#"{"b": 1, "a": 2.5, "b": 3}"#).unwrap();
        assert_eq!(book.entries()[0].assignment, "b");
        assert_eq!(book.get("b"), Some(3.0));
        assert_eq!(book.get("a"), Some(2.5));

        let json = serde_json::to_string(&book).unwrap();
        assert_eq!(json, r#"{"b":3.0,"a":2.5}"#);
    }

    #[test]
    fn json_document_rejects_non_numeric_grade() {
        let result: Result<GradeBook, _> = serde_json::from_str(r#"{"HW1": "A+"}"#);
        assert!(result.is_err());
    }
}
