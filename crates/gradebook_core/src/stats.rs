//! Grade statistics and the plain-text stats report.
//!
//! # Responsibility
//! - Compute the arithmetic mean and range of one subject's grades.
//! - Render the human-readable report consumed by presentation layers.
//!
//! # Invariants
//! - An empty book renders exactly `"No grades yet.\n"`.
//! - Otherwise: one `"<assignment>: <grade>\n"` line per entry in book order,
//!   then `"\nAverage: <mean:.2>"` with no trailing newline.

use crate::model::grade::GradeBook;

/// Report text for a subject without grades.
pub const NO_GRADES_REPORT: &str = "No grades yet.\n";

/// Structured statistics for one subject.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeSummary {
    pub count: usize,
    /// `None` when `count == 0`.
    pub mean: Option<f64>,
    pub lowest: Option<f64>,
    pub highest: Option<f64>,
}

impl GradeSummary {
    pub fn from_book(book: &GradeBook) -> Self {
        let count = book.len();
        let lowest = book.grades().reduce(f64::min);
        let highest = book.grades().reduce(f64::max);
        Self {
            count,
            mean: mean(book),
            lowest,
            highest,
        }
    }
}

/// Arithmetic mean of all grades, or `None` for an empty book.
///
/// Finite grades always give a finite mean, even when their sum overflows.
pub fn mean(book: &GradeBook) -> Option<f64> {
    if book.is_empty() {
        return None;
    }
    let count = book.len() as f64;
    let total: f64 = book.grades().sum();
    if total.is_finite() {
        return Some(total / count);
    }
    Some(book.grades().map(|grade| grade / count).sum())
}

/// Renders the stats report for one subject's grades.
pub fn render_report(book: &GradeBook) -> String {
    let Some(average) = mean(book) else {
        return NO_GRADES_REPORT.to_string();
    };

    let mut report = book
        .iter()
        .map(|entry| format!("{}: {}\n", entry.assignment, format_grade(entry.grade)))
        .collect::<String>();
    report.push_str(&format!("\nAverage: {average:.2}"));
    report
}

/// Formats a grade the way the legacy report did: shortest round-trip
/// digits, always with a fractional part or exponent (`80.0`, `92.5`,
/// `1e+16`, `1e-05`).
pub fn format_grade(grade: f64) -> String {
    let shortest = format!("{grade:?}");
    let Some((mantissa, exponent)) = shortest.split_once('e') else {
        return shortest;
    };

    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    let mantissa = mantissa.strip_suffix(".0").unwrap_or(mantissa);
    format!("{mantissa}e{sign}{digits:0>2}")
}
