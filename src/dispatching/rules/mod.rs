//! Built-in ordering rules.
//!
//! # Score Convention
//! All rules return lower scores for courses that should be scheduled
//! earlier.

use super::{OrderingRule, RuleScore};
use crate::models::Course;

/// Heaviest weekly workload first.
///
/// Scores a course by the negated sum of its weekly lecture, tutorial and
/// lab hours, so demanding courses claim slots while the grid is empty.
#[derive(Debug, Clone, Copy)]
pub struct Workload;

impl OrderingRule for Workload {
    fn name(&self) -> &'static str {
        "WORKLOAD"
    }

    fn evaluate(&self, course: &Course) -> RuleScore {
        -f64::from(course.sessions.weekly_hours())
    }
}

/// Electives before core courses.
///
/// Electives are often shared across programs and have the fewest
/// workable slots; visiting them first keeps them from being starved.
#[derive(Debug, Clone, Copy)]
pub struct ElectiveFirst;

impl OrderingRule for ElectiveFirst {
    fn name(&self) -> &'static str {
        "ELECTIVE"
    }

    fn evaluate(&self, course: &Course) -> RuleScore {
        if course.elective {
            0.0
        } else {
            1.0
        }
    }
}

/// Lab-bearing courses before lecture-only courses.
#[derive(Debug, Clone, Copy)]
pub struct LabFirst;

impl OrderingRule for LabFirst {
    fn name(&self) -> &'static str {
        "LAB"
    }

    fn evaluate(&self, course: &Course) -> RuleScore {
        if course.has_lab() {
            0.0
        } else {
            1.0
        }
    }
}
