//! Placement failure records.

use serde::{Deserialize, Serialize};

use super::{Course, RoomCategory, Section, SessionType};

/// Why a session could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureCause {
    /// Every attempt in the budget was rejected.
    AttemptsExhausted {
        /// Attempts spent.
        attempts: u32,
    },
    /// No room of the required category exists at all.
    NoRoomsOfCategory {
        /// The missing category.
        category: RoomCategory,
    },
}

/// One session that could not be placed. Append-only run output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnscheduledComponent {
    /// Department.
    pub department: String,
    /// Semester number.
    pub semester: u32,
    /// Course code.
    pub code: String,
    /// Course name.
    pub name: String,
    /// Instructor.
    pub faculty: String,
    /// Session kind that failed.
    pub session_type: SessionType,
    /// Zero-based section index.
    pub section: u32,
    /// Human-readable reason, naming the session kind.
    pub reason: String,
    /// Structured cause.
    pub cause: FailureCause,
}

impl UnscheduledComponent {
    /// Builds a record for a course session in a section.
    pub fn new(
        course: &Course,
        section: &Section,
        session_type: SessionType,
        cause: FailureCause,
    ) -> Self {
        Self {
            department: course.department.clone(),
            semester: course.semester,
            code: course.code.clone(),
            name: course.name.clone(),
            faculty: course.faculty.clone(),
            session_type,
            section: section.index,
            reason: reason_text(session_type, &cause),
            cause,
        }
    }
}

fn reason_text(session_type: SessionType, cause: &FailureCause) -> String {
    match cause {
        FailureCause::AttemptsExhausted { .. } => {
            format!("{} not scheduled", session_type.label())
        }
        FailureCause::NoRoomsOfCategory { category } => {
            format!("{} not scheduled: no {category} rooms configured", session_type.label())
        }
    }
}
