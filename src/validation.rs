//! Input validation for timetable generation.
//!
//! Checks structural integrity of normalized courses and the room
//! inventory before scheduling. Detects:
//! - Duplicate course codes within one department/semester
//! - Duplicate room IDs
//! - Courses that request no sessions
//! - Courses whose room category has no rooms
//!
//! The last two are advisory: a run still proceeds and records the
//! affected sessions as unscheduled.

use crate::models::{Course, RoomPool};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A course code appears twice in one department/semester.
    DuplicateCourse,
    /// Two rooms share the same ID.
    DuplicateRoom,
    /// A course requests zero sessions.
    EmptyCourse,
    /// No room exists for a course's category.
    MissingRoomCategory,
}

impl ValidationErrorKind {
    /// Whether generation must not proceed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ValidationErrorKind::DuplicateCourse | ValidationErrorKind::DuplicateRoom
        )
    }
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a generation run.
///
/// Disabled courses are still checked for duplicates but not for
/// sessions or rooms.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(courses: &[Course], rooms: &RoomPool) -> ValidationResult {
    let mut errors = Vec::new();

    let mut room_ids = HashSet::new();
    for r in rooms.rooms() {
        if !room_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateRoom,
                format!("Duplicate room ID: {}", r.id),
            ));
        }
    }

    let mut course_keys = HashSet::new();
    for course in courses {
        let key = (course.department.as_str(), course.semester, course.code.as_str());
        if !course_keys.insert(key) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateCourse,
                format!(
                    "Duplicate course {} in {} semester {}",
                    course.code, course.department, course.semester
                ),
            ));
        }
    }

    for course in courses.iter().filter(|c| c.enabled) {
        if course.sessions.total() == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyCourse,
                format!("Course '{}' requests no sessions", course.code),
            ));
        } else if !rooms.has_category(course.room_category) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingRoomCategory,
                format!(
                    "Course '{}' needs a {} room but none is configured",
                    course.code, course.room_category
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Room, SessionCounts};

    fn sample_rooms() -> RoomPool {
        RoomPool::new(vec![
            Room::lecture("C101"),
            Room::lecture("C102"),
            Room::lab("L1"),
        ])
    }

    fn sample_courses() -> Vec<Course> {
        vec![
            Course::new("CSE", 3, "CS301")
                .with_faculty("Dr. A")
                .with_sessions(SessionCounts::new(3, 1, 0, 0)),
            Course::new("CSE", 3, "CS302")
                .with_faculty("Dr. B")
                .with_sessions(SessionCounts::new(2, 0, 1, 0)),
            Course::new("ECE", 3, "CS301")
                .with_faculty("Dr. C")
                .with_sessions(SessionCounts::new(3, 0, 0, 0)),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_courses(), &sample_rooms()).is_ok());
    }

    #[test]
    fn test_duplicate_course_in_same_semester() {
        let mut courses = sample_courses();
        courses.push(Course::new("CSE", 3, "CS302").with_sessions(SessionCounts::new(1, 0, 0, 0)));
        let errors = validate_input(&courses, &sample_rooms()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateCourse);
        assert!(errors[0].kind.is_fatal());
    }

    #[test]
    fn test_duplicate_room_id() {
        let rooms = sample_rooms().with_room(Room::lab("C101"));
        let errors = validate_input(&sample_courses(), &rooms).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateRoom && e.message.contains("C101")));
    }

    #[test]
    fn test_empty_course_is_advisory() {
        let courses = vec![Course::new("CSE", 5, "CS599")];
        let errors = validate_input(&courses, &sample_rooms()).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyCourse);
        assert!(!errors[0].kind.is_fatal());
    }

    #[test]
    fn test_disabled_course_not_checked_for_sessions() {
        let courses = vec![Course::new("CSE", 5, "CS599").with_enabled(false)];
        assert!(validate_input(&courses, &sample_rooms()).is_ok());
    }

    #[test]
    fn test_missing_room_category() {
        let rooms = RoomPool::new(vec![Room::lecture("C101")]);
        let errors = validate_input(&sample_courses(), &rooms).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::MissingRoomCategory);
        assert!(errors[0].message.contains("CS302"));
        assert!(errors[0].message.contains("computer-lab"));
    }

    #[test]
    fn test_multiple_errors_collected() {
        let mut courses = sample_courses();
        courses.push(Course::new("CSE", 3, "CS301"));
        let rooms = RoomPool::new(vec![Room::lecture("C101"), Room::lecture("C101")]);
        let errors = validate_input(&courses, &rooms).unwrap_err();
        // duplicate room, duplicate course, empty course, missing lab rooms
        assert_eq!(errors.len(), 4);
    }
}
