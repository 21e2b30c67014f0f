//! Course model and record normalization.
//!
//! Raw course records come from tabular input with loosely-typed,
//! possibly missing fields. They are normalized once into [`Course`]
//! values; the scheduler only ever sees normalized courses.
//!
//! # Defaulting rules
//! - Missing session counts are zero.
//! - A missing or placeholder faculty field becomes `"TBD"`.
//! - A multi-name faculty field resolves to its first name.
//! - A missing schedule flag means the course is scheduled.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::RoomCategory;

/// Faculty name used when the source field is empty.
pub const UNASSIGNED_FACULTY: &str = "TBD";

const FACULTY_SEPARATORS: [char; 4] = ['/', ',', '&', ';'];

/// Kind of teaching session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    /// Lecture (L).
    Lecture,
    /// Tutorial (T).
    Tutorial,
    /// Practical / lab (P).
    Lab,
    /// Self-study (S).
    SelfStudy,
}

impl SessionType {
    /// All types, in the order a course's sessions are scheduled.
    pub const ALL: [SessionType; 4] = [
        SessionType::Lecture,
        SessionType::Tutorial,
        SessionType::Lab,
        SessionType::SelfStudy,
    ];

    /// Short grid tag.
    pub fn code(&self) -> &'static str {
        match self {
            SessionType::Lecture => "LEC",
            SessionType::Tutorial => "TUT",
            SessionType::Lab => "LAB",
            SessionType::SelfStudy => "SS",
        }
    }

    /// Display name.
    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Lecture => "Lecture",
            SessionType::Tutorial => "Tutorial",
            SessionType::Lab => "Lab",
            SessionType::SelfStudy => "Self-study",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Weekly session counts by type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCounts {
    /// Lectures per week.
    pub lecture: u32,
    /// Tutorials per week.
    pub tutorial: u32,
    /// Lab sessions per week.
    pub lab: u32,
    /// Self-study sessions per week.
    pub self_study: u32,
}

impl SessionCounts {
    /// Creates counts from L-T-P-S values.
    pub fn new(lecture: u32, tutorial: u32, lab: u32, self_study: u32) -> Self {
        Self {
            lecture,
            tutorial,
            lab,
            self_study,
        }
    }

    /// Count for one session type.
    pub fn get(&self, session_type: SessionType) -> u32 {
        match session_type {
            SessionType::Lecture => self.lecture,
            SessionType::Tutorial => self.tutorial,
            SessionType::Lab => self.lab,
            SessionType::SelfStudy => self.self_study,
        }
    }

    /// Contact hours L + T + P (self-study excluded).
    pub fn weekly_hours(&self) -> u32 {
        self.lecture + self.tutorial + self.lab
    }

    /// Total number of sessions of every type.
    pub fn total(&self) -> u32 {
        self.weekly_hours() + self.self_study
    }
}

/// A normalized course offering for one (department, semester).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Offering department (e.g., "CSE").
    pub department: String,
    /// Semester number.
    pub semester: u32,
    /// Course code, unique within a run.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Resolved instructor name.
    pub faculty: String,
    /// Weekly session counts.
    pub sessions: SessionCounts,
    /// Room category every session of this course needs.
    pub room_category: RoomCategory,
    /// Whether the course is an elective.
    pub elective: bool,
    /// Whether the course takes part in generation.
    pub enabled: bool,
}

impl Course {
    /// Creates an enabled, non-elective course with no sessions.
    pub fn new(department: impl Into<String>, semester: u32, code: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            semester,
            code: code.into(),
            name: String::new(),
            faculty: UNASSIGNED_FACULTY.to_string(),
            sessions: SessionCounts::default(),
            room_category: RoomCategory::LectureRoom,
            elective: false,
            enabled: true,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the faculty from a raw (possibly multi-name) field.
    pub fn with_faculty(mut self, faculty: &str) -> Self {
        self.faculty = primary_faculty(Some(faculty));
        self
    }

    /// Sets session counts and derives the room category.
    pub fn with_sessions(mut self, sessions: SessionCounts) -> Self {
        self.sessions = sessions;
        self.room_category = required_room_category(&sessions);
        self
    }

    /// Marks the course as elective.
    pub fn with_elective(mut self, elective: bool) -> Self {
        self.elective = elective;
        self
    }

    /// Enables or disables scheduling.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether the course has lab sessions.
    pub fn has_lab(&self) -> bool {
        self.sessions.lab > 0
    }

    /// Normalizes a raw record.
    ///
    /// `elective_keywords` are matched as whole lowercase tokens of the
    /// course name or code, in addition to the explicit elective flag.
    pub fn from_record(record: &CourseRecord, elective_keywords: &[String]) -> Self {
        let sessions = SessionCounts::new(
            record.lecture.unwrap_or(0),
            record.tutorial.unwrap_or(0),
            record.practical.unwrap_or(0),
            record.self_study.unwrap_or(0),
        );
        let name = record.name.as_deref().unwrap_or("").trim().to_string();
        let code = record.code.trim().to_string();
        let elective = record.elective.unwrap_or(false)
            || has_keyword(&name, elective_keywords)
            || has_keyword(&code, elective_keywords);

        Self {
            department: record.department.trim().to_string(),
            semester: record.semester,
            code,
            name,
            faculty: primary_faculty(record.faculty.as_deref()),
            sessions,
            room_category: required_room_category(&sessions),
            elective,
            enabled: record.schedule.unwrap_or(true),
        }
    }
}

/// A raw course row as handed over by input collaborators.
///
/// Field aliases accept the spreadsheet column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    /// Offering department.
    #[serde(alias = "Department")]
    pub department: String,
    /// Semester number.
    #[serde(alias = "Semester")]
    pub semester: u32,
    /// Course code.
    #[serde(alias = "Course Code")]
    pub code: String,
    /// Course name.
    #[serde(default, alias = "Course Name")]
    pub name: Option<String>,
    /// Raw faculty field, possibly listing several names.
    #[serde(default, alias = "Faculty")]
    pub faculty: Option<String>,
    /// Lectures per week (L).
    #[serde(default, alias = "L")]
    pub lecture: Option<u32>,
    /// Tutorials per week (T).
    #[serde(default, alias = "T")]
    pub tutorial: Option<u32>,
    /// Practicals per week (P).
    #[serde(default, alias = "P")]
    pub practical: Option<u32>,
    /// Self-study sessions per week (S).
    #[serde(default, alias = "S")]
    pub self_study: Option<u32>,
    /// Explicit elective flag.
    #[serde(default, alias = "Elective")]
    pub elective: Option<bool>,
    /// Whether to schedule this course (missing = yes).
    #[serde(default, alias = "Schedule")]
    pub schedule: Option<bool>,
}

/// Resolves a raw faculty field to a single instructor name.
///
/// Empty and placeholder values (`nan`, `none`) become `"TBD"`. Otherwise
/// the text before the first separator found, trying `/`, `,`, `&`, `;`
/// in that order.
pub fn primary_faculty(field: Option<&str>) -> String {
    let raw = field.unwrap_or("").trim();
    if raw.is_empty() || matches!(raw.to_ascii_lowercase().as_str(), "nan" | "none") {
        return UNASSIGNED_FACULTY.to_string();
    }
    for sep in FACULTY_SEPARATORS {
        if let Some((first, _)) = raw.split_once(sep) {
            let first = first.trim();
            if first.is_empty() {
                return UNASSIGNED_FACULTY.to_string();
            }
            return first.to_string();
        }
    }
    raw.to_string()
}

/// Lab-bearing courses need a computer lab; everything else a lecture room.
pub fn required_room_category(sessions: &SessionCounts) -> RoomCategory {
    if sessions.lab > 0 {
        RoomCategory::ComputerLab
    } else {
        RoomCategory::LectureRoom
    }
}

fn has_keyword(text: &str, keywords: &[String]) -> bool {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    keywords.iter().any(|k| {
        let k = k.to_lowercase();
        let parts: Vec<&str> = k.split_whitespace().collect();
        !parts.is_empty() && tokens.windows(parts.len()).any(|w| w == parts.as_slice())
    })
}
