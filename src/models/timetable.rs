//! Per-section timetable grid.
//!
//! A day × slot matrix. A session spanning several slots stores its
//! course/faculty/room metadata only in the first slot of the run (the
//! merge head). Trailing slots carry the session type alone, so a renderer
//! recovers the run length by scanning continuation cells.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Section, SessionType};

/// Metadata of a placed session, stored at its first slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHead {
    /// Session kind.
    pub session_type: SessionType,
    /// Course code.
    pub course_code: String,
    /// Course name.
    pub course_name: String,
    /// Instructor.
    pub faculty: String,
    /// Room the session is held in.
    pub room: String,
}

/// One grid cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    /// Nothing scheduled.
    #[default]
    Empty,
    /// First slot of a session run.
    Head(SessionHead),
    /// Trailing slot of a session run.
    Continuation {
        /// Session kind of the run.
        session_type: SessionType,
    },
}

impl Cell {
    /// Whether nothing is scheduled here.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Session type, if occupied.
    pub fn session_type(&self) -> Option<SessionType> {
        match self {
            Cell::Empty => None,
            Cell::Head(head) => Some(head.session_type),
            Cell::Continuation { session_type } => Some(*session_type),
        }
    }
}

/// A session as read back from a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridSession<'a> {
    /// Day index.
    pub day: usize,
    /// First slot index of the run.
    pub start_slot: usize,
    /// Number of slots in the run.
    pub length: usize,
    /// Head metadata.
    pub head: &'a SessionHead,
}

impl GridSession<'_> {
    /// Slot indices covered by the run.
    pub fn slot_indices(&self) -> std::ops::Range<usize> {
        self.start_slot..self.start_slot + self.length
    }
}

/// Timetable of one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableGrid {
    section: Section,
    cells: Vec<Vec<Cell>>,
}

impl TimetableGrid {
    /// Creates an empty grid.
    pub fn new(section: Section, days: usize, slots: usize) -> Self {
        Self {
            section,
            cells: vec![vec![Cell::Empty; slots]; days],
        }
    }

    /// Section owning this grid.
    pub fn section(&self) -> &Section {
        &self.section
    }

    /// Number of days.
    pub fn day_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of slots per day.
    pub fn slot_count(&self) -> usize {
        self.cells.first().map(Vec::len).unwrap_or(0)
    }

    /// Cell at (day, slot).
    pub fn cell(&self, day: usize, slot: usize) -> Option<&Cell> {
        self.cells.get(day).and_then(|row| row.get(slot))
    }

    /// Whether (day, slot) exists and is empty.
    pub fn is_free(&self, day: usize, slot: usize) -> bool {
        self.cell(day, slot).is_some_and(Cell::is_empty)
    }

    /// Writes a session run. The caller guarantees the cells are free.
    pub(crate) fn occupy(&mut self, day: usize, slots: &[usize], head: SessionHead) {
        let Some(row) = self.cells.get_mut(day) else {
            return;
        };
        let session_type = head.session_type;
        let mut head = Some(head);
        for &slot in slots {
            if let Some(cell) = row.get_mut(slot) {
                *cell = match head.take() {
                    Some(h) => Cell::Head(h),
                    None => Cell::Continuation { session_type },
                };
            }
        }
    }

    /// Length of the run whose head is at (day, slot); 0 if not a head.
    pub fn run_length(&self, day: usize, slot: usize) -> usize {
        let Some(Cell::Head(head)) = self.cell(day, slot) else {
            return 0;
        };
        let mut length = 1;
        while let Some(Cell::Continuation { session_type }) = self.cell(day, slot + length) {
            if *session_type != head.session_type {
                break;
            }
            length += 1;
        }
        length
    }

    /// Every placed session, ordered by day then start slot.
    pub fn sessions(&self) -> Vec<GridSession<'_>> {
        let mut out = Vec::new();
        for (day, row) in self.cells.iter().enumerate() {
            for (slot, cell) in row.iter().enumerate() {
                if let Cell::Head(head) = cell {
                    out.push(GridSession {
                        day,
                        start_slot: slot,
                        length: self.run_length(day, slot),
                        head,
                    });
                }
            }
        }
        out
    }

    /// Rooms used by a course in this grid (legend data).
    pub fn rooms_for_course(&self, code: &str) -> BTreeSet<&str> {
        self.sessions()
            .into_iter()
            .filter(|s| s.head.course_code == code)
            .map(|s| s.head.room.as_str())
            .collect()
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| !c.is_empty())
            .count()
    }
}
