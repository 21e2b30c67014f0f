//! Room model.
//!
//! Rooms are interchangeable within a category: any free lecture room can
//! host any lecture-room course. The pool keeps rooms in input order so
//! that seeded runs are reproducible.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Room classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomCategory {
    /// General teaching room (`LECTURE_ROOM`).
    LectureRoom,
    /// Room with workstations (`COMPUTER_LAB`).
    ComputerLab,
    /// High-capacity hall (`SEATER_120`).
    LargeCapacity,
}

impl RoomCategory {
    /// Input tag as used in room tables.
    pub fn tag(&self) -> &'static str {
        match self {
            RoomCategory::LectureRoom => "LECTURE_ROOM",
            RoomCategory::ComputerLab => "COMPUTER_LAB",
            RoomCategory::LargeCapacity => "SEATER_120",
        }
    }

    /// Human-readable name.
    pub fn description(&self) -> &'static str {
        match self {
            RoomCategory::LectureRoom => "lecture-room",
            RoomCategory::ComputerLab => "computer-lab",
            RoomCategory::LargeCapacity => "large-capacity",
        }
    }
}

impl fmt::Display for RoomCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for RoomCategory {
    type Err = String;

    /// Parses an input tag, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LECTURE_ROOM" => Ok(RoomCategory::LectureRoom),
            "COMPUTER_LAB" => Ok(RoomCategory::ComputerLab),
            "SEATER_120" => Ok(RoomCategory::LargeCapacity),
            other => Err(format!("unknown room category '{other}'")),
        }
    }
}

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier (e.g., "C101").
    pub id: String,
    /// Room classification.
    pub category: RoomCategory,
}

impl Room {
    /// Creates a new room.
    pub fn new(id: impl Into<String>, category: RoomCategory) -> Self {
        Self {
            id: id.into(),
            category,
        }
    }

    /// Creates a lecture room.
    pub fn lecture(id: impl Into<String>) -> Self {
        Self::new(id, RoomCategory::LectureRoom)
    }

    /// Creates a computer lab.
    pub fn lab(id: impl Into<String>) -> Self {
        Self::new(id, RoomCategory::ComputerLab)
    }

    /// Creates a large-capacity hall.
    pub fn large(id: impl Into<String>) -> Self {
        Self::new(id, RoomCategory::LargeCapacity)
    }
}

/// Categorized room inventory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomPool {
    rooms: Vec<Room>,
}

impl RoomPool {
    /// Creates a pool from rooms in input order.
    pub fn new(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// All rooms in input order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Room identifiers of a category, in input order.
    pub fn ids_in(&self, category: RoomCategory) -> Vec<&str> {
        self.rooms
            .iter()
            .filter(|r| r.category == category)
            .map(|r| r.id.as_str())
            .collect()
    }

    /// Whether at least one room of the category exists.
    pub fn has_category(&self, category: RoomCategory) -> bool {
        self.rooms.iter().any(|r| r.category == category)
    }

    /// Number of rooms of a category.
    pub fn count_in(&self, category: RoomCategory) -> usize {
        self.rooms.iter().filter(|r| r.category == category).count()
    }

    /// Total number of rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
