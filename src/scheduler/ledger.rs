//! Run-wide occupancy state.
//!
//! Rooms and faculty are shared by every section of a run, so both are
//! tracked here rather than in the per-section grids. The ledger and the
//! binding table are created once per run and passed by reference into
//! every placement; placements are permanent, so nothing is ever freed.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// day → occupied slot indices.
type DayOccupancy = BTreeMap<usize, BTreeSet<usize>>;

/// Faculty and room occupancy across all sections of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OccupancyLedger {
    faculty: BTreeMap<String, DayOccupancy>,
    rooms: BTreeMap<String, DayOccupancy>,
}

impl OccupancyLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the instructor holds `slot` on `day`.
    pub fn is_faculty_busy(&self, faculty: &str, day: usize, slot: usize) -> bool {
        occupied(&self.faculty, faculty, day).is_some_and(|s| s.contains(&slot))
    }

    /// Whether the room holds `slot` on `day`.
    pub fn is_room_busy(&self, room: &str, day: usize, slot: usize) -> bool {
        occupied(&self.rooms, room, day).is_some_and(|s| s.contains(&slot))
    }

    /// Whether the room is free for every slot in `slots` on `day`.
    pub fn is_room_free_for(&self, room: &str, day: usize, slots: &[usize]) -> bool {
        match occupied(&self.rooms, room, day) {
            Some(taken) => slots.iter().all(|s| !taken.contains(s)),
            None => true,
        }
    }

    /// Slots the instructor holds on `day`, ascending.
    pub fn faculty_slots(&self, faculty: &str, day: usize) -> impl Iterator<Item = usize> + '_ {
        occupied(&self.faculty, faculty, day)
            .into_iter()
            .flat_map(|s| s.iter().copied())
    }

    /// Slots the room holds on `day`, ascending.
    pub fn room_slots(&self, room: &str, day: usize) -> impl Iterator<Item = usize> + '_ {
        occupied(&self.rooms, room, day)
            .into_iter()
            .flat_map(|s| s.iter().copied())
    }

    /// Marks a committed run for both the instructor and the room.
    pub fn mark(&mut self, faculty: &str, room: &str, day: usize, slots: &[usize]) {
        let f = self
            .faculty
            .entry(faculty.to_string())
            .or_default()
            .entry(day)
            .or_default();
        f.extend(slots.iter().copied());

        let r = self
            .rooms
            .entry(room.to_string())
            .or_default()
            .entry(day)
            .or_default();
        r.extend(slots.iter().copied());
    }

    /// Occupied (day, slot) pairs per room.
    pub fn room_occupancy(&self) -> BTreeMap<String, usize> {
        self.rooms
            .iter()
            .map(|(room, days)| (room.clone(), days.values().map(BTreeSet::len).sum()))
            .collect()
    }

    /// Instructors with at least one committed slot.
    pub fn faculty_names(&self) -> impl Iterator<Item = &str> {
        self.faculty.keys().map(String::as_str)
    }
}

fn occupied<'a>(
    map: &'a BTreeMap<String, DayOccupancy>,
    key: &str,
    day: usize,
) -> Option<&'a BTreeSet<usize>> {
    map.get(key).and_then(|days| days.get(&day))
}

/// Course code → room, fixed for the lifetime of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoomBindings {
    bindings: BTreeMap<String, String>,
}

impl RoomBindings {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Room bound to a course, if any.
    pub fn get(&self, course_code: &str) -> Option<&str> {
        self.bindings.get(course_code).map(String::as_str)
    }

    /// Binds a course to a room. An existing binding is kept.
    ///
    /// Returns the room the course is bound to after the call.
    pub fn bind(&mut self, course_code: &str, room: &str) -> &str {
        self.bindings
            .entry(course_code.to_string())
            .or_insert_with(|| room.to_string())
    }

    /// All bindings, ordered by course code.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(c, r)| (c.as_str(), r.as_str()))
    }

    /// Number of bound courses.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no course is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ledger() {
        let ledger = OccupancyLedger::new();
        assert!(!ledger.is_faculty_busy("Dr. A", 0, 1));
        assert!(ledger.is_room_free_for("C101", 0, &[1, 2]));
        assert_eq!(ledger.faculty_slots("Dr. A", 0).count(), 0);
    }

    #[test]
    fn test_mark_is_per_day() {
        let mut ledger = OccupancyLedger::new();
        ledger.mark("Dr. A", "C101", 0, &[4, 5, 6]);

        assert!(ledger.is_faculty_busy("Dr. A", 0, 5));
        assert!(!ledger.is_faculty_busy("Dr. A", 1, 5));
        assert!(ledger.is_room_busy("C101", 0, 4));
        assert!(!ledger.is_room_free_for("C101", 0, &[6, 7]));
        assert!(ledger.is_room_free_for("C101", 0, &[7, 8]));
        assert!(ledger.is_room_free_for("C102", 0, &[4]));
        assert_eq!(ledger.faculty_slots("Dr. A", 0).collect::<Vec<_>>(), vec![4, 5, 6]);
    }

    #[test]
    fn test_room_occupancy_counts() {
        let mut ledger = OccupancyLedger::new();
        ledger.mark("Dr. A", "C101", 0, &[1, 2]);
        ledger.mark("Dr. B", "C101", 3, &[12]);
        ledger.mark("Dr. B", "L1", 2, &[12, 13]);
        let counts = ledger.room_occupancy();
        assert_eq!(counts["C101"], 3);
        assert_eq!(counts["L1"], 2);
        assert_eq!(ledger.faculty_names().collect::<Vec<_>>(), vec!["Dr. A", "Dr. B"]);
    }

    #[test]
    fn test_binding_is_permanent() {
        let mut bindings = RoomBindings::new();
        assert!(bindings.is_empty());
        assert_eq!(bindings.bind("CS101", "C101"), "C101");
        assert_eq!(bindings.bind("CS101", "C205"), "C101");
        assert_eq!(bindings.get("CS101"), Some("C101"));
        assert_eq!(bindings.get("CS102"), None);
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn test_bindings_serialize_as_map() {
        let mut bindings = RoomBindings::new();
        bindings.bind("CS101", "C101");
        let json = serde_json::to_string(&bindings).unwrap();
        assert_eq!(json, r#"{"CS101":"C101"}"#);
    }
}
