//! Post-run invariant audit.
//!
//! Re-reads the grids of a finished run and reports every broken hard
//! rule as a [`Violation`]. A sound run yields no violations. The audit
//! is independent of the ledger: it trusts only what the grids show.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::GeneratorConfig;
use crate::models::SlotCalendar;
use crate::scheduler::GenerationResult;

/// A broken hard rule found in a generated timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity (faculty, room, course code or section label).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of timetable violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// An instructor holds one slot twice.
    FacultyDoubleBooked,
    /// A room holds one slot twice.
    RoomDoubleBooked,
    /// A course is taught in more than one room.
    RoomBindingBroken,
    /// A session sits on a break or minor slot.
    UnassignableSlot,
    /// Two session starts of one instructor are closer than the minimum gap.
    FacultyGap,
}

impl Violation {
    fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
        severity: i32,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
            severity,
        }
    }

    /// Creates a faculty double-booking violation.
    pub fn faculty_double_booked(faculty: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::FacultyDoubleBooked, faculty, message, 100)
    }

    /// Creates a room double-booking violation.
    pub fn room_double_booked(room: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::RoomDoubleBooked, room, message, 100)
    }

    /// Creates a broken room binding violation.
    pub fn room_binding_broken(course: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::RoomBindingBroken, course, message, 80)
    }

    /// Creates an unassignable slot violation.
    pub fn unassignable_slot(section: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::UnassignableSlot, section, message, 90)
    }

    /// Creates a faculty gap violation.
    pub fn faculty_gap(faculty: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::FacultyGap, faculty, message, 60)
    }
}

/// One session as seen by the audit.
struct Seen<'a> {
    section: String,
    day: usize,
    slots: std::ops::Range<usize>,
    code: &'a str,
    faculty: &'a str,
    room: &'a str,
}

/// Checks a finished run against every hard timetable rule.
pub fn audit(
    result: &GenerationResult,
    calendar: &SlotCalendar,
    config: &GeneratorConfig,
) -> Vec<Violation> {
    let sessions: Vec<Seen<'_>> = result
        .grids
        .iter()
        .flat_map(|grid| {
            let label = grid.section().label();
            grid.sessions().into_iter().map(move |s| Seen {
                section: label.clone(),
                day: s.day,
                slots: s.slot_indices(),
                code: &s.head.course_code,
                faculty: &s.head.faculty,
                room: &s.head.room,
            })
        })
        .collect();

    let mut violations = Vec::new();
    check_exclusive(&sessions, |s| s.faculty, &mut violations, |f, m| {
        Violation::faculty_double_booked(f, m)
    });
    check_exclusive(&sessions, |s| s.room, &mut violations, |r, m| {
        Violation::room_double_booked(r, m)
    });
    check_bindings(result, &sessions, &mut violations);
    check_slots(calendar, &sessions, &mut violations);
    check_gaps(calendar, config.min_faculty_gap_minutes, &sessions, &mut violations);
    violations
}

fn check_exclusive<'a>(
    sessions: &[Seen<'a>],
    key: impl Fn(&Seen<'a>) -> &'a str,
    violations: &mut Vec<Violation>,
    make: fn(String, String) -> Violation,
) {
    let mut owner: BTreeMap<(&str, usize, usize), &Seen<'_>> = BTreeMap::new();
    for s in sessions {
        for slot in s.slots.clone() {
            if let Some(prev) = owner.insert((key(s), s.day, slot), s) {
                violations.push(make(
                    key(s).to_string(),
                    format!(
                        "{} ({}) and {} ({}) both hold day {} slot {}",
                        prev.code, prev.section, s.code, s.section, s.day, slot
                    ),
                ));
            }
        }
    }
}

fn check_bindings(
    result: &GenerationResult,
    sessions: &[Seen<'_>],
    violations: &mut Vec<Violation>,
) {
    let mut rooms: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for s in sessions {
        rooms.entry(s.code).or_default().insert(s.room);
    }
    for (code, used) in rooms {
        let bound = result.bindings.get(code);
        if used.len() > 1 || bound.is_some_and(|b| !used.contains(b)) {
            violations.push(Violation::room_binding_broken(
                code,
                format!(
                    "{code} is bound to {} but taught in {:?}",
                    bound.unwrap_or("nothing"),
                    used
                ),
            ));
        }
    }
}

fn check_slots(calendar: &SlotCalendar, sessions: &[Seen<'_>], violations: &mut Vec<Violation>) {
    for s in sessions {
        for slot in s.slots.clone().filter(|&i| !calendar.is_assignable(i)) {
            violations.push(Violation::unassignable_slot(
                s.section.clone(),
                format!("{} occupies break or minor slot {} on day {}", s.code, slot, s.day),
            ));
        }
    }
}

fn check_gaps(
    calendar: &SlotCalendar,
    min_gap: i64,
    sessions: &[Seen<'_>],
    violations: &mut Vec<Violation>,
) {
    let mut starts: BTreeMap<(&str, usize), Vec<(i64, &str)>> = BTreeMap::new();
    for s in sessions {
        if let Some(minutes) = calendar.start_minutes(s.slots.start) {
            starts.entry((s.faculty, s.day)).or_default().push((minutes, s.code));
        }
    }
    for ((faculty, day), mut list) in starts {
        list.sort_unstable();
        for pair in list.windows(2) {
            let gap = pair[1].0 - pair[0].0;
            if gap < min_gap {
                violations.push(Violation::faculty_gap(
                    faculty,
                    format!(
                        "{} and {} start {} minutes apart on day {}",
                        pair[0].1, pair[1].1, gap, day
                    ),
                ));
            }
        }
    }
}
