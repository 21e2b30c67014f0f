//! Single-session placement.
//!
//! # Algorithm
//!
//! For a (day, start slot) candidate:
//! 1. Fail fast if no room of the required category exists.
//! 2. Walk forward from the start slot, accumulating slot minutes until
//!    the session length is covered. Any break or minor slot, any slot
//!    already filled in the section grid, or any slot the instructor
//!    holds elsewhere rejects the whole candidate. Runs are never split.
//! 3. Reject the candidate if another session of the same instructor
//!    starts within the minimum gap on that day.
//! 4. Resolve a room: the course's bound room if it is free for the whole
//!    run, otherwise (first placement only) the first free room of the
//!    category in shuffled order.
//!
//! A successful [`Placement`] is applied with [`PlacementEngine::commit`],
//! which writes the grid, the ledger and the binding together.

use thiserror::Error;
use tracing::trace;

use super::candidates::CandidateSource;
use super::ledger::{OccupancyLedger, RoomBindings};
use crate::models::{
    Course, RoomCategory, RoomPool, SessionHead, SessionType, SlotCalendar, TimetableGrid,
};

/// Why a placement candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// The category has no rooms at all. Retrying cannot help.
    #[error("no {0} rooms configured")]
    NoRoomsOfCategory(RoomCategory),

    /// The run hit a break or minor slot.
    #[error("slot {slot} is a break or minor slot")]
    UnassignableSlot {
        /// Offending slot.
        slot: usize,
    },

    /// The run hit a slot already filled in the section grid.
    #[error("slot {slot} is already filled in the section grid")]
    GridOccupied {
        /// Offending slot.
        slot: usize,
    },

    /// The instructor already holds a slot of the run.
    #[error("{faculty} is busy at slot {slot}")]
    FacultyBusy {
        /// Instructor.
        faculty: String,
        /// Offending slot.
        slot: usize,
    },

    /// Another session of the instructor starts too close.
    #[error("{faculty} already starts a session within {gap_minutes} minutes")]
    FacultyGap {
        /// Instructor.
        faculty: String,
        /// Required gap.
        gap_minutes: i64,
    },

    /// The day ran out of slots before the session length was covered.
    #[error("only {available} of {required} minutes available from the start slot")]
    InsufficientMinutes {
        /// Minutes collected.
        available: i64,
        /// Minutes needed.
        required: i64,
    },

    /// Neither the bound room nor any pool room is free for the run.
    #[error("no {0} room free for the whole run")]
    RoomUnavailable(RoomCategory),
}

impl PlacementError {
    /// Whether every further attempt would fail the same way.
    pub fn is_systemic(&self) -> bool {
        matches!(self, PlacementError::NoRoomsOfCategory(_))
    }
}

/// One session to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRequest<'a> {
    /// Course code (binding key).
    pub course_code: &'a str,
    /// Instructor.
    pub faculty: &'a str,
    /// Session kind.
    pub session_type: SessionType,
    /// Minutes the run must cover.
    pub required_minutes: i64,
    /// Room category.
    pub room_category: RoomCategory,
}

impl<'a> SessionRequest<'a> {
    /// Request for one session of a course.
    pub fn for_course(
        course: &'a Course,
        session_type: SessionType,
        required_minutes: i64,
    ) -> Self {
        Self {
            course_code: &course.code,
            faculty: &course.faculty,
            session_type,
            required_minutes,
            room_category: course.room_category,
        }
    }
}

/// An accepted candidate, not yet committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Day index.
    pub day: usize,
    /// Contiguous slot indices, first slot first.
    pub slots: Vec<usize>,
    /// Room the run is held in.
    pub room: String,
}

impl Placement {
    /// First slot of the run.
    pub fn start_slot(&self) -> Option<usize> {
        self.slots.first().copied()
    }
}

/// Mutable run state a placement reads and writes.
#[derive(Debug)]
pub struct PlacementState<'s> {
    /// Grid of the section being scheduled.
    pub grid: &'s mut TimetableGrid,
    /// Run-wide occupancy.
    pub ledger: &'s mut OccupancyLedger,
    /// Run-wide course → room table.
    pub bindings: &'s mut RoomBindings,
}

/// Checks and commits single-session placements.
#[derive(Debug, Clone, Copy)]
pub struct PlacementEngine<'a> {
    calendar: &'a SlotCalendar,
    rooms: &'a RoomPool,
    min_gap_minutes: i64,
}

impl<'a> PlacementEngine<'a> {
    /// Creates an engine over a calendar and room pool.
    pub fn new(calendar: &'a SlotCalendar, rooms: &'a RoomPool, min_gap_minutes: i64) -> Self {
        Self {
            calendar,
            rooms,
            min_gap_minutes,
        }
    }

    /// Calendar in use.
    pub fn calendar(&self) -> &SlotCalendar {
        self.calendar
    }

    /// Evaluates one (day, start slot) candidate without mutating anything.
    #[allow(clippy::too_many_arguments)]
    pub fn try_place(
        &self,
        grid: &TimetableGrid,
        ledger: &OccupancyLedger,
        bindings: &RoomBindings,
        request: &SessionRequest<'_>,
        day: usize,
        start: usize,
        candidates: &mut dyn CandidateSource,
    ) -> Result<Placement, PlacementError> {
        if !self.rooms.has_category(request.room_category) {
            return Err(PlacementError::NoRoomsOfCategory(request.room_category));
        }

        let slots = self.collect_run(grid, ledger, request, day, start)?;

        if !self.check_faculty_availability(ledger, request.faculty, day, start) {
            return Err(PlacementError::FacultyGap {
                faculty: request.faculty.to_string(),
                gap_minutes: self.min_gap_minutes,
            });
        }

        let room = self
            .resolve_room(ledger, bindings, request, day, &slots, candidates)
            .ok_or(PlacementError::RoomUnavailable(request.room_category))?;

        Ok(Placement { day, slots, room })
    }

    /// Whether `start` on `day` keeps the minimum gap to every slot the
    /// instructor already holds that day.
    pub fn check_faculty_availability(
        &self,
        ledger: &OccupancyLedger,
        faculty: &str,
        day: usize,
        start: usize,
    ) -> bool {
        let Some(new_start) = self.calendar.start_minutes(start) else {
            return false;
        };
        ledger.faculty_slots(faculty, day).all(|held| {
            self.calendar
                .start_minutes(held)
                .map_or(true, |m| (m - new_start).abs() >= self.min_gap_minutes)
        })
    }

    /// Applies an accepted placement to the grid, the ledger and the
    /// binding table.
    pub fn commit(
        &self,
        state: &mut PlacementState<'_>,
        course: &Course,
        session_type: SessionType,
        placement: &Placement,
    ) {
        state.grid.occupy(
            placement.day,
            &placement.slots,
            SessionHead {
                session_type,
                course_code: course.code.clone(),
                course_name: course.name.clone(),
                faculty: course.faculty.clone(),
                room: placement.room.clone(),
            },
        );
        state
            .ledger
            .mark(&course.faculty, &placement.room, placement.day, &placement.slots);
        state.bindings.bind(&course.code, &placement.room);

        trace!(
            course = %course.code,
            session = %session_type,
            day = placement.day,
            slots = ?placement.slots,
            room = %placement.room,
            "session placed"
        );
    }

    fn collect_run(
        &self,
        grid: &TimetableGrid,
        ledger: &OccupancyLedger,
        request: &SessionRequest<'_>,
        day: usize,
        start: usize,
    ) -> Result<Vec<usize>, PlacementError> {
        let mut slots = Vec::new();
        let mut accumulated = 0;
        let mut index = start;

        while accumulated < request.required_minutes && index < self.calendar.slot_count() {
            if !self.calendar.is_assignable(index) {
                return Err(PlacementError::UnassignableSlot { slot: index });
            }
            if !grid.is_free(day, index) {
                return Err(PlacementError::GridOccupied { slot: index });
            }
            if ledger.is_faculty_busy(request.faculty, day, index) {
                return Err(PlacementError::FacultyBusy {
                    faculty: request.faculty.to_string(),
                    slot: index,
                });
            }
            slots.push(index);
            accumulated += self.calendar.duration_minutes(index);
            index += 1;
        }

        if accumulated < request.required_minutes {
            return Err(PlacementError::InsufficientMinutes {
                available: accumulated,
                required: request.required_minutes,
            });
        }
        Ok(slots)
    }

    fn resolve_room(
        &self,
        ledger: &OccupancyLedger,
        bindings: &RoomBindings,
        request: &SessionRequest<'_>,
        day: usize,
        slots: &[usize],
        candidates: &mut dyn CandidateSource,
    ) -> Option<String> {
        if let Some(bound) = bindings.get(request.course_code) {
            return ledger
                .is_room_free_for(bound, day, slots)
                .then(|| bound.to_string());
        }

        let mut pool = self.rooms.ids_in(request.room_category);
        candidates.shuffle_rooms(&mut pool);
        pool.into_iter()
            .find(|room| ledger.is_room_free_for(room, day, slots))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::models::{Room, Section, SessionCounts};

    /// Candidate source that never reorders.
    struct InOrder;

    impl CandidateSource for InOrder {
        fn pick_day(&mut self, _day_count: usize) -> usize {
            0
        }
        fn start_order(&mut self, slot_count: usize) -> Vec<usize> {
            (0..slot_count).collect()
        }
        fn shuffle_rooms(&mut self, _rooms: &mut [&str]) {}
    }

    struct Fixture {
        calendar: SlotCalendar,
        rooms: RoomPool,
        grid: TimetableGrid,
        ledger: OccupancyLedger,
        bindings: RoomBindings,
    }

    impl Fixture {
        fn new(rooms: RoomPool) -> Self {
            let calendar = GeneratorConfig::default().calendar().unwrap();
            let grid = TimetableGrid::new(Section::new("CSE", 3, 0, 1), 5, calendar.slot_count());
            Self {
                calendar,
                rooms,
                grid,
                ledger: OccupancyLedger::new(),
                bindings: RoomBindings::new(),
            }
        }

        fn engine(&self) -> PlacementEngine<'_> {
            PlacementEngine::new(&self.calendar, &self.rooms, 180)
        }

        fn try_place(
            &self,
            course: &Course,
            ty: SessionType,
            minutes: i64,
            day: usize,
            start: usize,
        ) -> Result<Placement, PlacementError> {
            let request = SessionRequest::for_course(course, ty, minutes);
            self.engine().try_place(
                &self.grid,
                &self.ledger,
                &self.bindings,
                &request,
                day,
                start,
                &mut InOrder,
            )
        }

        fn commit(&mut self, course: &Course, ty: SessionType, placement: &Placement) {
            let engine = PlacementEngine::new(&self.calendar, &self.rooms, 180);
            let mut state = PlacementState {
                grid: &mut self.grid,
                ledger: &mut self.ledger,
                bindings: &mut self.bindings,
            };
            engine.commit(&mut state, course, ty, placement);
        }
    }

    fn lecture_rooms() -> RoomPool {
        RoomPool::new(vec![Room::lecture("C101"), Room::lecture("C102")])
    }

    fn course(code: &str, faculty: &str) -> Course {
        Course::new("CSE", 3, code)
            .with_name(format!("{code} name"))
            .with_faculty(faculty)
            .with_sessions(SessionCounts::new(2, 1, 0, 0))
    }

    #[test]
    fn test_lecture_run_covers_ninety_minutes() {
        let fx = Fixture::new(lecture_rooms());
        let c = course("CS101", "Dr. A");
        // 09:00-10:00 + 10:00-10:30 = 90
        let p = fx.try_place(&c, SessionType::Lecture, 90, 0, 1).unwrap();
        assert_eq!(p.slots, vec![1, 2]);
        assert_eq!(p.room, "C101");
        assert_eq!(p.start_slot(), Some(1));
    }

    #[test]
    fn test_run_spans_afternoon_gap() {
        let fx = Fixture::new(lecture_rooms());
        let c = course("CS101", "Dr. A");
        // 15:30-15:40 (10) + 16:00-16:30 (30) + 16:30-17:10 (40) + 17:10-17:30 (20)
        let p = fx.try_place(&c, SessionType::Lecture, 90, 0, 14).unwrap();
        assert_eq!(p.slots, vec![14, 15, 16, 17]);
    }

    #[test]
    fn test_break_and_minor_slots_rejected() {
        let fx = Fixture::new(lecture_rooms());
        let c = course("CS101", "Dr. A");
        assert_eq!(
            fx.try_place(&c, SessionType::Lecture, 90, 0, 0),
            Err(PlacementError::UnassignableSlot { slot: 0 })
        );
        // 10:00-10:30 then the 10:30 break
        assert_eq!(
            fx.try_place(&c, SessionType::Lecture, 90, 0, 2),
            Err(PlacementError::UnassignableSlot { slot: 3 })
        );
        assert_eq!(
            fx.try_place(&c, SessionType::Tutorial, 60, 0, 19),
            Err(PlacementError::UnassignableSlot { slot: 19 })
        );
    }

    #[test]
    fn test_grid_conflict_rejected() {
        let mut fx = Fixture::new(lecture_rooms());
        let a = course("CS101", "Dr. A");
        let b = course("CS102", "Dr. B");
        let p = fx.try_place(&a, SessionType::Lecture, 90, 0, 1).unwrap();
        fx.commit(&a, SessionType::Lecture, &p);

        assert_eq!(
            fx.try_place(&b, SessionType::Lecture, 90, 0, 2),
            Err(PlacementError::GridOccupied { slot: 2 })
        );
    }

    #[test]
    fn test_faculty_busy_in_other_section() {
        let mut fx = Fixture::new(lecture_rooms());
        fx.ledger.mark("Dr. A", "C999", 0, &[5, 6]);
        let c = course("CS101", "Dr. A");
        assert!(matches!(
            fx.try_place(&c, SessionType::Lecture, 90, 0, 4),
            Err(PlacementError::FacultyBusy { slot: 5, .. })
        ));
    }

    #[test]
    fn test_faculty_gap_rejects_nearby_start() {
        let mut fx = Fixture::new(lecture_rooms());
        // Dr. A holds Monday slot 10 (13:15).
        fx.ledger.mark("Dr. A", "C999", 0, &[10]);
        let c = course("CS101", "Dr. A");

        // 14:00 is 45 minutes after 13:15.
        assert!(matches!(
            fx.try_place(&c, SessionType::Tutorial, 60, 0, 12),
            Err(PlacementError::FacultyGap { gap_minutes: 180, .. })
        ));
        // 09:00 is 255 minutes before 13:15, far enough.
        assert!(fx.try_place(&c, SessionType::Tutorial, 60, 0, 1).is_ok());
        // 16:30 is exactly 195 minutes after 13:15.
        assert!(fx.try_place(&c, SessionType::Tutorial, 60, 0, 16).is_ok());
        // Another day is unaffected.
        assert!(fx.try_place(&c, SessionType::Tutorial, 60, 1, 12).is_ok());
    }

    #[test]
    fn test_check_faculty_availability_boundary() {
        let mut fx = Fixture::new(lecture_rooms());
        fx.ledger.mark("Dr. A", "C101", 0, &[1]); // 09:00
        let engine = fx.engine();
        // 12:00 is exactly 180 minutes later.
        assert!(engine.check_faculty_availability(&fx.ledger, "Dr. A", 0, 7));
        // 11:30 is 150 minutes later.
        assert!(!engine.check_faculty_availability(&fx.ledger, "Dr. A", 0, 6));
        assert!(engine.check_faculty_availability(&fx.ledger, "Dr. B", 0, 6));
        assert!(!engine.check_faculty_availability(&fx.ledger, "Dr. B", 0, 99));
    }

    #[test]
    fn test_insufficient_minutes_at_day_end() {
        let fx = Fixture::new(lecture_rooms());
        let c = course("CS101", "Dr. A");
        // 17:30-18:30 is 60 minutes, then the minor slot.
        assert_eq!(
            fx.try_place(&c, SessionType::Lecture, 90, 0, 18),
            Err(PlacementError::UnassignableSlot { slot: 19 })
        );

        let short = SlotCalendar::new(
            vec!["Monday".into()],
            vec![crate::models::TimeWindow::hm(9, 0, 10, 0)],
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        let rooms = lecture_rooms();
        let engine = PlacementEngine::new(&short, &rooms, 180);
        let grid = TimetableGrid::new(Section::new("CSE", 3, 0, 1), 1, 1);
        let request = SessionRequest::for_course(&c, SessionType::Lecture, 90);
        assert_eq!(
            engine.try_place(
                &grid,
                &OccupancyLedger::new(),
                &RoomBindings::new(),
                &request,
                0,
                0,
                &mut InOrder
            ),
            Err(PlacementError::InsufficientMinutes {
                available: 60,
                required: 90
            })
        );
    }

    #[test]
    fn test_no_rooms_of_category_is_systemic() {
        let fx = Fixture::new(lecture_rooms());
        let lab = Course::new("CSE", 3, "CS150")
            .with_faculty("Dr. L")
            .with_sessions(SessionCounts::new(0, 0, 1, 0));
        let err = fx.try_place(&lab, SessionType::Lab, 120, 0, 12).unwrap_err();
        assert_eq!(err, PlacementError::NoRoomsOfCategory(RoomCategory::ComputerLab));
        assert!(err.is_systemic());
        assert!(!PlacementError::RoomUnavailable(RoomCategory::ComputerLab).is_systemic());
    }

    #[test]
    fn test_room_taken_by_other_section_falls_through() {
        let mut fx = Fixture::new(lecture_rooms());
        fx.ledger.mark("Dr. Z", "C101", 0, &[1, 2]);
        let c = course("CS101", "Dr. A");
        let p = fx.try_place(&c, SessionType::Lecture, 90, 0, 1).unwrap();
        assert_eq!(p.room, "C102");

        fx.ledger.mark("Dr. Y", "C102", 0, &[1]);
        assert_eq!(
            fx.try_place(&c, SessionType::Lecture, 90, 0, 1),
            Err(PlacementError::RoomUnavailable(RoomCategory::LectureRoom))
        );
    }

    #[test]
    fn test_binding_reused_after_commit() {
        let mut fx = Fixture::new(lecture_rooms());
        let c = course("CS101", "Dr. A");
        let first = fx.try_place(&c, SessionType::Lecture, 90, 0, 1).unwrap();
        fx.commit(&c, SessionType::Lecture, &first);
        assert_eq!(fx.bindings.get("CS101"), Some("C101"));

        // Bound room busy on Tuesday morning: the session fails even though C102 is free.
        fx.ledger.mark("Dr. Q", "C101", 1, &[1, 2]);
        assert_eq!(
            fx.try_place(&c, SessionType::Lecture, 90, 1, 1),
            Err(PlacementError::RoomUnavailable(RoomCategory::LectureRoom))
        );

        let second = fx.try_place(&c, SessionType::Lecture, 90, 1, 12).unwrap();
        assert_eq!(second.room, "C101");
    }

    #[test]
    fn test_commit_writes_grid_and_ledger() {
        let mut fx = Fixture::new(lecture_rooms());
        let c = course("CS101", "Dr. A");
        let p = fx.try_place(&c, SessionType::Lecture, 90, 2, 12).unwrap();
        fx.commit(&c, SessionType::Lecture, &p);

        assert_eq!(fx.grid.run_length(2, 12), p.slots.len());
        assert!(fx.ledger.is_faculty_busy("Dr. A", 2, 12));
        assert!(!fx.ledger.is_room_free_for("C101", 2, &p.slots));
        let sessions = fx.grid.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].head.faculty, "Dr. A");
        assert_eq!(sessions[0].head.room, "C101");
    }
}
