//! Section scheduler.
//!
//! Orders one section's courses with the priority policy, then places
//! every required session with a bounded number of randomized attempts.
//! An attempt is one random day plus a shuffled order of every start
//! slot; the first start that yields a [`Placement`] wins.
//!
//! Sessions of a course are placed lectures first, then tutorials, labs
//! and self-study. A session that exhausts its budget is recorded as an
//! [`UnscheduledComponent`] and scheduling moves on.

use tracing::{debug, warn};

use super::candidates::CandidateSource;
use super::ledger::{OccupancyLedger, RoomBindings};
use super::placement::{Placement, PlacementEngine, PlacementError, PlacementState, SessionRequest};
use crate::config::SessionTable;
use crate::dispatching::RuleEngine;
use crate::models::{
    Course, FailureCause, Section, SessionType, TimetableGrid, UnscheduledComponent,
};

/// Result of scheduling one section.
#[derive(Debug, Clone)]
pub struct SectionOutcome {
    /// The section's populated grid.
    pub grid: TimetableGrid,
    /// Sessions that could not be placed.
    pub unscheduled: Vec<UnscheduledComponent>,
}

/// Drives the placement engine over the courses of one section.
#[derive(Debug, Clone)]
pub struct SectionScheduler<'a> {
    engine: PlacementEngine<'a>,
    policy: RuleEngine,
    session_minutes: SessionTable<i64>,
    attempt_budgets: SessionTable<u32>,
}

impl<'a> SectionScheduler<'a> {
    /// Creates a scheduler with the default section policy.
    pub fn new(
        engine: PlacementEngine<'a>,
        session_minutes: SessionTable<i64>,
        attempt_budgets: SessionTable<u32>,
    ) -> Self {
        Self {
            engine,
            policy: RuleEngine::section_policy(),
            session_minutes,
            attempt_budgets,
        }
    }

    /// Schedules every session of `courses` into a fresh grid for `section`.
    pub fn schedule(
        &self,
        section: &Section,
        courses: &[Course],
        ledger: &mut OccupancyLedger,
        bindings: &mut RoomBindings,
        candidates: &mut dyn CandidateSource,
    ) -> SectionOutcome {
        let calendar = self.engine.calendar();
        let mut grid = TimetableGrid::new(
            section.clone(),
            calendar.day_count(),
            calendar.slot_count(),
        );
        let mut unscheduled = Vec::new();

        let order = self.policy.sort(courses);
        debug!(
            section = %section,
            courses = order.len(),
            policy = ?self.policy,
            "scheduling section"
        );

        let mut state = PlacementState {
            grid: &mut grid,
            ledger,
            bindings,
        };

        for course in order {
            for session_type in SessionType::ALL {
                for _ in 0..course.sessions.get(session_type) {
                    let placed = self.place_session(&mut state, course, session_type, candidates);
                    if let Err(cause) = placed {
                        let record =
                            UnscheduledComponent::new(course, section, session_type, cause);
                        warn!(
                            section = %section,
                            course = %course.code,
                            faculty = %course.faculty,
                            session = %session_type,
                            reason = %record.reason,
                            "session not scheduled"
                        );
                        unscheduled.push(record);
                    }
                }
            }
        }

        SectionOutcome { grid, unscheduled }
    }

    /// Places one session, retrying up to the session type's budget.
    ///
    /// Fails immediately when the room category has no rooms.
    pub fn place_session(
        &self,
        state: &mut PlacementState<'_>,
        course: &Course,
        session_type: SessionType,
        candidates: &mut dyn CandidateSource,
    ) -> Result<Placement, FailureCause> {
        let calendar = self.engine.calendar();
        let minutes = self.session_minutes.get(session_type);
        let request = SessionRequest::for_course(course, session_type, minutes);
        let budget = self.attempt_budgets.get(session_type);

        for _ in 0..budget {
            let day = candidates.pick_day(calendar.day_count());
            for start in candidates.start_order(calendar.slot_count()) {
                match self.engine.try_place(
                    state.grid,
                    state.ledger,
                    state.bindings,
                    &request,
                    day,
                    start,
                    candidates,
                ) {
                    Ok(placement) => {
                        self.engine.commit(state, course, session_type, &placement);
                        return Ok(placement);
                    }
                    Err(PlacementError::NoRoomsOfCategory(category)) => {
                        warn!(
                            course = %course.code,
                            %category,
                            "no rooms of required category, skipping retries"
                        );
                        return Err(FailureCause::NoRoomsOfCategory { category });
                    }
                    Err(_) => continue,
                }
            }
        }

        Err(FailureCause::AttemptsExhausted { attempts: budget })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::models::{Room, RoomPool, SessionCounts, SlotCalendar};
    use std::collections::VecDeque;

    /// Replays scripted days; starts are tried in index order.
    struct Scripted {
        days: VecDeque<usize>,
    }

    impl Scripted {
        fn new(days: &[usize]) -> Self {
            Self {
                days: days.iter().copied().collect(),
            }
        }
    }

    impl CandidateSource for Scripted {
        fn pick_day(&mut self, _day_count: usize) -> usize {
            self.days.pop_front().unwrap_or(0)
        }
        fn start_order(&mut self, slot_count: usize) -> Vec<usize> {
            (0..slot_count).collect()
        }
        fn shuffle_rooms(&mut self, _rooms: &mut [&str]) {}
    }

    fn calendar() -> SlotCalendar {
        GeneratorConfig::default().calendar().unwrap()
    }

    fn scheduler<'a>(calendar: &'a SlotCalendar, rooms: &'a RoomPool) -> SectionScheduler<'a> {
        let config = GeneratorConfig::default();
        SectionScheduler::new(
            PlacementEngine::new(calendar, rooms, config.min_faculty_gap_minutes),
            config.session_minutes,
            config.attempt_budgets,
        )
    }

    fn course(code: &str, faculty: &str, counts: SessionCounts) -> Course {
        Course::new("CSE", 3, code)
            .with_name(code)
            .with_faculty(faculty)
            .with_sessions(counts)
    }

    #[test]
    fn test_places_all_sessions_in_bound_room() {
        let cal = calendar();
        let rooms = RoomPool::new(vec![Room::lecture("C101"), Room::lecture("C102")]);
        let section = Section::new("CSE", 3, 0, 1);
        let courses = vec![course("CS301", "Dr. A", SessionCounts::new(2, 1, 0, 1))];

        let mut ledger = OccupancyLedger::new();
        let mut bindings = RoomBindings::new();
        let outcome = scheduler(&cal, &rooms).schedule(
            &section,
            &courses,
            &mut ledger,
            &mut bindings,
            &mut Scripted::new(&[0, 1, 2, 3]),
        );

        assert!(outcome.unscheduled.is_empty());
        let sessions = outcome.grid.sessions();
        assert_eq!(sessions.len(), 4);
        assert!(sessions.iter().all(|s| s.head.room == "C101"));
        assert_eq!(bindings.get("CS301"), Some("C101"));
        // one session per scripted day, first feasible start
        assert_eq!(sessions[0].day, 0);
        assert_eq!(sessions[0].start_slot, 1);
    }

    #[test]
    fn test_missing_lab_rooms_fail_fast() {
        let cal = calendar();
        let rooms = RoomPool::new(vec![Room::lecture("C101")]);
        let section = Section::new("CSE", 3, 0, 1);
        let courses = vec![course("CS150", "Dr. L", SessionCounts::new(0, 0, 1, 0))];

        let mut ledger = OccupancyLedger::new();
        let mut bindings = RoomBindings::new();
        let outcome = scheduler(&cal, &rooms).schedule(
            &section,
            &courses,
            &mut ledger,
            &mut bindings,
            &mut Scripted::new(&[]),
        );

        assert_eq!(outcome.unscheduled.len(), 1);
        let record = &outcome.unscheduled[0];
        assert_eq!(record.session_type, SessionType::Lab);
        assert!(record.reason.starts_with("Lab not scheduled"));
        assert_eq!(
            record.cause,
            FailureCause::NoRoomsOfCategory {
                category: crate::models::RoomCategory::ComputerLab
            }
        );
        assert_eq!(outcome.grid.occupied_cells(), 0);
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_exhausted_budget_recorded_and_scheduling_continues() {
        let cal = calendar();
        let rooms = RoomPool::new(vec![Room::lecture("C101")]);
        let section = Section::new("CSE", 3, 0, 1);
        // Dr. A teaches the whole week elsewhere.
        let mut ledger = OccupancyLedger::new();
        for day in 0..5 {
            ledger.mark("Dr. A", "X1", day, &(0..20).collect::<Vec<_>>());
        }
        let courses = vec![
            course("CS301", "Dr. A", SessionCounts::new(1, 0, 0, 0)),
            course("CS302", "Dr. B", SessionCounts::new(1, 0, 0, 0)),
        ];
        let mut bindings = RoomBindings::new();
        let config = GeneratorConfig::default();
        let mut budgets = config.attempt_budgets;
        budgets.lecture = 3;
        let scheduler = SectionScheduler::new(
            PlacementEngine::new(&cal, &rooms, 180),
            config.session_minutes,
            budgets,
        );

        let outcome = scheduler.schedule(
            &section,
            &courses,
            &mut ledger,
            &mut bindings,
            &mut Scripted::new(&[]),
        );

        assert_eq!(outcome.unscheduled.len(), 1);
        assert_eq!(outcome.unscheduled[0].code, "CS301");
        assert_eq!(outcome.unscheduled[0].reason, "Lecture not scheduled");
        assert_eq!(
            outcome.unscheduled[0].cause,
            FailureCause::AttemptsExhausted { attempts: 3 }
        );
        assert_eq!(outcome.grid.sessions().len(), 1);
    }

    #[test]
    fn test_electives_claim_slots_first() {
        let cal = calendar();
        let rooms = RoomPool::new(vec![Room::lecture("C101"), Room::lecture("C102")]);
        let section = Section::new("CSE", 3, 0, 1);
        let courses = vec![
            course("CS301", "Dr. A", SessionCounts::new(3, 1, 0, 0)),
            course("OE101", "Dr. B", SessionCounts::new(1, 0, 0, 0)).with_elective(true),
        ];

        let mut ledger = OccupancyLedger::new();
        let mut bindings = RoomBindings::new();
        let outcome = scheduler(&cal, &rooms).schedule(
            &section,
            &courses,
            &mut ledger,
            &mut bindings,
            &mut Scripted::new(&[0; 8]),
        );

        let first = &outcome.grid.sessions()[0];
        assert_eq!(first.head.course_code, "OE101");
        assert_eq!((first.day, first.start_slot), (0, 1));
        assert_eq!(bindings.get("OE101"), Some("C101"));
    }
}
