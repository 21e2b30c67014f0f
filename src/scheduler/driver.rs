//! Generation driver.
//!
//! Walks every (department, semester, section) of the input and runs the
//! section scheduler on each, sharing one occupancy ledger and one
//! binding table for the whole run. Departments are visited in order of
//! first appearance and semesters in ascending order; earlier sections win
//! contested rooms and instructors.

use serde::{Serialize, Serializer};
use tracing::{info, warn};

use super::candidates::{CandidateSource, SeededCandidates};
use super::kpi::TimetableKpi;
use super::ledger::{OccupancyLedger, RoomBindings};
use super::placement::PlacementEngine;
use super::section::SectionScheduler;
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::models::{
    section_count, Course, CourseRecord, RoomPool, Section, SlotCalendar, TimetableGrid,
    UnscheduledComponent,
};
use crate::validation::validate_input;

/// Output of one generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    /// One grid per section, in processing order. Serialized as a map
    /// keyed by section label.
    #[serde(serialize_with = "grids_by_label")]
    pub grids: Vec<TimetableGrid>,
    /// Final course → room table.
    pub bindings: RoomBindings,
    /// Sessions that could not be placed.
    pub unscheduled: Vec<UnscheduledComponent>,
    /// Run metrics.
    pub kpi: TimetableKpi,
    /// Final occupancy.
    #[serde(skip)]
    pub ledger: OccupancyLedger,
}

impl GenerationResult {
    /// Grid of the section with the given label (e.g., `CSE_4_A`).
    pub fn grid(&self, label: &str) -> Option<&TimetableGrid> {
        self.grids.iter().find(|g| g.section().label() == label)
    }

    /// Sections in processing order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.grids.iter().map(TimetableGrid::section)
    }

    /// Whether every requested session was placed.
    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }
}

fn grids_by_label<S: Serializer>(
    grids: &[TimetableGrid],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(grids.iter().map(|g| (g.section().label(), g)))
}

/// Timetable generator for a fixed configuration and room inventory.
///
/// # Example
///
/// ```
/// use u_timetable::config::GeneratorConfig;
/// use u_timetable::models::{Course, Room, RoomPool, SessionCounts};
/// use u_timetable::scheduler::TimetableGenerator;
///
/// let rooms = RoomPool::new(vec![Room::lecture("C101"), Room::lab("L1")]);
/// let courses = vec![
///     Course::new("CSE", 3, "CS301")
///         .with_faculty("Dr. A")
///         .with_sessions(SessionCounts::new(2, 1, 0, 0)),
/// ];
///
/// let config = GeneratorConfig::default().with_seed(7);
/// let generator = TimetableGenerator::new(config, rooms).unwrap();
/// let result = generator.generate(&courses);
/// assert_eq!(result.grids.len(), 1);
/// assert_eq!(result.bindings.get("CS301"), Some("C101"));
/// ```
#[derive(Debug, Clone)]
pub struct TimetableGenerator {
    config: GeneratorConfig,
    calendar: SlotCalendar,
    rooms: RoomPool,
}

impl TimetableGenerator {
    /// Creates a generator, validating the configuration.
    pub fn new(config: GeneratorConfig, rooms: RoomPool) -> Result<Self> {
        config.validate()?;
        let calendar = config.calendar()?;
        Ok(Self {
            config,
            calendar,
            rooms,
        })
    }

    /// Slot calendar in use.
    pub fn calendar(&self) -> &SlotCalendar {
        &self.calendar
    }

    /// Configuration in use.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Room inventory in use.
    pub fn rooms(&self) -> &RoomPool {
        &self.rooms
    }

    /// Normalizes raw records, validates them, then generates.
    ///
    /// Duplicate course codes or room ids abort with
    /// [`Error::InvalidInput`]; other findings are logged and the run
    /// proceeds.
    pub fn generate_records(&self, records: &[CourseRecord]) -> Result<GenerationResult> {
        let courses: Vec<Course> = records
            .iter()
            .map(|r| Course::from_record(r, &self.config.elective_keywords))
            .collect();

        if let Err(errors) = validate_input(&courses, &self.rooms) {
            let (fatal, advisory): (Vec<_>, Vec<_>) =
                errors.into_iter().partition(|e| e.kind.is_fatal());
            for finding in &advisory {
                warn!(kind = ?finding.kind, "{}", finding.message);
            }
            if !fatal.is_empty() {
                return Err(Error::InvalidInput(fatal));
            }
        }

        Ok(self.generate(&courses))
    }

    /// Generates timetables with the configured seed (entropy if unset).
    pub fn generate(&self, courses: &[Course]) -> GenerationResult {
        let mut candidates = SeededCandidates::from_optional_seed(self.config.seed);
        self.generate_with(courses, &mut candidates)
    }

    /// Generates timetables drawing every random choice from `candidates`.
    pub fn generate_with(
        &self,
        courses: &[Course],
        candidates: &mut dyn CandidateSource,
    ) -> GenerationResult {
        let engine = PlacementEngine::new(
            &self.calendar,
            &self.rooms,
            self.config.min_faculty_gap_minutes,
        );
        let scheduler = SectionScheduler::new(
            engine,
            self.config.session_minutes,
            self.config.attempt_budgets,
        );

        let enabled: Vec<&Course> = courses.iter().filter(|c| c.enabled).collect();
        info!(
            courses = enabled.len(),
            skipped = courses.len() - enabled.len(),
            rooms = self.rooms.len(),
            seed = ?self.config.seed,
            "timetable generation started"
        );

        let mut ledger = OccupancyLedger::new();
        let mut bindings = RoomBindings::new();
        let mut grids = Vec::new();
        let mut unscheduled = Vec::new();

        for (department, semester) in group_keys(&enabled) {
            let group: Vec<Course> = enabled
                .iter()
                .filter(|c| c.department == department && c.semester == semester)
                .map(|&c| c.clone())
                .collect();

            let sections = section_count(&self.config.section_rules, &department, semester);
            for index in 0..sections {
                let section = Section::new(department.clone(), semester, index, sections);
                let outcome =
                    scheduler.schedule(&section, &group, &mut ledger, &mut bindings, candidates);
                grids.push(outcome.grid);
                unscheduled.extend(outcome.unscheduled);
            }
        }

        let kpi = TimetableKpi::calculate(&grids, &unscheduled, &ledger);
        info!(
            sections = grids.len(),
            placed = kpi.sessions_placed,
            unscheduled = kpi.sessions_unscheduled,
            "timetable generation finished"
        );

        GenerationResult {
            grids,
            bindings,
            unscheduled,
            kpi,
            ledger,
        }
    }
}

/// (department, semester) pairs: departments by first appearance,
/// semesters ascending within each department.
fn group_keys(courses: &[&Course]) -> Vec<(String, u32)> {
    let mut departments: Vec<&str> = Vec::new();
    for c in courses {
        if !departments.contains(&c.department.as_str()) {
            departments.push(&c.department);
        }
    }

    let mut keys = Vec::new();
    for dept in departments {
        let mut semesters: Vec<u32> = courses
            .iter()
            .filter(|c| c.department == dept)
            .map(|c| c.semester)
            .collect();
        semesters.sort_unstable();
        semesters.dedup();
        keys.extend(semesters.into_iter().map(|s| (dept.to_string(), s)));
    }
    keys
}
