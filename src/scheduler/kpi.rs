//! Run quality metrics (KPIs).
//!
//! Computes placement indicators from the grids and failure list of a
//! finished run.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Sessions requested | placed + unscheduled |
//! | Placement rate | placed / requested (1.0 when nothing was requested) |
//! | Room occupancy | occupied (day, slot) pairs per room |
//! | Failures by type | unscheduled count per session type |

use serde::Serialize;
use std::collections::BTreeMap;

use super::ledger::OccupancyLedger;
use crate::models::{SessionType, TimetableGrid, UnscheduledComponent};

/// Timetable performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimetableKpi {
    /// Sessions the courses asked for.
    pub sessions_requested: usize,
    /// Sessions committed to a grid.
    pub sessions_placed: usize,
    /// Sessions recorded as unscheduled.
    pub sessions_unscheduled: usize,
    /// Fraction of requested sessions that were placed (0.0..1.0).
    pub placement_rate: f64,
    /// Occupied (day, slot) pairs per room.
    pub room_occupancy: BTreeMap<String, usize>,
    /// Unscheduled sessions per session type.
    pub failures_by_type: BTreeMap<SessionType, usize>,
}

impl TimetableKpi {
    /// Computes KPIs from a run's grids, failures and ledger.
    pub fn calculate(
        grids: &[TimetableGrid],
        unscheduled: &[UnscheduledComponent],
        ledger: &OccupancyLedger,
    ) -> Self {
        let placed: usize = grids.iter().map(|g| g.sessions().len()).sum();
        let failed = unscheduled.len();
        let requested = placed + failed;

        let mut failures_by_type = BTreeMap::new();
        for record in unscheduled {
            *failures_by_type.entry(record.session_type).or_insert(0) += 1;
        }

        let placement_rate = if requested == 0 {
            1.0
        } else {
            placed as f64 / requested as f64
        };

        Self {
            sessions_requested: requested,
            sessions_placed: placed,
            sessions_unscheduled: failed,
            placement_rate,
            room_occupancy: ledger.room_occupancy(),
            failures_by_type,
        }
    }

    /// Whether the run placed at least `min_rate` of its sessions.
    pub fn meets_threshold(&self, min_rate: f64) -> bool {
        self.placement_rate >= min_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, FailureCause, Section, SessionHead, SessionCounts};

    fn head(code: &str, session_type: SessionType) -> SessionHead {
        SessionHead {
            session_type,
            course_code: code.into(),
            course_name: code.into(),
            faculty: "Dr. A".into(),
            room: "C101".into(),
        }
    }

    fn failure(session_type: SessionType) -> UnscheduledComponent {
        let course = Course::new("CSE", 3, "CS301").with_sessions(SessionCounts::new(1, 1, 1, 0));
        UnscheduledComponent::new(
            &course,
            &Section::new("CSE", 3, 0, 1),
            session_type,
            FailureCause::AttemptsExhausted { attempts: 1 },
        )
    }

    #[test]
    fn test_kpi_basic() {
        let mut grid = TimetableGrid::new(Section::new("CSE", 3, 0, 1), 5, 20);
        grid.occupy(0, &[1, 2], head("CS301", SessionType::Lecture));
        grid.occupy(1, &[1], head("CS301", SessionType::Tutorial));
        let mut ledger = OccupancyLedger::new();
        ledger.mark("Dr. A", "C101", 0, &[1, 2]);
        ledger.mark("Dr. A", "C101", 1, &[1]);

        let unscheduled = vec![failure(SessionType::Lab), failure(SessionType::Lab)];
        let kpi = TimetableKpi::calculate(&[grid], &unscheduled, &ledger);

        assert_eq!(kpi.sessions_requested, 4);
        assert_eq!(kpi.sessions_placed, 2);
        assert_eq!(kpi.sessions_unscheduled, 2);
        assert!((kpi.placement_rate - 0.5).abs() < 1e-10);
        assert_eq!(kpi.room_occupancy["C101"], 3);
        assert_eq!(kpi.failures_by_type[&SessionType::Lab], 2);
        assert!(!kpi.failures_by_type.contains_key(&SessionType::Lecture));
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = TimetableKpi::calculate(&[], &[], &OccupancyLedger::new());
        assert_eq!(kpi.sessions_requested, 0);
        assert!((kpi.placement_rate - 1.0).abs() < 1e-10);
        assert!(kpi.room_occupancy.is_empty());
    }

    #[test]
    fn test_meets_threshold() {
        let unscheduled = vec![failure(SessionType::Tutorial)];
        let kpi = TimetableKpi::calculate(&[], &unscheduled, &OccupancyLedger::new());
        assert!((kpi.placement_rate - 0.0).abs() < 1e-10);
        assert!(kpi.meets_threshold(0.0));
        assert!(!kpi.meets_threshold(0.5));
    }
}
