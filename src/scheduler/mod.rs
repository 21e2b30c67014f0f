//! Randomized greedy timetable scheduling.
//!
//! # Components
//!
//! - [`OccupancyLedger`] and [`RoomBindings`]: run-wide room/faculty
//!   occupancy and the permanent course → room table.
//! - [`CandidateSource`]: every random choice (day, start order, room
//!   order), injectable for tests.
//! - [`PlacementEngine`]: checks one (day, start slot) candidate for a
//!   session and commits accepted placements.
//! - [`SectionScheduler`]: orders a section's courses and places every
//!   session with a bounded attempt budget.
//! - [`TimetableGenerator`]: runs all sections against shared state and
//!   yields a [`GenerationResult`].
//! - [`TimetableKpi`]: placement metrics of a run.
//!
//! The search is best-effort. It neither proves infeasibility nor
//! optimizes anything beyond the fixed course ordering.

mod candidates;
mod driver;
mod kpi;
mod ledger;
mod placement;
mod section;

pub use candidates::{CandidateSource, SeededCandidates};
pub use driver::{GenerationResult, TimetableGenerator};
pub use kpi::TimetableKpi;
pub use ledger::{OccupancyLedger, RoomBindings};
pub use placement::{Placement, PlacementEngine, PlacementError, PlacementState, SessionRequest};
pub use section::{SectionOutcome, SectionScheduler};
