//! University timetable generation.
//!
//! Assigns lecture, tutorial, lab and self-study sessions of every
//! (department, semester, section) group to slots of a five-day week so
//! that no room or instructor is double-booked and every course keeps one
//! room for the whole term.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `SlotCalendar`, `Room`, `Course`,
//!   `Section`, `TimetableGrid`, `UnscheduledComponent`
//! - **`dispatching`**: Course ordering rules and the `RuleEngine`
//! - **`scheduler`**: Occupancy ledger, placement engine, section
//!   scheduler and the run driver
//! - **`audit`**: Post-run checks of every hard rule
//! - **`validation`**: Input integrity checks (duplicate codes/rooms,
//!   empty courses, missing room categories)
//! - **`config`**: Serde-loadable generator settings
//!
//! # Algorithm
//!
//! Randomized greedy placement with bounded retries. Sessions are placed
//! one at a time as whole contiguous runs; a session whose attempt
//! budget runs out is reported, never forced. Runs are reproducible for
//! a fixed seed.
//!
//! # Logging
//!
//! The crate emits `tracing` events and never installs a subscriber.

pub mod audit;
pub mod config;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{Error, Result};
