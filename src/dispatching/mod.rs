//! Course ordering rules and rule engine.
//!
//! A section's courses are visited in priority order: courses scheduled
//! earlier see emptier grids and ledgers. Ordering is expressed as a
//! chain of rules evaluated by a [`RuleEngine`].
//!
//! # Usage
//!
//! ```
//! use u_timetable::dispatching::{rules, RuleEngine};
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::ElectiveFirst)
//!     .with_rule(rules::Workload)
//!     .with_rule(rules::LabFirst);
//! assert_eq!(engine.rule_names(), RuleEngine::section_policy().rule_names());
//! ```

mod engine;
pub mod rules;

pub use engine::RuleEngine;

use crate::models::Course;
use std::fmt::Debug;

/// Score returned by an ordering rule.
///
/// Lower scores = visited first.
pub type RuleScore = f64;

/// A rule that scores how early a course should be scheduled.
///
/// # Score Convention
/// **Lower score = higher priority.**
pub trait OrderingRule: Send + Sync + Debug {
    /// Rule name (e.g., "ELECTIVE").
    fn name(&self) -> &'static str;

    /// Scores a course. Lower = scheduled earlier.
    fn evaluate(&self, course: &Course) -> RuleScore;
}
