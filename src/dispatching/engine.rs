//! Lexicographic rule chain for course ordering.
//!
//! Each course is scored once per rule; the score vectors are compared
//! rule by rule, so a later rule only decides between courses that tie
//! on every earlier one. Sorting is stable: courses that tie on every
//! rule keep their input order.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{rules, OrderingRule, RuleScore};
use crate::models::Course;

/// Scores closer than this are treated as equal.
const SCORE_EPSILON: f64 = 1e-9;

/// An ordered chain of [`OrderingRule`]s.
///
/// # Example
/// ```
/// use u_timetable::dispatching::{rules, RuleEngine};
/// use u_timetable::models::{Course, SessionCounts};
///
/// let courses = vec![
///     Course::new("CSE", 3, "CS301").with_sessions(SessionCounts::new(2, 0, 0, 0)),
///     Course::new("CSE", 3, "CS302").with_sessions(SessionCounts::new(3, 1, 0, 0)),
/// ];
/// let engine = RuleEngine::new().with_rule(rules::Workload);
/// assert_eq!(engine.sort(&courses)[0].code, "CS302");
/// ```
#[derive(Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn OrderingRule>>,
}

impl RuleEngine {
    /// Creates an empty chain. With no rules, input order is kept.
    pub fn new() -> Self {
        Self::default()
    }

    /// The section visit order: electives first, then heavier weekly
    /// workload first, lab-bearing courses ahead of equal-weight others.
    pub fn section_policy() -> Self {
        Self::new()
            .with_rule(rules::ElectiveFirst)
            .with_rule(rules::Workload)
            .with_rule(rules::LabFirst)
    }

    /// Appends a rule consulted after every rule already in the chain.
    pub fn with_rule<R: OrderingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Indices into `courses`, highest priority first.
    pub fn sort_indices(&self, courses: &[Course]) -> Vec<usize> {
        let keys: Vec<Vec<RuleScore>> = courses.iter().map(|c| self.score(c)).collect();
        let mut indices: Vec<usize> = (0..courses.len()).collect();
        indices.sort_by(|&a, &b| compare_keys(&keys[a], &keys[b]));
        indices
    }

    /// Courses in priority order.
    pub fn sort<'a>(&self, courses: &'a [Course]) -> Vec<&'a Course> {
        self.sort_indices(courses)
            .into_iter()
            .map(|i| &courses[i])
            .collect()
    }

    fn score(&self, course: &Course) -> Vec<RuleScore> {
        self.rules.iter().map(|r| r.evaluate(course)).collect()
    }
}

fn compare_keys(a: &[RuleScore], b: &[RuleScore]) -> Ordering {
    a.iter()
        .zip(b)
        .find(|(x, y)| (*x - *y).abs() > SCORE_EPSILON)
        .map_or(Ordering::Equal, |(x, y)| x.total_cmp(y))
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rule_names()).finish()
    }
}
