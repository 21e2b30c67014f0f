//! Student sections.
//!
//! A section is one (department, semester, section-index) group that gets
//! its own timetable. Most department/semester pairs have one section;
//! [`SectionRule`]s split high-enrollment programs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One (department, semester, section-index) group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Section {
    /// Department.
    pub department: String,
    /// Semester number.
    pub semester: u32,
    /// Zero-based section index.
    pub index: u32,
    /// Number of sections of this department/semester.
    pub of: u32,
}

impl Section {
    /// Creates a section.
    pub fn new(department: impl Into<String>, semester: u32, index: u32, of: u32) -> Self {
        Self {
            department: department.into(),
            semester,
            index,
            of: of.max(1),
        }
    }

    /// Sheet-style label: `CSE_4` for a lone section, `CSE_4_A`, `CSE_4_B`
    /// otherwise.
    pub fn label(&self) -> String {
        if self.of <= 1 {
            format!("{}_{}", self.department, self.semester)
        } else {
            format!("{}_{}_{}", self.department, self.semester, section_letter(self.index))
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn section_letter(index: u32) -> String {
    let mut n = index;
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'A' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Splits matching department/semester pairs into several sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRule {
    /// Departments the rule applies to (case-insensitive).
    pub departments: Vec<String>,
    /// Semesters the rule applies to.
    pub semesters: Vec<u32>,
    /// Number of sections to create.
    pub sections: u32,
}

impl SectionRule {
    /// Whether the rule matches a department/semester.
    pub fn matches(&self, department: &str, semester: u32) -> bool {
        let dept = department.trim();
        self.semesters.contains(&semester)
            && self
                .departments
                .iter()
                .any(|d| d.trim().eq_ignore_ascii_case(dept))
    }
}

/// Section count for a department/semester: the first matching rule, else 1.
pub fn section_count(rules: &[SectionRule], department: &str, semester: u32) -> u32 {
    rules
        .iter()
        .find(|r| r.matches(department, semester))
        .map(|r| r.sections.max(1))
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Vec<SectionRule> {
        vec![SectionRule {
            departments: vec!["CSE".into(), "ECE".into(), "DSAI".into()],
            semesters: vec![2, 4, 6],
            sections: 2,
        }]
    }

    #[test]
    fn test_labels() {
        assert_eq!(Section::new("CSE", 3, 0, 1).label(), "CSE_3");
        assert_eq!(Section::new("CSE", 4, 0, 2).label(), "CSE_4_A");
        assert_eq!(Section::new("CSE", 4, 1, 2).to_string(), "CSE_4_B");
        assert_eq!(section_letter(26), "AA");
    }

    #[test]
    fn test_section_count() {
        let rules = rules();
        assert_eq!(section_count(&rules, "cse", 4), 2);
        assert_eq!(section_count(&rules, "DSAI", 6), 2);
        assert_eq!(section_count(&rules, "CSE", 3), 1);
        assert_eq!(section_count(&rules, "ME", 4), 1);
        assert_eq!(section_count(&[], "CSE", 4), 1);
    }

    #[test]
    fn test_zero_sections_clamped() {
        let rules = vec![SectionRule {
            departments: vec!["X".into()],
            semesters: vec![1],
            sections: 0,
        }];
        assert_eq!(section_count(&rules, "X", 1), 1);
    }
}
