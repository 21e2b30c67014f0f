//! Generator configuration.
//!
//! All tunables of a generation run in one serde-loadable struct. Missing
//! fields fall back to the defaults below, which reproduce the standard
//! institute week:
//!
//! | Setting | Default |
//! |---------|---------|
//! | Days | Monday–Friday |
//! | Breaks | 10:30–10:45, 13:00–13:45 |
//! | Minor windows | 07:30–09:00, 18:30–23:59 |
//! | Session minutes (L/T/P/S) | 90 / 60 / 120 / 60 |
//! | Attempt budgets (L/T/P/S) | 800 / 600 / 800 / 400 |
//! | Faculty start gap | 180 min |
//! | Two sections | CSE, ECE, DSAI in semesters 2, 4, 6 |

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{SectionRule, SessionType, SlotCalendar, TimeWindow};

/// A value per session type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTable<T> {
    /// Lecture value.
    pub lecture: T,
    /// Tutorial value.
    pub tutorial: T,
    /// Lab value.
    pub lab: T,
    /// Self-study value.
    pub self_study: T,
}

impl<T: Copy> SessionTable<T> {
    /// Value for a session type.
    pub fn get(&self, session_type: SessionType) -> T {
        match session_type {
            SessionType::Lecture => self.lecture,
            SessionType::Tutorial => self.tutorial,
            SessionType::Lab => self.lab,
            SessionType::SelfStudy => self.self_study,
        }
    }
}

/// Configuration of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Teaching day names, in week order.
    pub days: Vec<String>,
    /// Daily slot sequence.
    pub slots: Vec<TimeWindow>,
    /// Windows that turn overlapping slots into breaks.
    pub break_windows: Vec<TimeWindow>,
    /// Edge-of-day windows whose contained slots are never used.
    pub minor_windows: Vec<TimeWindow>,
    /// Required minutes per session type.
    pub session_minutes: SessionTable<i64>,
    /// Placement attempts per session type.
    pub attempt_budgets: SessionTable<u32>,
    /// Minimum minutes between any two session starts of one instructor on one day.
    pub min_faculty_gap_minutes: i64,
    /// Rules splitting department/semester pairs into several sections.
    pub section_rules: Vec<SectionRule>,
    /// Lowercase tokens that mark a course as elective.
    pub elective_keywords: Vec<String>,
    /// Random seed. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            days: ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
                .into_iter()
                .map(String::from)
                .collect(),
            slots: default_slots(),
            break_windows: vec![
                TimeWindow::hm(10, 30, 10, 45),
                TimeWindow::hm(13, 0, 13, 45),
            ],
            minor_windows: vec![
                TimeWindow::hm(7, 30, 9, 0),
                TimeWindow::hm(18, 30, 23, 59),
            ],
            session_minutes: SessionTable {
                lecture: 90,
                tutorial: 60,
                lab: 120,
                self_study: 60,
            },
            attempt_budgets: SessionTable {
                lecture: 800,
                tutorial: 600,
                lab: 800,
                self_study: 400,
            },
            min_faculty_gap_minutes: 180,
            section_rules: vec![SectionRule {
                departments: vec!["CSE".into(), "ECE".into(), "DSAI".into()],
                semesters: vec![2, 4, 6],
                sections: 2,
            }],
            elective_keywords: vec!["elective".into(), "oe".into(), "pe".into()],
            seed: None,
        }
    }
}

fn default_slots() -> Vec<TimeWindow> {
    [
        (7, 30, 9, 0),
        (9, 0, 10, 0),
        (10, 0, 10, 30),
        (10, 30, 10, 45),
        (10, 45, 11, 0),
        (11, 0, 11, 30),
        (11, 30, 12, 0),
        (12, 0, 12, 15),
        (12, 15, 12, 30),
        (12, 30, 13, 15),
        (13, 15, 13, 30),
        (13, 30, 14, 0),
        (14, 0, 14, 30),
        (14, 30, 15, 30),
        (15, 30, 15, 40),
        (16, 0, 16, 30),
        (16, 30, 17, 10),
        (17, 10, 17, 30),
        (17, 30, 18, 30),
        (18, 30, 23, 59),
    ]
    .into_iter()
    .map(|(sh, sm, eh, em)| TimeWindow::hm(sh, sm, eh, em))
    .collect()
}

impl GeneratorConfig {
    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces the section rules.
    pub fn with_section_rules(mut self, rules: Vec<SectionRule>) -> Self {
        self.section_rules = rules;
        self
    }

    /// Builds the slot calendar described by this configuration.
    pub fn calendar(&self) -> Result<SlotCalendar> {
        SlotCalendar::new(
            self.days.clone(),
            self.slots.clone(),
            self.break_windows.clone(),
            self.minor_windows.clone(),
        )
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> Result<()> {
        self.calendar()?;
        for session_type in SessionType::ALL {
            if self.session_minutes.get(session_type) <= 0 {
                return Err(Error::InvalidConfig(format!(
                    "{} duration must be positive",
                    session_type.label()
                )));
            }
        }
        if self.min_faculty_gap_minutes < 0 {
            return Err(Error::InvalidConfig(
                "minimum faculty gap cannot be negative".into(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }
}
