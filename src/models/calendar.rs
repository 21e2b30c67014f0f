//! Slot calendar and time window models.
//!
//! The teaching day is cut into an irregular, ordered sequence of slots.
//! The same sequence is used for every day of the week and a slot is
//! identified by its index in that sequence.
//!
//! # Unassignable slots
//! Two kinds of slot can never hold a session:
//! - **Break** slots overlap a configured break window (morning break, lunch).
//! - **Minor** slots lie inside a reserved edge-of-day window.
//!
//! Both predicates are pure functions of the slot's time bounds.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// A time-of-day interval [start, end).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Interval start (inclusive).
    pub start: NaiveTime,
    /// Interval end (exclusive).
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Creates a window from hour/minute pairs, rejecting times of day
    /// that do not exist.
    pub fn try_hm(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> Result<Self> {
        Ok(Self::new(
            checked_time(start_h, start_m)?,
            checked_time(end_h, end_m)?,
        ))
    }

    /// Window from in-crate literals. Out-of-range input collapses to
    /// midnight.
    pub(crate) fn hm(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> Self {
        Self::new(time_hm(start_h, start_m), time_hm(end_h, end_m))
    }

    /// Start as minutes after midnight.
    #[inline]
    pub fn start_minutes(&self) -> i64 {
        minutes_of_day(self.start)
    }

    /// Duration in minutes. An end before the start wraps past midnight.
    pub fn duration_minutes(&self) -> i64 {
        let start = minutes_of_day(self.start);
        let mut end = minutes_of_day(self.end);
        if end < start {
            end += MINUTES_PER_DAY;
        }
        end - start
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `other` lies entirely inside this window.
    pub fn contains_window(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// `HH:MM-HH:MM` label.
    pub fn label(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// One interval of the daily slot sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Slot {
    /// Position in the daily sequence.
    pub index: usize,
    /// Time bounds.
    pub window: TimeWindow,
}

impl Slot {
    /// Duration in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        self.window.duration_minutes()
    }

    /// Start as minutes after midnight.
    #[inline]
    pub fn start_minutes(&self) -> i64 {
        self.window.start_minutes()
    }
}

/// The week's slot grid: day names, the daily slot sequence, and the
/// windows that make slots unassignable.
///
/// Only [`SlotCalendar::new`] builds one; load calendars through
/// [`GeneratorConfig`](crate::config::GeneratorConfig).
#[derive(Debug, Clone, Serialize)]
pub struct SlotCalendar {
    days: Vec<String>,
    slots: Vec<Slot>,
    break_windows: Vec<TimeWindow>,
    minor_windows: Vec<TimeWindow>,
}

impl SlotCalendar {
    /// Builds a calendar, checking that slots are non-empty, ordered
    /// and non-overlapping.
    pub fn new(
        days: Vec<String>,
        windows: Vec<TimeWindow>,
        break_windows: Vec<TimeWindow>,
        minor_windows: Vec<TimeWindow>,
    ) -> Result<Self> {
        if days.is_empty() {
            return Err(Error::InvalidConfig("calendar has no days".into()));
        }
        if windows.is_empty() {
            return Err(Error::InvalidConfig("calendar has no slots".into()));
        }
        for (i, w) in windows.iter().enumerate() {
            if w.end <= w.start {
                return Err(Error::InvalidConfig(format!(
                    "slot {i} ({}) ends before it starts",
                    w.label()
                )));
            }
        }
        for (i, pair) in windows.windows(2).enumerate() {
            if pair[1].start < pair[0].end {
                return Err(Error::InvalidConfig(format!(
                    "slot {} ({}) overlaps or precedes slot {i} ({})",
                    i + 1,
                    pair[1].label(),
                    pair[0].label()
                )));
            }
        }

        let slots = windows
            .into_iter()
            .enumerate()
            .map(|(index, window)| Slot { index, window })
            .collect();

        Ok(Self {
            days,
            slots,
            break_windows,
            minor_windows,
        })
    }

    /// Ordered slot sequence (same every day).
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Slot at `index`, if any.
    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Number of slots per day.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Day names, in week order.
    pub fn days(&self) -> &[String] {
        &self.days
    }

    /// Number of teaching days.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Whether the slot overlaps a break window.
    pub fn is_break(&self, slot: &Slot) -> bool {
        self.break_windows.iter().any(|b| b.overlaps(&slot.window))
    }

    /// Whether the slot lies in a reserved edge-of-day window.
    pub fn is_minor(&self, slot: &Slot) -> bool {
        self.minor_windows
            .iter()
            .any(|m| m.contains_window(&slot.window))
    }

    /// Whether a session may occupy the slot at `index`.
    pub fn is_assignable(&self, index: usize) -> bool {
        self.slot(index)
            .is_some_and(|s| !self.is_break(s) && !self.is_minor(s))
    }

    /// Duration of the slot at `index` (0 if out of range).
    pub fn duration_minutes(&self, index: usize) -> i64 {
        self.slot(index).map(Slot::duration_minutes).unwrap_or(0)
    }

    /// Start of the slot at `index` in minutes after midnight.
    pub fn start_minutes(&self, index: usize) -> Option<i64> {
        self.slot(index).map(Slot::start_minutes)
    }

    /// Header labels (`HH:MM-HH:MM`) for every slot.
    pub fn labels(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.window.label()).collect()
    }
}

fn checked_time(hour: u32, minute: u32) -> Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| Error::InvalidConfig(format!("invalid time of day {hour:02}:{minute:02}")))
}

fn time_hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

fn minutes_of_day(t: NaiveTime) -> i64 {
    i64::from(t.hour() * 60 + t.minute())
}
