//! Timetabling domain models.
//!
//! Provides the data types shared by the scheduler and its input/output
//! collaborators: the slot calendar, rooms, courses, sections, the
//! per-section grid and the failure report.
//!
//! # Domain Mappings
//!
//! | u-timetable | Generic scheduling |
//! |-------------|--------------------|
//! | Slot | Time bucket |
//! | Course session | Activity |
//! | Room, Faculty | Resource |
//! | Timetable grid | Schedule |

mod calendar;
mod course;
mod report;
mod room;
mod section;
mod timetable;

pub use calendar::{Slot, SlotCalendar, TimeWindow};
pub use course::{
    primary_faculty, required_room_category, Course, CourseRecord, SessionCounts, SessionType,
    UNASSIGNED_FACULTY,
};
pub use report::{FailureCause, UnscheduledComponent};
pub use room::{Room, RoomCategory, RoomPool};
pub use section::{section_count, Section, SectionRule};
pub use timetable::{Cell, GridSession, SessionHead, TimetableGrid};
