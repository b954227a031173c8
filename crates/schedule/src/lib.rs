//! A small weekly class-schedule manager.
//!
//! The schedule lives in a flat JSON file mapping `YYYY-MM-DD` date
//! keys to ordered session records. [`ScheduleStore`] regenerates the
//! file for a requested week and answers simple aggregate queries over
//! it.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod error;
mod session;
mod store;

pub use error::ScheduleError;
pub use session::ClassSession;
pub use store::{
    GenerateSummary, ScheduleMap, ScheduleReport, ScheduleStore,
    WeekSchedule,
};
