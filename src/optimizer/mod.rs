//! Occupancy-to-operations rule engine.
//!
//! Everything here is a pure function of its arguments: an occupancy fraction
//! becomes an hourly [`Decision`], 24 of them become a [`DailySchedule`], and
//! two schedules become a [`SavingsReport`].

pub mod decision;
pub mod savings;
pub mod scenario;
pub mod schedule;

pub use decision::*;
pub use savings::*;
pub use scenario::*;
pub use schedule::*;
