//! # dcf-time
//!
//! Date, period, and day-count types for dcf-rs.
//!
//! Dates are measured as year fractions relative to an arbitrary origin,
//! which keeps the library independent of any business-calendar package.
//! Calendar arithmetic (holidays, business-day rolling) is deliberately
//! out of scope.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod date;
pub mod day_count;

pub use date::{Date, Period, DAYS_IN_YEAR, TIME_SHIFT};
pub use day_count::{default_day_count, Act360, Act365, Act36525, DayCount};
