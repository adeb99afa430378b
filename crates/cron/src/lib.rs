//! Cron expressions for on-chain schedules.
//!
//! An expression has six or seven whitespace separated fields:
//!
//! ```text
//! sec  min  hour  day-of-month  month  day-of-week  [year]
//! ```
//!
//! Each field accepts `*`, `?`, single values, ranges (`a-b`), steps (`*/n`, `a/n`, `a-b/n`)
//! and comma separated lists of those. Months and weekdays also accept their three letter
//! names. When both day fields are restricted, a moment must match both of them.

pub mod error;
mod ordinal;
mod parsing;
mod schedule;
mod specifier;
mod time_unit;

pub use crate::schedule::Schedule;
pub use crate::time_unit::TimeUnit;
