// SPDX-License-Identifier: MIT

//!
//! *Part of the wider calendar grid project*
//!
//! This crate defines the basic datatypes used across the calendar grid
//! project: the year-month, the day cell and its owner, the generated month
//! and the configuration snapshot (range, first day of week and layout
//! policies), plus the date/week helpers the grid generator is built from.
//!
//! This crate aims to provide APIs for each type so that if a type is
//! instantiated, the developer can be sure it's valid.
//!

mod config;
mod day;
mod month;
mod week;
mod year_month;

pub use config::*;
pub use day::*;
pub use month::*;
pub use week::*;
pub use year_month::*;

/// Re-exported so callers can name weekdays and dates without depending on
/// `chrono` directly
pub use chrono::{NaiveDate, Weekday};
