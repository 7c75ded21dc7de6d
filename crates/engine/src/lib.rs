// SPDX-License-Identifier: MIT

//!
//! Calendar grid generation, diffing and visible-item lookup
//!
//! - [`generate`] turns a [`MonthConfig`](calendar_grid_core::MonthConfig)
//!   into its months (see [`Snapshot`] for a configuration paired with them)
//! - [`update`] regenerates from a changed configuration
//! - [`diff`] finds the edit script between two snapshots' months
//! - [`Locator`] answers "what is visible" and "where is this month/day"
//! - [`Calendar`] holds the current snapshot and runs generations in the
//!   background on tokio
//!

#[macro_use]
extern crate log;

mod calendar;
mod cancel;
mod diff;
mod generator;
mod locator;
mod tracker;
mod updater;

pub use calendar::*;
pub use cancel::*;
pub use diff::*;
pub use generator::*;
pub use locator::*;
pub use tracker::*;
pub use updater::*;
