// SPDX-License-Identifier: MIT

//!
//! The calendar grid month type
//!

use crate::{CalendarDay, DayOwner, YearMonth};
use serde::Serialize;

/// The number of days in a week row
pub const DAYS_PER_WEEK: usize = 7;

/// One rendered month: the month plus its grid of week rows (7 days each)
///
/// Two months are equal if their [`YearMonth`]s are equal.  Under a single
/// configuration a month's grid is fully determined by its [`YearMonth`], so
/// "same item" and "same content" coincide.  Use [`CalendarMonth::week_days`]
/// to compare grids across configurations.
#[derive(Clone, Debug, Serialize)]
pub struct CalendarMonth {
    year_month: YearMonth,
    week_days: Vec<Vec<CalendarDay>>,
}

impl PartialEq for CalendarMonth {
    fn eq(&self, other: &Self) -> bool {
        self.year_month == other.year_month
    }
}

impl Eq for CalendarMonth {}

impl CalendarMonth {
    /// Create a month from its rows.  Callers are expected to supply rows of
    /// [`DAYS_PER_WEEK`] days (the grid generator always does).
    pub fn new(year_month: YearMonth, week_days: Vec<Vec<CalendarDay>>) -> Self {
        CalendarMonth {
            year_month,
            week_days,
        }
    }

    pub fn year_month(&self) -> YearMonth {
        self.year_month
    }

    /// The week rows, in order
    pub fn week_days(&self) -> &[Vec<CalendarDay>] {
        &self.week_days
    }

    pub fn row_count(&self) -> usize {
        self.week_days.len()
    }

    /// Every cell of the grid, row by row
    pub fn days(&self) -> impl DoubleEndedIterator<Item = &CalendarDay> + Clone {
        self.week_days.iter().flatten()
    }

    /// The cells owned by the previous month
    pub fn in_dates(&self) -> impl Iterator<Item = &CalendarDay> {
        self.days()
            .filter(|day| day.owner() == DayOwner::PreviousMonth)
    }

    /// The cells owned by the next month
    pub fn out_dates(&self) -> impl Iterator<Item = &CalendarDay> {
        self.days().filter(|day| day.owner() == DayOwner::NextMonth)
    }

    /// The first cell of the grid
    pub fn first_day(&self) -> Option<&CalendarDay> {
        self.days().next()
    }

    /// The last cell of the grid
    pub fn last_day(&self) -> Option<&CalendarDay> {
        self.week_days.last().and_then(|row| row.last())
    }

    /// Where the cell is in the grid, as `(row, column)`
    pub fn find_day(&self, day: &CalendarDay) -> Option<(usize, usize)> {
        self.week_days.iter().enumerate().find_map(|(row, days)| {
            days.iter()
                .position(|candidate| candidate == day)
                .map(|column| (row, column))
        })
    }
}
