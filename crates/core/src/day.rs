// SPDX-License-Identifier: MIT

//!
//! The calendar grid day type
//!

use crate::YearMonth;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which month a day shown in a month's grid belongs to
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(derive_more::Display, Serialize, Deserialize)]
pub enum DayOwner {
    /// An in-date (belongs to the month before the grid's month)
    PreviousMonth,

    /// Belongs to the grid's month
    ThisMonth,

    /// An out-date (belongs to the month after the grid's month)
    NextMonth,
}

impl DayOwner {
    /// The owner of `date` when it is shown in the grid of `month`
    pub fn relative_to(date: NaiveDate, month: YearMonth) -> Self {
        match YearMonth::of(date).cmp(&month) {
            Ordering::Less => DayOwner::PreviousMonth,
            Ordering::Equal => DayOwner::ThisMonth,
            Ordering::Greater => DayOwner::NextMonth,
        }
    }
}

/// A single cell of a month's grid: a date plus who owns it.  The same date
/// can appear in two adjacent months' grids with different owners, so both
/// fields make up the identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDay {
    date: NaiveDate,
    owner: DayOwner,
}

impl CalendarDay {
    pub fn new(date: NaiveDate, owner: DayOwner) -> Self {
        CalendarDay { date, owner }
    }

    /// A day owned by the month it falls in
    pub fn this_month(date: NaiveDate) -> Self {
        CalendarDay::new(date, DayOwner::ThisMonth)
    }

    /// A day tagged relative to the month whose grid it is shown in
    pub fn in_grid_of(date: NaiveDate, month: YearMonth) -> Self {
        CalendarDay::new(date, DayOwner::relative_to(date, month))
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn owner(&self) -> DayOwner {
        self.owner
    }

    /// Day of the month (1 to 31)
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// The month the date falls in (not necessarily the month whose grid it
    /// is shown in)
    pub fn year_month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use calendar_grid_macros::{date, year_month};

    #[test]
    fn relative_to() {
        let month = year_month!(2022, 1);
        assert_eq!(
            DayOwner::relative_to(date!(2021, 12, 31), month),
            DayOwner::PreviousMonth
        );
        assert_eq!(
            DayOwner::relative_to(date!(2022, 1, 1), month),
            DayOwner::ThisMonth
        );
        assert_eq!(
            DayOwner::relative_to(date!(2022, 2, 1), month),
            DayOwner::NextMonth
        );
    }

    #[test]
    fn identity_includes_owner() {
        let as_out_date = CalendarDay::new(date!(2022, 2, 1), DayOwner::NextMonth);
        let as_this_month = CalendarDay::this_month(date!(2022, 2, 1));
        assert_ne!(as_out_date, as_this_month);
        assert_eq!(as_out_date.date(), as_this_month.date());
        assert_eq!(as_out_date.year_month(), year_month!(2022, 2));
        assert_eq!(as_out_date.day(), 1);
    }
}
