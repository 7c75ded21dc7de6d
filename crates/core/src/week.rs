// SPDX-License-Identifier: MIT

//!
//! Date and week helpers for laying out month grids
//!

use crate::{DAYS_PER_WEEK, OutDateStyle, YearMonth};
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// The column of `date` in a week that starts on `first_day_of_week` (0 to 6)
pub fn weekday_index(date: NaiveDate, first_day_of_week: Weekday) -> u32 {
    let day = date.weekday().num_days_from_monday();
    let first = first_day_of_week.num_days_from_monday();
    (day + 7 - first) % 7
}

/// The first cell of `month`'s grid when in-dates are shown: the nearest date
/// on or before the 1st that falls on `first_day_of_week` (0 to 6 days back)
pub fn first_day_of_grid(month: YearMonth, first_day_of_week: Weekday) -> NaiveDate {
    let first = month.first_day();
    first - Days::new(u64::from(weekday_index(first, first_day_of_week)))
}

/// The last cell of `month`'s grid when it starts at [`first_day_of_grid`]
///
/// - [`OutDateStyle::EndOfRow`]: the nearest date on or after the month's
///   last day that falls on the day before `first_day_of_week`
/// - [`OutDateStyle::EndOfGrid`]: as above, extended (if need be) so the grid
///   has `max_row_count` full rows
/// - [`OutDateStyle::None`]: the month's last day
pub fn last_day_of_grid(
    month: YearMonth,
    first_day_of_week: Weekday,
    style: OutDateStyle,
    max_row_count: u8,
) -> NaiveDate {
    let last = month.last_day();
    let end_of_row = last + Days::new(u64::from(6 - weekday_index(last, first_day_of_week)));
    match style {
        OutDateStyle::EndOfRow => end_of_row,
        OutDateStyle::EndOfGrid => {
            let grid_days = u64::from(max_row_count) * DAYS_PER_WEEK as u64;
            let end_of_grid = first_day_of_grid(month, first_day_of_week) + Days::new(grid_days - 1);
            end_of_row.max(end_of_grid)
        }
        OutDateStyle::None => last,
    }
}

/// The number of days from `start` to `end` inclusive (0 if `end` is before
/// `start`)
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> usize {
    let days = (end - start).num_days() + 1;
    days.max(0) as usize
}

/// The number of 7-day rows needed to hold `days` days
pub fn rows_for_days(days: usize) -> usize {
    days.div_ceil(DAYS_PER_WEEK)
}
