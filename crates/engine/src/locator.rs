// SPDX-License-Identifier: MIT

//!
//! Visible-item lookup: viewport indices to months/days and back
//!

use calendar_grid_core::{CalendarDay, CalendarMonth, DayOwner, NaiveDate, YearMonth};
use serde::Serialize;
use std::borrow::Cow;

/// What the scrolling layer's item indices count
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IndexUnit {
    /// One item per month (e.g. a horizontally paged calendar)
    Month,

    /// One item per week row, across all months (e.g. a vertically scrolled
    /// calendar)
    WeekRow,
}

/// The first and last (fully or partially) visible item indices, as reported
/// by the scrolling layer.  These may be stale, so nothing here trusts them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ViewportBounds {
    pub first: usize,
    pub last: usize,
    pub unit: IndexUnit,
}

impl ViewportBounds {
    /// Bounds counted in months
    pub fn months(first: usize, last: usize) -> Self {
        ViewportBounds {
            first,
            last,
            unit: IndexUnit::Month,
        }
    }

    /// Bounds counted in flattened week rows
    pub fn week_rows(first: usize, last: usize) -> Self {
        ViewportBounds {
            first,
            last,
            unit: IndexUnit::WeekRow,
        }
    }
}

/// The months and days at the edges of the viewport
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibleItems<'a> {
    pub first_month: &'a CalendarMonth,
    pub last_month: &'a CalendarMonth,
    pub first_day: CalendarDay,
    pub last_day: CalendarDay,
}

/// Where a day is in a snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DayPosition {
    /// Index of the month whose grid shows the day
    pub month_index: usize,

    /// Row within that month's grid
    pub row_in_month: usize,

    /// Column within the row (0 is the first day of the week)
    pub column: usize,

    /// Flattened week-row index across all months
    pub row: usize,
}

impl DayPosition {
    /// The item index the scrolling layer should scroll to
    pub fn item_index(&self, unit: IndexUnit) -> usize {
        match unit {
            IndexUnit::Month => self.month_index,
            IndexUnit::WeekRow => self.row,
        }
    }
}

/// Offsets of each month's first row in the flattened list of week rows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowIndex {
    offsets: Vec<usize>,
    row_count: usize,
}

impl RowIndex {
    pub fn new(months: &[CalendarMonth]) -> Self {
        let mut offsets = Vec::with_capacity(months.len());
        let mut row_count = 0;
        for month in months {
            offsets.push(row_count);
            row_count += month.row_count();
        }
        RowIndex { offsets, row_count }
    }

    /// Total number of week rows
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// The flattened index of a month's first row
    pub fn first_row_of(&self, month_index: usize) -> Option<usize> {
        self.offsets.get(month_index).copied()
    }

    /// Which month a flattened row falls in, as `(month_index, row_in_month)`
    pub fn locate(&self, row: usize) -> Option<(usize, usize)> {
        if row >= self.row_count {
            return None;
        }
        let month_index = self.offsets.partition_point(|&offset| offset <= row) - 1;
        Some((month_index, row - self.offsets[month_index]))
    }
}

/// Lookups over one snapshot's months
#[derive(Clone, Debug)]
pub struct Locator<'a> {
    months: &'a [CalendarMonth],
    rows: Cow<'a, RowIndex>,
}

impl<'a> Locator<'a> {
    /// Build a locator (and its row index) for the months
    pub fn new(months: &'a [CalendarMonth]) -> Self {
        Locator {
            months,
            rows: Cow::Owned(RowIndex::new(months)),
        }
    }

    /// Use an already built row index (it must have been built from `months`)
    pub(crate) fn with_rows(months: &'a [CalendarMonth], rows: &'a RowIndex) -> Self {
        Locator {
            months,
            rows: Cow::Borrowed(rows),
        }
    }

    pub fn months(&self) -> &'a [CalendarMonth] {
        self.months
    }

    /// The first/last visible month and day, or `None` if the snapshot is
    /// empty or the bounds don't fit it
    pub fn visible(&self, bounds: ViewportBounds) -> Option<VisibleItems<'a>> {
        if bounds.first > bounds.last {
            return None;
        }
        let months = self.months;
        match bounds.unit {
            IndexUnit::Month => {
                let first_month = months.get(bounds.first)?;
                let last_month = months.get(bounds.last)?;
                Some(VisibleItems {
                    first_month,
                    last_month,
                    first_day: preferred_day(first_month.days())?,
                    last_day: preferred_day(last_month.days().rev())?,
                })
            }
            IndexUnit::WeekRow => {
                let (first_index, first_row) = self.rows.locate(bounds.first)?;
                let (last_index, last_row) = self.rows.locate(bounds.last)?;
                let first_month = months.get(first_index)?;
                let last_month = months.get(last_index)?;
                Some(VisibleItems {
                    first_month,
                    last_month,
                    first_day: preferred_day(first_month.week_days().get(first_row)?.iter())?,
                    last_day: preferred_day(last_month.week_days().get(last_row)?.iter().rev())?,
                })
            }
        }
    }

    /// The index of the month (to scroll to a month)
    pub fn month_position(&self, year_month: YearMonth) -> Option<usize> {
        self.months
            .binary_search_by_key(&year_month, |month| month.year_month())
            .ok()
    }

    /// Where the exact `(date, owner)` cell is (to scroll to a day)
    pub fn day_position(&self, day: &CalendarDay) -> Option<DayPosition> {
        let grid_month = match day.owner() {
            DayOwner::PreviousMonth => day.year_month().next(),
            DayOwner::ThisMonth => day.year_month(),
            DayOwner::NextMonth => day.year_month().previous(),
        };
        let month_index = self.month_position(grid_month)?;
        let (row_in_month, column) = self.months[month_index].find_day(day)?;
        Some(DayPosition {
            month_index,
            row_in_month,
            column,
            row: self.rows.first_row_of(month_index)? + row_in_month,
        })
    }

    /// Where the date is shown as part of its own month
    pub fn date_position(&self, date: NaiveDate) -> Option<DayPosition> {
        self.day_position(&CalendarDay::this_month(date))
    }

    /// Every month whose grid shows the date, whoever owns it (at most the
    /// month before, the month itself and the month after)
    pub fn months_containing_date(&self, date: NaiveDate) -> Vec<usize> {
        [
            DayOwner::NextMonth,
            DayOwner::ThisMonth,
            DayOwner::PreviousMonth,
        ]
        .into_iter()
        .filter_map(|owner| self.day_position(&CalendarDay::new(date, owner)))
        .map(|position| position.month_index)
        .collect()
    }
}

/// The first `ThisMonth` day of the iterator, falling back to its first day
fn preferred_day<'b, I>(days: I) -> Option<CalendarDay>
where
    I: Iterator<Item = &'b CalendarDay> + Clone,
{
    let mut fallback = days.clone();
    days.clone()
        .find(|day| day.owner() == DayOwner::ThisMonth)
        .or_else(|| fallback.next())
        .copied()
}

/// Find the visible months/days (see [`Locator::visible`])
pub fn locate_visible(months: &[CalendarMonth], bounds: ViewportBounds) -> Option<VisibleItems<'_>> {
    Locator::new(months).visible(bounds)
}

/// Find a month's index (see [`Locator::month_position`])
pub fn month_position(months: &[CalendarMonth], year_month: YearMonth) -> Option<usize> {
    Locator::new(months).month_position(year_month)
}

/// Find a day's position (see [`Locator::day_position`])
pub fn day_position(months: &[CalendarMonth], day: &CalendarDay) -> Option<DayPosition> {
    Locator::new(months).day_position(day)
}
