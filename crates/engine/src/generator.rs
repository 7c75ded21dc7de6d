// SPDX-License-Identifier: MIT

//!
//! The grid generator: turn a [`MonthConfig`] into its months
//!

use crate::{CancellationToken, Locator, RowIndex};
use calendar_grid_core::{
    CalendarDay, CalendarMonth, DAYS_PER_WEEK, MonthConfig, OutDateStyle, YearMonth,
    days_inclusive, first_day_of_grid, rows_for_days,
};

/// A configuration together with the months generated from it.  Snapshots are
/// never mutated; reconfiguring produces a new one.
#[derive(Debug, Clone)]
pub struct Snapshot {
    config: MonthConfig,
    months: Vec<CalendarMonth>,
    rows: RowIndex,
}

impl Snapshot {
    /// Generate the months for `config`
    pub fn generate(config: MonthConfig) -> Self {
        let months = generate(&config);
        Self::from_parts(config, months)
    }

    /// Generate the months for `config`, giving up (and returning `None`) if
    /// the token is cancelled before the last month has been generated
    pub fn generate_cancellable(config: MonthConfig, token: &CancellationToken) -> Option<Self> {
        let months = generate_cancellable(&config, token)?;
        Some(Self::from_parts(config, months))
    }

    fn from_parts(config: MonthConfig, months: Vec<CalendarMonth>) -> Self {
        let rows = RowIndex::new(&months);
        debug!(
            "Generated {} months ({} rows) for {} to {}",
            months.len(),
            rows.row_count(),
            config.start_month(),
            config.end_month()
        );
        Snapshot {
            config,
            months,
            rows,
        }
    }

    pub fn config(&self) -> &MonthConfig {
        &self.config
    }

    pub fn months(&self) -> &[CalendarMonth] {
        &self.months
    }

    /// The flattened week-row index of the months
    pub fn rows(&self) -> &RowIndex {
        &self.rows
    }

    /// Look up visible items and scroll positions in this snapshot
    pub fn locator(&self) -> Locator<'_> {
        Locator::with_rows(&self.months, &self.rows)
    }
}

/// Generate every month from the config's start month to its end month
/// inclusive
pub fn generate(config: &MonthConfig) -> Vec<CalendarMonth> {
    config
        .months()
        .map(|month| generate_month(config, month))
        .collect()
}

/// Generate like [`generate`], checking the token before each month.  Months
/// are never emitted half-built: cancellation yields no result at all.
pub fn generate_cancellable(
    config: &MonthConfig,
    token: &CancellationToken,
) -> Option<Vec<CalendarMonth>> {
    let mut months = Vec::with_capacity(config.month_count());
    for month in config.months() {
        if token.is_cancelled() {
            debug!(
                "Generation for {} to {} cancelled at {month}",
                config.start_month(),
                config.end_month()
            );
            return None;
        }
        months.push(generate_month(config, month));
    }
    Some(months)
}

/// Generate the grid of a single month of the config's range
///
/// The grid starts on the first day of the week when the month gets in-dates,
/// otherwise on the 1st.  Rows are counted from there, the final row is always
/// completed to 7 days, [`OutDateStyle::EndOfGrid`] adds rows up to the row
/// cap and the row cap truncates anything longer.
pub fn generate_month(config: &MonthConfig, month: YearMonth) -> CalendarMonth {
    let max_rows = usize::from(config.max_row_count());

    let grid_start = if config.has_in_dates(month) {
        first_day_of_grid(month, config.first_day_of_week())
    } else {
        month.first_day()
    };

    let mut rows = rows_for_days(days_inclusive(grid_start, month.last_day()));
    if config.out_date_style() == OutDateStyle::EndOfGrid && !config.suppresses_out_dates(month) {
        rows = rows.max(max_rows);
    }
    let rows = rows.min(max_rows);

    let days: Vec<CalendarDay> = grid_start
        .iter_days()
        .take(rows * DAYS_PER_WEEK)
        .map(|date| CalendarDay::in_grid_of(date, month))
        .collect();
    let week_days: Vec<Vec<CalendarDay>> = days
        .chunks(DAYS_PER_WEEK)
        .map(|row| row.to_vec())
        .collect();

    trace!("Generated {month}: {} rows from {grid_start}", week_days.len());
    CalendarMonth::new(month, week_days)
}
