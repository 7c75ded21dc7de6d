// SPDX-License-Identifier: MIT

//!
//! Report the first visible month when it changes
//!

use crate::{Locator, ViewportBounds};
use calendar_grid_core::{CalendarMonth, YearMonth};

/// Remembers the last first-visible month reported, so scrolling within a
/// month doesn't report it again
#[derive(Clone, Debug, Default)]
pub struct MonthScrollTracker {
    last_reported: Option<YearMonth>,
}

impl MonthScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first visible month, if it differs from the one last reported
    pub fn observe<'a>(
        &mut self,
        locator: &Locator<'a>,
        bounds: ViewportBounds,
    ) -> Option<&'a CalendarMonth> {
        let first_month = locator.visible(bounds)?.first_month;
        if self.last_reported == Some(first_month.year_month()) {
            return None;
        }
        self.last_reported = Some(first_month.year_month());
        Some(first_month)
    }

    /// Forget the last report (e.g. after reconfiguring)
    pub fn reset(&mut self) {
        self.last_reported = None;
    }

    pub fn last_reported(&self) -> Option<YearMonth> {
        self.last_reported
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::generate;
    use calendar_grid_core::{MonthConfig, MonthPolicies, Weekday};
    use calendar_grid_macros::year_month;

    #[test]
    fn reports_only_changes() {
        let config = MonthConfig::new(
            year_month!(2022, 1),
            year_month!(2022, 3),
            Weekday::Mon,
            MonthPolicies::default(),
        )
        .unwrap();
        let months = generate(&config);
        let locator = Locator::new(&months);
        let mut tracker = MonthScrollTracker::new();

        // Scrolling through January's rows reports January once
        let first = tracker.observe(&locator, ViewportBounds::week_rows(0, 3));
        assert_eq!(first.map(|month| month.year_month()), Some(year_month!(2022, 1)));
        assert!(tracker.observe(&locator, ViewportBounds::week_rows(2, 5)).is_none());

        // Into February
        let first = tracker.observe(&locator, ViewportBounds::week_rows(6, 9));
        assert_eq!(first.map(|month| month.year_month()), Some(year_month!(2022, 2)));

        // Stale bounds are ignored and don't change what was last reported
        assert!(tracker.observe(&locator, ViewportBounds::week_rows(40, 41)).is_none());
        assert_eq!(tracker.last_reported(), Some(year_month!(2022, 2)));

        tracker.reset();
        assert!(tracker.observe(&locator, ViewportBounds::months(1, 1)).is_some());
    }
}
