// SPDX-License-Identifier: MIT

//!
//! The month range updater: regenerate a snapshot from a changed
//! configuration
//!

use crate::{CancellationToken, Snapshot};
use calendar_grid_core::{ConfigError, MonthConfig, MonthPolicies, Weekday, YearMonth};

/// The changes to make to a configuration.  Fields left as `None` keep their
/// old value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MonthRangeUpdate {
    pub start_month: Option<YearMonth>,
    pub end_month: Option<YearMonth>,
    pub first_day_of_week: Option<Weekday>,
    pub policies: Option<MonthPolicies>,
}

impl MonthRangeUpdate {
    /// Change the range only
    pub fn range(start_month: YearMonth, end_month: YearMonth) -> Self {
        MonthRangeUpdate {
            start_month: Some(start_month),
            end_month: Some(end_month),
            ..Default::default()
        }
    }

    /// Change the layout policies only
    pub fn policies(policies: MonthPolicies) -> Self {
        MonthRangeUpdate {
            policies: Some(policies),
            ..Default::default()
        }
    }

    /// Merge the changes into `old`, validating the result
    pub fn merge(&self, old: &MonthConfig) -> Result<MonthConfig, ConfigError> {
        MonthConfig::new(
            self.start_month.unwrap_or(old.start_month()),
            self.end_month.unwrap_or(old.end_month()),
            self.first_day_of_week.unwrap_or(old.first_day_of_week()),
            self.policies.unwrap_or(old.policies()),
        )
    }
}

/// Regenerate with the merged configuration.  Nothing from the old snapshot is
/// reused; diff the two snapshots to find what they share.
pub fn update(old: &MonthConfig, update: &MonthRangeUpdate) -> Result<Snapshot, ConfigError> {
    let config = update.merge(old)?;
    Ok(Snapshot::generate(config))
}

/// Like [`update`], giving up with `Ok(None)` if the token is cancelled first.
/// Configuration errors are reported before any generation starts.
pub fn update_cancellable(
    old: &MonthConfig,
    update: &MonthRangeUpdate,
    token: &CancellationToken,
) -> Result<Option<Snapshot>, ConfigError> {
    let config = update.merge(old)?;
    Ok(Snapshot::generate_cancellable(config, token))
}
