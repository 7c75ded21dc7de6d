// SPDX-License-Identifier: MIT

//!
//! The month grid configuration snapshot and its layout policies
//!

use crate::YearMonth;
use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// The smallest allowed row cap
pub const MIN_ROW_COUNT: u8 = 1;

/// The largest allowed row cap (a month never spans more than 6 week rows)
pub const MAX_ROW_COUNT: u8 = 6;

/// Errors that can arise when building a [`MonthConfig`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The start month is after the end month
    #[error("Start month `{start}` is after end month `{end}`")]
    InvalidRange { start: YearMonth, end: YearMonth },

    /// The row cap must be [`MIN_ROW_COUNT`] <= count <= [`MAX_ROW_COUNT`]
    #[error("Max row count `{0}` is not allowed (must be between 1 and 6)")]
    InvalidMaxRowCount(u8),
}

/// Which months get leading days from the previous month (in-dates)
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(derive_more::Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InDateStyle {
    /// Every month starts on a full week row
    #[default]
    AllMonths,

    /// Only the first month of the range starts on a full week row
    FirstMonthOnly,

    /// No month gets in-dates
    None,
}

/// How trailing days from the next month (out-dates) are added
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[derive(derive_more::Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutDateStyle {
    /// Fill the last week row
    #[default]
    EndOfRow,

    /// Fill the last week row then add rows up to the row cap
    EndOfGrid,

    /// No out-dates are requested
    None,
}

/// The layout policies of a month grid (everything but the range and the
/// first day of the week)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MonthPolicies {
    in_date_style: InDateStyle,
    out_date_style: OutDateStyle,
    max_row_count: u8,
    has_boundaries: bool,
}

impl Default for MonthPolicies {
    fn default() -> Self {
        MonthPolicies {
            in_date_style: InDateStyle::AllMonths,
            out_date_style: OutDateStyle::EndOfRow,
            max_row_count: MAX_ROW_COUNT,
            has_boundaries: true,
        }
    }
}

impl MonthPolicies {
    /// Create a new set of [`MonthPolicies`] if the row cap is valid
    pub fn from(
        in_date_style: InDateStyle,
        out_date_style: OutDateStyle,
        max_row_count: u8,
        has_boundaries: bool,
    ) -> Result<Self, ConfigError> {
        if !(MIN_ROW_COUNT..=MAX_ROW_COUNT).contains(&max_row_count) {
            return Err(ConfigError::InvalidMaxRowCount(max_row_count));
        }
        Ok(MonthPolicies {
            in_date_style,
            out_date_style,
            max_row_count,
            has_boundaries,
        })
    }

    pub fn in_date_style(&self) -> InDateStyle {
        self.in_date_style
    }

    pub fn out_date_style(&self) -> OutDateStyle {
        self.out_date_style
    }

    pub fn max_row_count(&self) -> u8 {
        self.max_row_count
    }

    /// Whether the very start and end of the range are padded with in/out
    /// dates
    pub fn has_boundaries(&self) -> bool {
        self.has_boundaries
    }

    pub fn with_in_date_style(mut self, in_date_style: InDateStyle) -> Self {
        self.in_date_style = in_date_style;
        self
    }

    pub fn with_out_date_style(mut self, out_date_style: OutDateStyle) -> Self {
        self.out_date_style = out_date_style;
        self
    }

    /// Change the row cap if the result will be valid
    pub fn with_max_row_count(self, max_row_count: u8) -> Result<Self, ConfigError> {
        MonthPolicies::from(
            self.in_date_style,
            self.out_date_style,
            max_row_count,
            self.has_boundaries,
        )
    }

    pub fn with_boundaries(mut self, has_boundaries: bool) -> Self {
        self.has_boundaries = has_boundaries;
        self
    }
}

/// Everything needed to generate a month grid.  Once built it is never
/// mutated; the `with_*` methods return a new snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MonthConfig {
    start_month: YearMonth,
    end_month: YearMonth,
    first_day_of_week: Weekday,
    policies: MonthPolicies,
}

impl MonthConfig {
    /// Create a new [`MonthConfig`] if the range is valid
    pub fn new(
        start_month: YearMonth,
        end_month: YearMonth,
        first_day_of_week: Weekday,
        policies: MonthPolicies,
    ) -> Result<Self, ConfigError> {
        if start_month > end_month {
            return Err(ConfigError::InvalidRange {
                start: start_month,
                end: end_month,
            });
        }
        Ok(MonthConfig {
            start_month,
            end_month,
            first_day_of_week,
            policies,
        })
    }

    pub fn start_month(&self) -> YearMonth {
        self.start_month
    }

    pub fn end_month(&self) -> YearMonth {
        self.end_month
    }

    pub fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    pub fn policies(&self) -> MonthPolicies {
        self.policies
    }

    pub fn in_date_style(&self) -> InDateStyle {
        self.policies.in_date_style
    }

    pub fn out_date_style(&self) -> OutDateStyle {
        self.policies.out_date_style
    }

    pub fn max_row_count(&self) -> u8 {
        self.policies.max_row_count
    }

    pub fn has_boundaries(&self) -> bool {
        self.policies.has_boundaries
    }

    /// The number of months in the range (always at least 1)
    pub fn month_count(&self) -> usize {
        (self.start_month.months_until(self.end_month) + 1) as usize
    }

    /// Every month in the range, in order
    pub fn months(&self) -> impl Iterator<Item = YearMonth> {
        self.start_month.iter_to(self.end_month)
    }

    /// Copy with a new range if the result will be valid
    pub fn with_range(&self, start_month: YearMonth, end_month: YearMonth) -> Result<Self, ConfigError> {
        MonthConfig::new(start_month, end_month, self.first_day_of_week, self.policies)
    }

    pub fn with_first_day_of_week(mut self, first_day_of_week: Weekday) -> Self {
        self.first_day_of_week = first_day_of_week;
        self
    }

    pub fn with_policies(mut self, policies: MonthPolicies) -> Self {
        self.policies = policies;
        self
    }

    /// Whether both configs lay out months the same way (same policies and
    /// first day of the week), whatever their ranges
    pub fn has_same_layout(&self, other: &MonthConfig) -> bool {
        self.first_day_of_week == other.first_day_of_week && self.policies == other.policies
    }

    /// Whether leading in-dates are generated for `month` (before boundary
    /// suppression is taken into account)
    pub fn requests_in_dates(&self, month: YearMonth) -> bool {
        match self.policies.in_date_style {
            InDateStyle::AllMonths => true,
            InDateStyle::FirstMonthOnly => month == self.start_month,
            InDateStyle::None => false,
        }
    }

    /// Whether `month` gets leading in-dates once boundary suppression at the
    /// start of the range is applied
    pub fn has_in_dates(&self, month: YearMonth) -> bool {
        let suppressed = !self.policies.has_boundaries && month == self.start_month;
        self.requests_in_dates(month) && !suppressed
    }

    /// Whether the trailing padding of `month` is suppressed (the last month of
    /// a range without boundaries)
    pub fn suppresses_out_dates(&self, month: YearMonth) -> bool {
        !self.policies.has_boundaries && month == self.end_month
    }
}

/// Used only by the custom deserialiser (to make it simpler)
#[derive(Deserialize)]
struct RawMonthPolicies {
    in_date_style: InDateStyle,
    out_date_style: OutDateStyle,
    max_row_count: u8,
    has_boundaries: bool,
}

impl<'de> Deserialize<'de> for MonthPolicies {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawMonthPolicies::deserialize(deserializer)?;
        MonthPolicies::from(
            raw.in_date_style,
            raw.out_date_style,
            raw.max_row_count,
            raw.has_boundaries,
        )
        .map_err(serde::de::Error::custom)
    }
}

/// Used only by the custom deserialiser (to make it simpler)
#[derive(Deserialize)]
struct RawMonthConfig {
    start_month: YearMonth,
    end_month: YearMonth,
    first_day_of_week: Weekday,
    policies: MonthPolicies,
}

impl<'de> Deserialize<'de> for MonthConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawMonthConfig::deserialize(deserializer)?;
        MonthConfig::new(
            raw.start_month,
            raw.end_month,
            raw.first_day_of_week,
            raw.policies,
        )
        .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use calendar_grid_macros::year_month;

    #[test]
    fn policies_from() {
        // Should return error
        assert_eq!(
            MonthPolicies::from(InDateStyle::AllMonths, OutDateStyle::EndOfRow, 0, true),
            Err(ConfigError::InvalidMaxRowCount(0))
        );
        assert_eq!(
            MonthPolicies::default().with_max_row_count(7),
            Err(ConfigError::InvalidMaxRowCount(7))
        );

        // Should be ok
        let policies = MonthPolicies::default().with_max_row_count(1).unwrap();
        assert_eq!(policies.max_row_count(), 1);
        assert_eq!(policies.in_date_style(), InDateStyle::AllMonths);
        assert_eq!(policies.out_date_style(), OutDateStyle::EndOfRow);
        assert!(policies.has_boundaries());
    }

    #[test]
    fn config_new() {
        let start = year_month!(2022, 3);
        let end = year_month!(2022, 1);
        assert_eq!(
            MonthConfig::new(start, end, Weekday::Mon, MonthPolicies::default()),
            Err(ConfigError::InvalidRange { start, end })
        );

        let config =
            MonthConfig::new(end, start, Weekday::Mon, MonthPolicies::default()).unwrap();
        assert_eq!(config.month_count(), 3);
        assert_eq!(config.months().last(), Some(start));

        // A single month range is allowed
        let config = config.with_range(end, end).unwrap();
        assert_eq!(config.month_count(), 1);
        assert!(config.with_range(start, end).is_err());
    }

    #[test]
    fn in_date_requests() {
        let policies = MonthPolicies::default().with_in_date_style(InDateStyle::FirstMonthOnly);
        let config = MonthConfig::new(
            year_month!(2022, 1),
            year_month!(2022, 3),
            Weekday::Mon,
            policies,
        )
        .unwrap();
        assert!(config.has_in_dates(year_month!(2022, 1)));
        assert!(!config.has_in_dates(year_month!(2022, 2)));

        // Without boundaries the range's start is never padded
        let config = config.with_policies(policies.with_boundaries(false));
        assert!(config.requests_in_dates(year_month!(2022, 1)));
        assert!(!config.has_in_dates(year_month!(2022, 1)));
        assert!(config.suppresses_out_dates(year_month!(2022, 3)));
        assert!(!config.suppresses_out_dates(year_month!(2022, 2)));
    }

    #[test]
    fn same_layout() {
        let config = MonthConfig::new(
            year_month!(2022, 1),
            year_month!(2022, 3),
            Weekday::Mon,
            MonthPolicies::default(),
        )
        .unwrap();
        let shifted = config.with_range(year_month!(2022, 2), year_month!(2022, 9)).unwrap();
        assert!(config.has_same_layout(&shifted));
        assert!(!config.has_same_layout(&config.with_first_day_of_week(Weekday::Sun)));
        assert!(!config.has_same_layout(
            &config.with_policies(MonthPolicies::default().with_boundaries(false))
        ));
    }

    #[test]
    fn serde() {
        let config = MonthConfig::new(
            year_month!(2022, 1),
            year_month!(2022, 3),
            Weekday::Sun,
            MonthPolicies::default().with_out_date_style(OutDateStyle::EndOfGrid),
        )
        .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let loaded: MonthConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, config);

        // Invalid configurations are rejected on load
        let bad_range = json.replace(r#""month":3"#, r#""month":0"#);
        assert!(serde_json::from_str::<MonthConfig>(&bad_range).is_err());
        let bad_rows = json.replace(r#""max_row_count":6"#, r#""max_row_count":9"#);
        assert!(serde_json::from_str::<MonthConfig>(&bad_rows).is_err());
        let reversed = json
            .replace(r#""month":1"#, r#""month":X"#)
            .replace(r#""month":3"#, r#""month":1"#)
            .replace(r#""month":X"#, r#""month":3"#);
        assert!(serde_json::from_str::<MonthConfig>(&reversed).is_err());
    }
}
