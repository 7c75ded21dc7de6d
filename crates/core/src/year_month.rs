// SPDX-License-Identifier: MIT

//!
//! The calendar grid year-month type
//!

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

/// The minimum year allowed in a calendar grid
pub const MIN_YEAR: i64 = -9999;

/// The maximum year allowed in a calendar grid
pub const MAX_YEAR: i64 = 9999;

/// Errors that can arise in relation to a [`YearMonth`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum YearMonthError {
    /// The month number is not allowed (must be 1 <= month <= 12)
    #[error("Month `{0}` is not allowed")]
    InvalidMonth(i64),

    /// The year number is not allowed (must be [`MIN_YEAR`] <= year <= [`MAX_YEAR`])
    #[error("Year `{0}` is not allowed")]
    InvalidYear(i64),

    /// The string isn't in `YYYY-MM` format
    #[error("`{0}` is not in YYYY-MM format")]
    Parse(String),
}

/// A year and month of the proleptic Gregorian calendar (e.g. January 2022).
///
/// Internally this is the first day of the month, which makes the ordering,
/// hashing and day arithmetic come for free.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// Create a new [`YearMonth`] if the result will be valid
    pub fn from(year: i64, month: i64) -> Result<Self, YearMonthError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(YearMonthError::InvalidYear(year));
        }
        if !(1..=12).contains(&month) {
            return Err(YearMonthError::InvalidMonth(month));
        }
        NaiveDate::from_ymd_opt(year as i32, month as u32, 1)
            .map(YearMonth)
            .ok_or(YearMonthError::InvalidYear(year))
    }

    /// The [`YearMonth`] the date falls in
    pub fn of(date: NaiveDate) -> Self {
        YearMonth(date - Days::new(u64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// 1 (January) to 12 (December)
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// The following month
    pub fn next(&self) -> Self {
        YearMonth(self.0 + Months::new(1))
    }

    /// The preceding month
    pub fn previous(&self) -> Self {
        YearMonth(self.0 - Months::new(1))
    }

    /// The 1st of the month
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// The last day of the month (e.g. the 29th of a leap February)
    pub fn last_day(&self) -> NaiveDate {
        self.next().0 - Days::new(1)
    }

    /// The number of days in the month
    pub fn length_of_month(&self) -> u32 {
        self.last_day().day()
    }

    /// Whether the date falls in this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        YearMonth::of(date) == *self
    }

    /// The number of months from `self` to `other` (negative if `other` is
    /// earlier)
    pub fn months_until(&self, other: YearMonth) -> i64 {
        let years = i64::from(other.year()) - i64::from(self.year());
        let months = i64::from(other.month()) - i64::from(self.month());
        years * 12 + months
    }

    /// Iterate over every month from `self` to `end` inclusive (empty if
    /// `end` is before `self`)
    pub fn iter_to(self, end: YearMonth) -> impl Iterator<Item = YearMonth> {
        let count = self.months_until(end) + 1;
        std::iter::successors(Some(self), |month| Some(month.next())).take(count.max(0) as usize)
    }
}

/// `YYYY-MM` format
impl Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthError;

    /// Parse `YYYY-MM` (a leading `-` is allowed for years before 1 BCE)
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let trimmed = string.trim();
        let parse_error = || YearMonthError::Parse(string.to_string());
        let (year, month) = trimmed.rsplit_once('-').ok_or_else(parse_error)?;
        if year.is_empty() || month.len() != 2 {
            return Err(parse_error());
        }
        let year = year.parse::<i64>().map_err(|_| parse_error())?;
        let month = month.parse::<i64>().map_err(|_| parse_error())?;
        YearMonth::from(year, month)
    }
}

/// Used only by the (de)serialisers
#[derive(Serialize, Deserialize)]
struct RawYearMonth {
    year: i64,
    month: i64,
}

impl Serialize for YearMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        RawYearMonth {
            year: i64::from(self.year()),
            month: i64::from(self.month()),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawYearMonth::deserialize(deserializer)?;
        YearMonth::from(raw.year, raw.month).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use calendar_grid_macros::{date, year_month};

    #[test]
    fn from() {
        // Should return error
        assert_eq!(YearMonth::from(2022, 0), Err(YearMonthError::InvalidMonth(0)));
        assert_eq!(YearMonth::from(2022, 13), Err(YearMonthError::InvalidMonth(13)));
        assert_eq!(
            YearMonth::from(99_999, 1),
            Err(YearMonthError::InvalidYear(99_999))
        );

        // Should be ok
        let month = YearMonth::from(2022, 1).unwrap();
        assert_eq!(month.year(), 2022);
        assert_eq!(month.month(), 1);
    }

    #[test]
    fn next_and_previous() {
        assert_eq!(year_month!(2021, 12).next(), year_month!(2022, 1));
        assert_eq!(year_month!(2022, 1).previous(), year_month!(2021, 12));
        assert_eq!(year_month!(2022, 6).next().previous(), year_month!(2022, 6));
    }

    #[test]
    fn month_bounds() {
        assert_eq!(year_month!(2022, 1).first_day(), date!(2022, 1, 1));
        assert_eq!(year_month!(2022, 1).last_day(), date!(2022, 1, 31));
        assert_eq!(year_month!(2024, 2).last_day(), date!(2024, 2, 29));
        assert_eq!(year_month!(2023, 2).last_day(), date!(2023, 2, 28));
        assert_eq!(year_month!(1900, 2).length_of_month(), 28);
        assert_eq!(year_month!(2000, 2).length_of_month(), 29);
        assert_eq!(year_month!(2022, 4).length_of_month(), 30);
        assert_eq!(year_month!(2022, 12).last_day(), date!(2022, 12, 31));
        assert_eq!(year_month!(9999, 12).last_day(), date!(9999, 12, 31));
    }

    #[test]
    fn of_and_contains() {
        assert_eq!(YearMonth::of(date!(2022, 3, 17)), year_month!(2022, 3));
        assert!(year_month!(2022, 3).contains(date!(2022, 3, 31)));
        assert!(!year_month!(2022, 3).contains(date!(2022, 4, 1)));
    }

    #[test]
    fn months_until_and_iter_to() {
        let start = year_month!(2021, 11);
        let end = year_month!(2022, 2);
        assert_eq!(start.months_until(end), 3);
        assert_eq!(end.months_until(start), -3);

        let months: Vec<YearMonth> = start.iter_to(end).collect();
        assert_eq!(
            months,
            vec![
                year_month!(2021, 11),
                year_month!(2021, 12),
                year_month!(2022, 1),
                year_month!(2022, 2),
            ]
        );
        assert_eq!(end.iter_to(start).count(), 0);
    }

    #[test]
    fn display_and_parse() {
        assert_eq!(year_month!(2022, 1).to_string(), "2022-01");
        assert_eq!("2022-01".parse::<YearMonth>(), Ok(year_month!(2022, 1)));
        assert!("2022-1".parse::<YearMonth>().is_err());
        assert!("2022".parse::<YearMonth>().is_err());
        assert!("2022-13".parse::<YearMonth>().is_err());
    }

    #[test]
    fn serde() {
        let json = serde_json::to_string(&year_month!(2022, 1)).unwrap();
        assert_eq!(json, r#"{"year":2022,"month":1}"#);
        let month: YearMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(month, year_month!(2022, 1));
        assert!(serde_json::from_str::<YearMonth>(r#"{"year":2022,"month":13}"#).is_err());
    }
}
