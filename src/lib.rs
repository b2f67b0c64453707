//! Date entry core: a text codec for six display formats plus canonical
//! `YYYY-MM-DD`, a fixed 6×7 month grid, locale labels, and the state machine
//! behind a popup date picker bound to an externally controlled value.

mod config;
mod consts;
mod format;
mod grid;
mod locale;
mod picker;
mod prelude;
mod types;

pub use config::{ConfigError, PickerConfig};
pub use consts::*;
pub use format::{
    DisplayFormat, FieldOrder, Separator, format, format_canonical, parse, parse_canonical,
};
pub use grid::{CellKind, Direction, MonthGrid, clamp_anchor, navigate_month, year_window};
pub use locale::{Language, LocaleTag, month_label, today_label, weekday_labels};
pub use picker::{
    ChangeEvent, ChangeTarget, Clock, DatePicker, DayCell, MonthView, NoPointerHost, PickerEvent,
    PickerMode, PickerState, PointerHost, Subscription, SystemClock,
};
pub use types::{Day, Month, Year, days_in_month, is_leap_year};

use crate::prelude::*;
use chrono::{Datelike, Days, NaiveDate};
use std::str::FromStr;

/// A real Gregorian calendar day with no time-of-day component.
///
/// Field order makes the derived ordering chronological. `Display` renders the
/// canonical interchange text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{year}-{month}-{day}")]
pub struct CalendarDate {
    year: Year,
    month: Month,
    day: Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(i64),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u32),
    #[display(fmt = "Invalid day {day} for month {year:04}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u32 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl CalendarDate {
    /// 0001-01-01, the earliest representable date.
    pub const MIN: Self = Self {
        year: Year::MIN,
        month: Month::JANUARY,
        day: Day::FIRST,
    };

    /// Creates a date from already validated components.
    pub const fn from_typed(year: Year, month: Month, day: Day) -> Self {
        Self { year, month, day }
    }

    /// Creates a date, rejecting anything that is not a real Gregorian day.
    ///
    /// # Errors
    /// Returns the `ParseError` of the first component that fails validation.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        let year = Year::new(year)?;
        let month = Month::new(month)?;
        let day = Day::new(day, year, month)?;
        Ok(Self { year, month, day })
    }

    /// Creates a date from raw numeric fields as read out of text.
    ///
    /// # Errors
    /// Returns a `ParseError` when the triple does not name an existing day,
    /// e.g. 30 February or month 13.
    pub fn from_parts(year: i64, month: u32, day: u32) -> Result<Self, ParseError> {
        let year = Year::from_wide(year)?;
        let month = u8::try_from(month)
            .map_err(|_| ParseError::InvalidMonth(month))
            .and_then(Month::new)?;
        let invalid_day = ParseError::InvalidDay {
            year: year.get(),
            month: month.get(),
            day,
        };
        let day = u8::try_from(day)
            .map_err(|_| invalid_day)
            .and_then(|d| Day::new(d, year, month))?;
        Ok(Self { year, month, day })
    }

    /// Returns the year component.
    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    /// Returns the month component, 1-based.
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// Returns the day-of-month component.
    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// Returns the validated year.
    pub const fn year_typed(&self) -> Year {
        self.year
    }

    /// Returns the validated month.
    pub const fn month_typed(&self) -> Month {
        self.month
    }

    /// Returns the validated day.
    pub const fn day_typed(&self) -> Day {
        self.day
    }

    /// The first day of this date's month.
    pub const fn first_of_month(&self) -> Self {
        Self {
            day: Day::FIRST,
            ..*self
        }
    }

    /// Same month and day in `year`; 29 February becomes the 28th in common years.
    pub fn with_year(&self, year: Year) -> Self {
        Self {
            year,
            month: self.month,
            day: self.day.min(Day::last_of(year, self.month)),
        }
    }

    /// Shifts by whole months, letting the year roll over and clamping the day
    /// to the target month's length. Returns `None` outside the supported years.
    pub fn checked_add_months(&self, delta: i32) -> Option<Self> {
        let index = i64::from(self.year()) * 12 + i64::from(self.month.index0()) + i64::from(delta);
        let year = Year::from_wide(index.div_euclid(12)).ok()?;
        let month = u8::try_from(index.rem_euclid(12) + 1)
            .ok()
            .and_then(|m| Month::new(m).ok())?;
        Some(Self {
            year,
            month,
            day: self.day.min(Day::last_of(year, month)),
        })
    }

    /// Moves by `days` (negative moves backwards). Returns `None` outside the supported years.
    pub fn checked_add_days(&self, days: i64) -> Option<Self> {
        let naive = self.to_naive()?;
        let shifted = if days >= 0 {
            naive.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            naive.checked_sub_days(Days::new(days.unsigned_abs()))
        }?;
        Self::from_naive(shifted)
    }

    /// Day of week with 0 = Sunday.
    pub fn weekday_from_sunday(&self) -> u32 {
        self.to_naive()
            .map_or(0, |d| d.weekday().num_days_from_sunday())
    }

    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year()),
            u32::from(self.month()),
            u32::from(self.day()),
        )
    }

    pub fn from_naive(date: NaiveDate) -> Option<Self> {
        Self::from_parts(i64::from(date.year()), date.month(), date.day()).ok()
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    /// Strict canonical `YYYY-MM-DD` parsing with a reason on failure.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        let (year, month, day) = format::split_canonical(trimmed)
            .ok_or_else(|| ParseError::InvalidFormat(trimmed.to_owned()))?;
        Self::from_parts(year, month, day)
    }
}

impl TryFrom<(u16, u8, u8)> for CalendarDate {
    type Error = ParseError;

    fn try_from((year, month, day): (u16, u8, u8)) -> Result<Self, Self::Error> {
        Self::new(year, month, day)
    }
}

impl From<CalendarDate> for (u16, u8, u8) {
    fn from(date: CalendarDate) -> Self {
        (date.year(), date.month(), date.day())
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rejects_impossible_dates() {
        assert!(CalendarDate::new(2024, 2, 29).is_ok());
        assert!(matches!(
            CalendarDate::new(2023, 2, 29),
            Err(ParseError::InvalidDay { .. })
        ));
        assert!(matches!(
            CalendarDate::new(2024, 13, 1),
            Err(ParseError::InvalidMonth(13))
        ));
        assert!(matches!(
            CalendarDate::new(0, 1, 1),
            Err(ParseError::InvalidYear(0))
        ));
    }

    #[test]
    fn test_from_parts_out_of_range_fields() {
        assert!(matches!(
            CalendarDate::from_parts(2024, 300, 1),
            Err(ParseError::InvalidMonth(300))
        ));
        assert!(matches!(
            CalendarDate::from_parts(2024, 1, 300),
            Err(ParseError::InvalidDay { day: 300, .. })
        ));
        assert!(matches!(
            CalendarDate::from_parts(12_345, 1, 1),
            Err(ParseError::InvalidYear(12_345))
        ));
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(date(2024, 3, 5).to_string(), "2024-03-05");
        assert_eq!(date(7, 11, 30).to_string(), "0007-11-30");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("2024-03-15".parse::<CalendarDate>().unwrap(), date(2024, 3, 15));
        assert!(matches!(
            "".parse::<CalendarDate>(),
            Err(ParseError::EmptyInput)
        ));
        assert!(matches!(
            "15/03/2024".parse::<CalendarDate>(),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            "2024-02-30".parse::<CalendarDate>(),
            Err(ParseError::InvalidDay { .. })
        ));
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(date(2023, 12, 31) < date(2024, 1, 1));
        assert!(date(2024, 1, 31) < date(2024, 2, 1));
        assert!(date(2024, 2, 1) < date(2024, 2, 2));
    }

    #[test]
    fn test_checked_add_months_rolls_year_and_clamps_day() {
        assert_eq!(date(2024, 1, 15).checked_add_months(-1), Some(date(2023, 12, 15)));
        assert_eq!(date(2023, 12, 1).checked_add_months(1), Some(date(2024, 1, 1)));
        assert_eq!(date(2024, 1, 31).checked_add_months(1), Some(date(2024, 2, 29)));
        assert_eq!(date(1, 1, 1).checked_add_months(-1), None);
        assert_eq!(date(9999, 12, 1).checked_add_months(1), None);
    }

    #[test]
    fn test_checked_add_days() {
        assert_eq!(date(2024, 2, 28).checked_add_days(1), Some(date(2024, 2, 29)));
        assert_eq!(date(2024, 3, 1).checked_add_days(-1), Some(date(2024, 2, 29)));
        assert_eq!(date(2023, 12, 31).checked_add_days(1), Some(date(2024, 1, 1)));
        assert_eq!(CalendarDate::MIN.checked_add_days(-1), None);
    }

    #[test]
    fn test_with_year_clamps_leap_day() {
        let leap_day = date(2024, 2, 29);
        assert_eq!(leap_day.with_year(Year::new(2023).unwrap()), date(2023, 2, 28));
        assert_eq!(leap_day.with_year(Year::new(2028).unwrap()), date(2028, 2, 29));
    }

    #[test]
    fn test_weekday_from_sunday() {
        assert_eq!(date(2023, 1, 1).weekday_from_sunday(), 0);
        assert_eq!(date(2024, 3, 15).weekday_from_sunday(), 5);
        assert_eq!(date(1, 1, 1).weekday_from_sunday(), 1);
    }

    #[test]
    fn test_first_of_month() {
        assert_eq!(date(2024, 3, 15).first_of_month(), date(2024, 3, 1));
    }

    #[test]
    fn test_tuple_conversions() {
        let d: CalendarDate = (2024, 3, 15).try_into().unwrap();
        assert_eq!(d, date(2024, 3, 15));
        let (y, m, dd): (u16, u8, u8) = d.into();
        assert_eq!((y, m, dd), (2024, 3, 15));
        let bad: Result<CalendarDate, _> = (2024, 2, 30).try_into();
        assert!(bad.is_err());
    }

    #[test]
    fn test_serde_string_format() {
        let d = date(1991, 8, 15);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#""1991-08-15""#);
        let parsed: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, d);
    }

    #[test]
    fn test_serde_validation() {
        for bad in [r#""2024-02-30""#, r#""2024-13-01""#, r#""15/08/1991""#, r#""""#] {
            let result: Result<CalendarDate, _> = serde_json::from_str(bad);
            assert!(result.is_err(), "{bad} should be rejected");
        }
    }
}
