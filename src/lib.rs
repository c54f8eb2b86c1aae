mod codec;
mod consts;
mod format;
mod grid;
mod locale;
pub mod math;
mod panel;
mod picker;
mod prelude;
mod range;
mod selection;
mod types;
mod value;

#[cfg(test)]
mod test_utils;

pub use codec::{Arity, InputError, InputField, TextCodec};
pub use consts::*;
pub use format::{ChronoFormatter, DateFormatter};
pub use grid::{
    CellClassFn, CellTag, Grid, GridCell, GridContext, GridRow, HeaderLabel, YearWindow,
    build_grid, decade_window,
};
pub use locale::{Locale, LocaleError, LocaleOverrides, LocaleRegistry};
pub use panel::{Emission, Navigation, PanelState, PanelType, PickRules, PickerType, SelectionTag, Transition};
pub use picker::{Picker, PickerEvent, PickerOptions, Shortcut};
pub use range::{DateRange, RangeError};
pub use selection::{PickError, PickResult, Resolution, commit_range, is_valid_range, pick, resolve};
pub use types::{Month, WeekStart};
pub use value::{PickerValue, SelectionMode, ValueSet, ValueType};

use crate::prelude::*;
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use std::fmt;
use std::str::FromStr;

/// Caller-supplied veto: `true` means the date cannot be selected.
pub type DateFilter<'a> = dyn Fn(&CalendarDate) -> bool + 'a;

/// A point in time on the proleptic Gregorian calendar, without a time zone.
///
/// Values are truncated to day, month or year granularity by [`math::truncate`]
/// as the picker type requires. A `CalendarDate` is always valid: text that
/// does not describe a real date never becomes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
pub struct CalendarDate(NaiveDateTime);

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(i32),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: i32, month: u8, day: u8 },
    #[display(fmt = "Invalid time: {_0}")]
    InvalidTime(String),
    #[display(fmt = "Invalid first day of week: {} (must be 0-6)", "_0")]
    InvalidWeekStart(u8),
    #[display(fmt = "Date is outside the supported range")]
    OutOfRange,
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl CalendarDate {
    /// Earliest representable date
    pub const MIN: Self = Self(NaiveDateTime::MIN);
    /// Latest representable date
    pub const MAX: Self = Self(NaiveDateTime::MAX);

    /// Creates a date at midnight, validating every component.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth`/`InvalidDay` for impossible components
    /// and `ParseError::OutOfRange` for years chrono cannot represent.
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, ParseError> {
        let month = Month::new(month)?;
        NaiveDate::from_ymd_opt(year, u32::from(month.get()), u32::from(day))
            .map(Self::from_date)
            .ok_or_else(|| {
                if NaiveDate::from_ymd_opt(year, 1, 1).is_some() {
                    ParseError::InvalidDay {
                        year,
                        month: month.get(),
                        day,
                    }
                } else {
                    ParseError::OutOfRange
                }
            })
    }

    /// Creates a date with a time of day.
    ///
    /// # Errors
    /// Same as [`CalendarDate::from_ymd`], plus `ParseError::InvalidTime`.
    pub fn from_ymd_hms(
        year: i32,
        month: u8,
        day: u8,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, ParseError> {
        let date = Self::from_ymd(year, month, day)?;
        let time = NaiveTime::from_hms_opt(hour, minute, second)
            .ok_or_else(|| ParseError::InvalidTime(format!("{hour:02}:{minute:02}:{second:02}")))?;
        Ok(Self(date.0.date().and_time(time)))
    }

    /// Midnight of a chrono date
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN))
    }

    /// The local current day, truncated to midnight
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// The local current instant
    pub fn now() -> Self {
        Self(Local::now().naive_local())
    }

    /// Interprets milliseconds since the Unix epoch as a wall-clock instant.
    pub fn from_timestamp_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(|dt| Self(dt.naive_utc()))
    }

    /// Milliseconds since the Unix epoch of this wall-clock instant.
    pub fn timestamp_millis(&self) -> i64 {
        self.0.and_utc().timestamp_millis()
    }

    #[inline]
    pub const fn naive(&self) -> NaiveDateTime {
        self.0
    }

    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    #[inline]
    pub fn time(&self) -> NaiveTime {
        self.0.time()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month as 1..=12
    pub fn month(&self) -> u8 {
        self.month_typed().get()
    }

    pub fn month_typed(&self) -> Month {
        Month::of(&self.0)
    }

    /// Day of month as 1..=31
    pub fn day(&self) -> u8 {
        u8::try_from(self.0.day()).unwrap_or(MIN_DAY)
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    pub fn is_midnight(&self) -> bool {
        self.0.time() == NaiveTime::MIN
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())?;
        if !self.is_midnight() {
            write!(
                f,
                "{DATE_TIME_SEPARATOR}{:02}:{:02}:{:02}",
                self.hour(),
                self.minute(),
                self.second()
            )?;
        }
        Ok(())
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    /// Parses `YYYY-MM-DD`, optionally followed by ` HH:MM[:SS]` or `THH:MM[:SS]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let (date_part, time_part) = match trimmed.split_once([DATE_TIME_SEPARATOR, 'T']) {
            Some((date, time)) => (date.trim(), Some(time.trim())),
            None => (trimmed, None),
        };

        let parts: Vec<&str> = date_part.split(DATE_SEPARATOR).map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ParseError::InvalidFormat(format!(
                "Expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, found {date_part}"
            )));
        }
        let year = Self::parse_year(parts[0])?;
        let month = Self::parse_u8(parts[1])?;
        let day = Self::parse_u8(parts[2])?;

        match time_part {
            None => Self::from_ymd(year, month, day),
            Some(time) => {
                let (hour, minute, second) = Self::parse_time(time)?;
                Self::from_ymd_hms(year, month, day, hour, minute, second)
            }
        }
    }
}

impl CalendarDate {
    /// Helper to parse a year within `MIN_YEAR..=MAX_YEAR`
    fn parse_year(s: &str) -> Result<i32, ParseError> {
        let year = s
            .parse::<i32>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ParseError::InvalidYear(year));
        }
        Ok(year)
    }

    /// Helper to parse u8 with better error messages
    fn parse_u8(s: &str) -> Result<u8, ParseError> {
        s.parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }

    fn parse_time(s: &str) -> Result<(u32, u32, u32), ParseError> {
        let parts = s
            .split(TIME_SEPARATOR)
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ParseError::InvalidTime(s.to_owned()))?;
        match parts.as_slice() {
            [hour, minute] => Ok((*hour, *minute, 0)),
            [hour, minute, second] => Ok((*hour, *minute, *second)),
            _ => Err(ParseError::InvalidTime(s.to_owned())),
        }
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
    use crate::test_utils::{date, datetime};

    #[test]
    fn test_from_ymd_valid() {
        let d = CalendarDate::from_ymd(2024, 2, 29).expect("leap day");
        assert_eq!((d.year(), d.month(), d.day()), (2024, 2, 29));
        assert!(d.is_midnight());
    }

    #[test]
    fn test_from_ymd_invalid() {
        assert!(matches!(
            CalendarDate::from_ymd(2023, 2, 29),
            Err(ParseError::InvalidDay { .. })
        ));
        assert!(matches!(
            CalendarDate::from_ymd(2023, 13, 1),
            Err(ParseError::InvalidMonth(13))
        ));
    }

    #[test]
    fn test_from_ymd_hms_invalid_time() {
        let result = CalendarDate::from_ymd_hms(2024, 1, 1, 24, 0, 0);
        assert!(matches!(result, Err(ParseError::InvalidTime(_))));
    }

    #[test]
    fn test_parse_date_only() {
        let d = "2019-10-09".parse::<CalendarDate>().expect("parse date");
        assert_eq!(d, date(2019, 10, 9));
    }

    #[test]
    fn test_parse_with_time() {
        let d = "2019-10-09 08:30".parse::<CalendarDate>().expect("parse date time");
        assert_eq!(d, datetime(2019, 10, 9, 8, 30, 0));

        let d = "2019-10-09T08:30:15".parse::<CalendarDate>().expect("parse iso date time");
        assert_eq!(d, datetime(2019, 10, 9, 8, 30, 15));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("".parse::<CalendarDate>(), Err(ParseError::EmptyInput)));
        assert!(matches!(
            "2019-10".parse::<CalendarDate>(),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            "0-01-01".parse::<CalendarDate>(),
            Err(ParseError::InvalidYear(0))
        ));
        assert!(matches!(
            "2019-02-30".parse::<CalendarDate>(),
            Err(ParseError::InvalidDay { .. })
        ));
        assert!(matches!(
            "2019-02-03 25:00".parse::<CalendarDate>(),
            Err(ParseError::InvalidTime(_))
        ));
        assert!(matches!(
            "2019-02-03 noon".parse::<CalendarDate>(),
            Err(ParseError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(date(2024, 3, 7).to_string(), "2024-03-07");
        assert_eq!(datetime(2024, 3, 7, 9, 5, 0).to_string(), "2024-03-07 09:05:00");
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for d in [date(1999, 12, 31), datetime(2000, 2, 29, 23, 59, 59)] {
            assert_eq!(d.to_string().parse::<CalendarDate>(), Ok(d));
        }
    }

    #[test]
    fn test_ordering() {
        assert!(date(2020, 1, 1) < date(2020, 1, 2));
        assert!(date(2020, 1, 2) < datetime(2020, 1, 2, 0, 0, 1));
    }

    #[test]
    fn test_timestamp_round_trip() {
        let d = datetime(2021, 6, 15, 12, 0, 0);
        let millis = d.timestamp_millis();
        assert_eq!(CalendarDate::from_timestamp_millis(millis), Some(d));
        assert_eq!(date(1970, 1, 1).timestamp_millis(), 0);
    }

    #[test]
    fn test_weekday() {
        // 2024-01-01 was a Monday
        assert_eq!(date(2024, 1, 1).weekday(), Weekday::Mon);
    }

    #[test]
    fn test_today_is_midnight() {
        assert!(CalendarDate::today().is_midnight());
    }

    #[test]
    fn test_serde() {
        let d = date(1991, 8, 15);
        let json = serde_json::to_string(&d).expect("serialize date");
        assert_eq!(json, r#""1991-08-15""#);

        let parsed: CalendarDate = serde_json::from_str(&json).expect("deserialize date");
        assert_eq!(d, parsed);
        assert!(serde_json::from_str::<CalendarDate>(r#""1991-02-30""#).is_err());
    }
}
