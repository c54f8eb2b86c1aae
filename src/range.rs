use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, ParseError, RANGE_SEPARATOR, prelude::*};

/// Two calendar dates, both inclusive.
/// The start is never after the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{start} ~ {end}")]
pub struct DateRange {
    start: CalendarDate,
    end:   CalendarDate,
}

/// Error type for date range operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Start date is after end date.
    #[error("Invalid date range: start ({start}) is after end ({end})")]
    InvalidRange { start: CalendarDate, end: CalendarDate },

    /// Error parsing date component.
    #[error(transparent)]
    ParseError(#[from] ParseError),

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

impl DateRange {
    /// Creates a new date range with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if start > end.
    pub fn new(start: CalendarDate, end: CalendarDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the start date of the range
    pub const fn start(&self) -> CalendarDate {
        self.start
    }

    /// Returns the end date of the range
    pub const fn end(&self) -> CalendarDate {
        self.end
    }

    /// Checks if the range contains a given date, ends included
    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.start <= *date && *date <= self.end
    }
}

impl FromStr for DateRange {
    type Err = RangeError;

    /// Parses `start ~ end` where each side is a [`CalendarDate`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let separator = RANGE_SEPARATOR.trim();

        let separator_count = trimmed.matches(separator).count();
        match separator_count {
            0 => Err(RangeError::InvalidFormat(format!(
                "No range separator found (expected '{separator}'): {s}"
            ))),
            1 => {
                let (start_str, end_str) = trimmed.split_once(separator).ok_or_else(|| {
                    RangeError::InvalidFormat(format!("Separator '{separator}' not found despite count == 1"))
                })?;

                let start = start_str.trim().parse::<CalendarDate>()?;
                let end = end_str.trim().parse::<CalendarDate>()?;

                Self::new(start, end)
            },
            _ => Err(RangeError::InvalidFormat(format!(
                "Too many '{separator}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl Serialize for DateRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateRange {
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
    fn test_new_range_cases() {
        struct TestCase {
            start:          CalendarDate,
            end:            CalendarDate,
            should_succeed: bool,
            description:    &'static str,
        }

        let cases = [
            TestCase {
                start:          date(2019, 10, 9),
                end:            date(2020, 1, 2),
                should_succeed: true,
                description:    "valid range (start < end)",
            },
            TestCase {
                start:          date(2020, 1, 2),
                end:            date(2019, 10, 9),
                should_succeed: false,
                description:    "invalid range (start > end)",
            },
            TestCase {
                start:          date(2020, 1, 2),
                end:            date(2020, 1, 2),
                should_succeed: true,
                description:    "equal dates (start == end)",
            },
            TestCase {
                start:          datetime(2020, 1, 2, 12, 0, 0),
                end:            date(2020, 1, 2),
                should_succeed: false,
                description:    "same day, start later in the day",
            },
        ];

        for case in &cases {
            let range = DateRange::new(case.start, case.end);

            if case.should_succeed {
                assert!(range.is_ok(), "Expected success for: {}", case.description);
            } else {
                assert!(range.is_err(), "Expected failure for: {}", case.description);
            }
        }
    }

    #[test]
    fn test_accessors() {
        let start = date(2019, 10, 9);
        let end = date(2020, 1, 2);
        let range = DateRange::new(start, end).expect("failed to construct range for accessor test");

        assert_eq!(range.start(), start);
        assert_eq!(range.end(), end);
    }

    #[test]
    fn test_contains() {
        let start = date(2019, 10, 9);
        let end = date(2020, 1, 2);
        let range = DateRange::new(start, end).expect("failed to construct range for contains test");

        assert!(range.contains(&start));
        assert!(range.contains(&end));
        assert!(range.contains(&date(2019, 12, 25)));
        assert!(!range.contains(&date(2019, 10, 8)));
        assert!(!range.contains(&datetime(2020, 1, 2, 0, 0, 1)));
    }

    #[test]
    fn test_display() {
        let range = DateRange::new(date(2019, 10, 9), date(2020, 1, 2)).expect("display range");
        assert_eq!(range.to_string(), "2019-10-09 ~ 2020-01-02");
    }

    #[test]
    fn test_from_str() {
        let range = "2019-10-09 ~ 2020-01-02".parse::<DateRange>().expect("parse range");
        assert_eq!(range.start(), date(2019, 10, 9));
        assert_eq!(range.end(), date(2020, 1, 2));

        let tight = "2019-10-09~2020-01-02".parse::<DateRange>().expect("parse tight range");
        assert_eq!(tight, range);
    }

    #[test]
    fn test_from_str_errors() {
        assert!(matches!(
            "2020-01-02 ~ 2019-10-09".parse::<DateRange>(),
            Err(RangeError::InvalidRange { .. })
        ));
        assert!(matches!(
            "2019-10-09 2020-01-02".parse::<DateRange>(),
            Err(RangeError::InvalidFormat(_))
        ));
        assert!(matches!(
            "2019-10-09 ~ 2019-13-01".parse::<DateRange>(),
            Err(RangeError::ParseError(ParseError::InvalidMonth(13)))
        ));

        let err = "2019-01-01 ~ 2019-02-01 ~ 2019-03-01"
            .parse::<DateRange>()
            .expect_err("expected error for too many range separators");
        assert!(err.to_string().contains("expected 1, found 2"));
    }

    #[test]
    fn test_ordering() {
        let first = DateRange::new(date(2019, 1, 1), date(2019, 6, 1)).expect("first range");
        let longer = DateRange::new(date(2019, 1, 1), date(2019, 9, 1)).expect("longer range");
        let later = DateRange::new(date(2019, 2, 1), date(2019, 3, 1)).expect("later range");

        assert!(first < longer);
        assert!(longer < later);
    }

    #[test]
    fn test_serde_string_format() {
        let range = DateRange::new(date(2019, 10, 9), datetime(2020, 1, 2, 18, 30, 0)).expect("serde range");

        let json = serde_json::to_string(&range).expect("failed to serialize range to JSON");
        assert_eq!(json, r#""2019-10-09 ~ 2020-01-02 18:30:00""#);

        let parsed: DateRange = serde_json::from_str(&json).expect("failed to deserialize range from JSON");
        assert_eq!(range, parsed);
    }
}
