use crate::format::DateFormatter;
use crate::math::truncate;
use crate::panel::PanelType;
use crate::range::{DateRange, RangeError};
use crate::{CalendarDate, DateFilter};
use serde::{Deserialize, Serialize};

/// How many dates a picker commits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Single,
    Range,
    Multiple,
}

/// The committed selection, shaped by [`SelectionMode`].
///
/// A `Multi` always holds at least one date, without duplicates, in the
/// order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "dates", rename_all = "lowercase")]
pub enum ValueSet {
    #[default]
    Empty,
    Single(CalendarDate),
    Range(DateRange),
    Multi(Vec<CalendarDate>),
}

impl ValueSet {
    /// Builds a `Multi`, dropping duplicates; no dates gives `Empty`.
    pub fn from_multi(dates: impl IntoIterator<Item = CalendarDate>) -> Self {
        let mut unique: Vec<CalendarDate> = Vec::new();
        for date in dates {
            if !unique.contains(&date) {
                unique.push(date);
            }
        }
        if unique.is_empty() {
            Self::Empty
        } else {
            Self::Multi(unique)
        }
    }

    /// Shapes parsed or decoded dates for `mode`.
    ///
    /// # Errors
    /// Returns `RangeError` when range dates are out of order or not a pair.
    pub fn from_dates(mode: SelectionMode, dates: Vec<CalendarDate>) -> Result<Self, RangeError> {
        match mode {
            SelectionMode::Single => Ok(dates.first().copied().map_or(Self::Empty, Self::Single)),
            SelectionMode::Multiple => Ok(Self::from_multi(dates)),
            SelectionMode::Range => match dates.as_slice() {
                [] => Ok(Self::Empty),
                [start, end] => DateRange::new(*start, *end).map(Self::Range),
                other => Err(RangeError::InvalidFormat(format!(
                    "expected 2 dates, found {}",
                    other.len()
                ))),
            },
        }
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Single(_) => 1,
            Self::Range(_) => 2,
            Self::Multi(dates) => dates.len(),
        }
    }

    /// All members, in display order
    pub fn to_vec(&self) -> Vec<CalendarDate> {
        match self {
            Self::Empty => Vec::new(),
            Self::Single(date) => vec![*date],
            Self::Range(range) => vec![range.start(), range.end()],
            Self::Multi(dates) => dates.clone(),
        }
    }

    /// The only member, when there is exactly one.
    pub fn sole(&self) -> Option<CalendarDate> {
        match self {
            Self::Single(date) => Some(*date),
            Self::Multi(dates) if dates.len() == 1 => dates.first().copied(),
            _ => None,
        }
    }

    /// The most recently added member
    pub fn last(&self) -> Option<CalendarDate> {
        match self {
            Self::Empty => None,
            Self::Single(date) => Some(*date),
            Self::Range(range) => Some(range.end()),
            Self::Multi(dates) => dates.last().copied(),
        }
    }

    /// Exact membership
    pub fn contains(&self, date: &CalendarDate) -> bool {
        match self {
            Self::Empty => false,
            Self::Single(d) => d == date,
            Self::Range(range) => range.start() == *date || range.end() == *date,
            Self::Multi(dates) => dates.contains(date),
        }
    }

    /// Membership, counting every date inside a range as covered.
    pub fn covers(&self, date: &CalendarDate) -> bool {
        match self {
            Self::Range(range) => range.contains(date),
            _ => self.contains(date),
        }
    }

    /// Adds `date`, or removes it when already present.
    pub fn toggled(&self, date: CalendarDate) -> Self {
        let mut dates = self.to_vec();
        match dates.iter().position(|d| *d == date) {
            Some(index) => {
                dates.remove(index);
            },
            None => dates.push(date),
        }
        Self::from_multi(dates)
    }

    /// Every member truncated to `granularity`.
    pub fn truncated(&self, granularity: PanelType) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Single(date) => Self::Single(truncate(*date, granularity)),
            Self::Range(range) => DateRange::new(
                truncate(range.start(), granularity),
                truncate(range.end(), granularity),
            )
            .map_or(Self::Empty, Self::Range),
            Self::Multi(dates) => Self::from_multi(dates.iter().map(|d| truncate(*d, granularity))),
        }
    }

    /// Whether this shape is one `mode` can hold.
    pub const fn fits(&self, mode: SelectionMode) -> bool {
        matches!(
            (self, mode),
            (Self::Empty, _)
                | (Self::Single(_), SelectionMode::Single)
                | (Self::Range(_), SelectionMode::Range)
                | (Self::Multi(_), SelectionMode::Multiple)
        )
    }

    /// Fits `mode` and no member is vetoed.
    pub fn is_valid(&self, mode: SelectionMode, disabled: &DateFilter<'_>) -> bool {
        self.fits(mode) && !self.to_vec().iter().any(disabled)
    }
}

/// How the host represents a single date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// The date itself
    #[default]
    Date,
    /// Milliseconds since the Unix epoch
    Timestamp,
    /// Text in the picker's display format
    Format,
    /// Text in a dedicated pattern
    Pattern(String),
}

/// A date as the host stores it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PickerValue {
    Date(CalendarDate),
    Timestamp(i64),
    Text(String),
}

impl ValueType {
    fn pattern<'a>(&'a self, format: &'a str) -> &'a str {
        match self {
            Self::Pattern(pattern) => pattern,
            _ => format,
        }
    }

    pub fn encode(&self, date: CalendarDate, formatter: &dyn DateFormatter, format: &str) -> PickerValue {
        match self {
            Self::Date => PickerValue::Date(date),
            Self::Timestamp => PickerValue::Timestamp(date.timestamp_millis()),
            Self::Format | Self::Pattern(_) => {
                PickerValue::Text(formatter.format(&date, self.pattern(format)))
            }
        }
    }

    /// `None` when the value does not match this type or does not parse.
    pub fn decode(
        &self,
        value: &PickerValue,
        formatter: &dyn DateFormatter,
        format: &str,
    ) -> Option<CalendarDate> {
        match (self, value) {
            (Self::Date, PickerValue::Date(date)) => Some(*date),
            (Self::Timestamp, PickerValue::Timestamp(millis)) => {
                CalendarDate::from_timestamp_millis(*millis)
            }
            (Self::Format | Self::Pattern(_), PickerValue::Text(text)) => {
                formatter.parse(text, self.pattern(format))
            }
            _ => None,
        }
    }

    pub fn encode_set(
        &self,
        value: &ValueSet,
        formatter: &dyn DateFormatter,
        format: &str,
    ) -> Vec<PickerValue> {
        value
            .to_vec()
            .into_iter()
            .map(|date| self.encode(date, formatter, format))
            .collect()
    }

    /// Host values to a `ValueSet`. Values that do not decode are dropped;
    /// a range with a missing or out-of-order end is treated as empty.
    pub fn decode_set(
        &self,
        mode: SelectionMode,
        values: &[PickerValue],
        formatter: &dyn DateFormatter,
        format: &str,
    ) -> ValueSet {
        let decode = |v: &PickerValue| self.decode(v, formatter, format);
        match mode {
            SelectionMode::Range => {
                let ends: Vec<Option<CalendarDate>> = values.iter().take(2).map(decode).collect();
                match ends.as_slice() {
                    [Some(start), Some(end)] => DateRange::new(*start, *end)
                        .map_or(ValueSet::Empty, ValueSet::Range),
                    _ => ValueSet::Empty,
                }
            }
            SelectionMode::Multiple => ValueSet::from_multi(values.iter().filter_map(decode)),
            SelectionMode::Single => values
                .first()
                .and_then(decode)
                .map_or(ValueSet::Empty, ValueSet::Single),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ChronoFormatter;
    use crate::test_utils::{date, datetime, never};

    fn range(start: CalendarDate, end: CalendarDate) -> ValueSet {
        ValueSet::Range(DateRange::new(start, end).expect("ordered test range"))
    }

    #[test]
    fn test_from_multi_dedups_and_keeps_order() {
        let value = ValueSet::from_multi([date(2021, 3, 2), date(2021, 1, 1), date(2021, 3, 2)]);
        assert_eq!(value, ValueSet::Multi(vec![date(2021, 3, 2), date(2021, 1, 1)]));
        assert_eq!(ValueSet::from_multi([]), ValueSet::Empty);
    }

    #[test]
    fn test_from_dates_by_mode() {
        let a = date(2021, 1, 1);
        let b = date(2021, 2, 1);

        assert_eq!(
            ValueSet::from_dates(SelectionMode::Single, vec![a]),
            Ok(ValueSet::Single(a))
        );
        assert_eq!(ValueSet::from_dates(SelectionMode::Range, vec![a, b]), Ok(range(a, b)));
        assert!(matches!(
            ValueSet::from_dates(SelectionMode::Range, vec![b, a]),
            Err(RangeError::InvalidRange { .. })
        ));
        assert!(matches!(
            ValueSet::from_dates(SelectionMode::Range, vec![a]),
            Err(RangeError::InvalidFormat(_))
        ));
        assert_eq!(ValueSet::from_dates(SelectionMode::Range, vec![]), Ok(ValueSet::Empty));
    }

    #[test]
    fn test_toggled_adds_then_removes() {
        let d = date(2021, 5, 5);
        let once = ValueSet::Empty.toggled(d);
        assert_eq!(once, ValueSet::Multi(vec![d]));
        assert_eq!(once.toggled(d), ValueSet::Empty);
    }

    #[test]
    fn test_toggled_preserves_insertion_order() {
        let value = ValueSet::Empty
            .toggled(date(2021, 5, 9))
            .toggled(date(2021, 5, 1))
            .toggled(date(2021, 5, 4));
        assert_eq!(
            value.to_vec(),
            vec![date(2021, 5, 9), date(2021, 5, 1), date(2021, 5, 4)]
        );
    }

    #[test]
    fn test_sole_and_last() {
        let a = date(2021, 1, 1);
        let b = date(2021, 1, 2);
        assert_eq!(ValueSet::Single(a).sole(), Some(a));
        assert_eq!(ValueSet::Multi(vec![a]).sole(), Some(a));
        assert_eq!(ValueSet::Multi(vec![a, b]).sole(), None);
        assert_eq!(range(a, b).sole(), None);
        assert_eq!(range(a, b).last(), Some(b));
        assert_eq!(ValueSet::Empty.last(), None);
    }

    #[test]
    fn test_covers_range_inclusive() {
        let value = range(date(2021, 1, 10), date(2021, 1, 20));
        assert!(value.covers(&date(2021, 1, 10)));
        assert!(value.covers(&date(2021, 1, 15)));
        assert!(value.covers(&date(2021, 1, 20)));
        assert!(!value.covers(&date(2021, 1, 21)));
        assert!(!value.contains(&date(2021, 1, 15)));
    }

    #[test]
    fn test_truncated() {
        let value = ValueSet::Multi(vec![datetime(2021, 7, 19, 10, 0, 0), date(2021, 7, 3)]);
        assert_eq!(
            value.truncated(PanelType::Month),
            ValueSet::Multi(vec![date(2021, 7, 1)])
        );
        assert_eq!(
            ValueSet::Single(datetime(2021, 7, 19, 10, 0, 0)).truncated(PanelType::Day),
            ValueSet::Single(date(2021, 7, 19))
        );
    }

    #[test]
    fn test_fits_and_is_valid() {
        let d = date(2021, 1, 1);
        assert!(ValueSet::Empty.fits(SelectionMode::Range));
        assert!(ValueSet::Single(d).fits(SelectionMode::Single));
        assert!(!ValueSet::Single(d).fits(SelectionMode::Multiple));
        assert!(ValueSet::Single(d).is_valid(SelectionMode::Single, &never));

        let no_new_year = |c: &CalendarDate| *c == date(2021, 1, 1);
        assert!(!ValueSet::Single(d).is_valid(SelectionMode::Single, &no_new_year));
    }

    #[test]
    fn test_value_set_serde() {
        let value = ValueSet::Multi(vec![date(2021, 1, 1), date(2021, 1, 3)]);
        let json = serde_json::to_string(&value).expect("serialize value set");
        assert_eq!(json, r#"{"kind":"multi","dates":["2021-01-01","2021-01-03"]}"#);
        let parsed: ValueSet = serde_json::from_str(&json).expect("deserialize value set");
        assert_eq!(parsed, value);

        let empty = serde_json::to_string(&ValueSet::Empty).expect("serialize empty");
        assert_eq!(empty, r#"{"kind":"empty"}"#);
    }

    #[test]
    fn test_value_type_encode_decode() {
        let fmt = ChronoFormatter;
        let d = date(2021, 3, 4);

        let stamp = ValueType::Timestamp.encode(d, &fmt, "%Y-%m-%d");
        assert_eq!(ValueType::Timestamp.decode(&stamp, &fmt, "%Y-%m-%d"), Some(d));

        let text = ValueType::Format.encode(d, &fmt, "%d/%m/%Y");
        assert_eq!(text, PickerValue::Text("04/03/2021".to_owned()));
        assert_eq!(ValueType::Format.decode(&text, &fmt, "%d/%m/%Y"), Some(d));

        let custom = ValueType::Pattern("%Y%m%d".to_owned());
        assert_eq!(
            custom.encode(d, &fmt, "%Y-%m-%d"),
            PickerValue::Text("20210304".to_owned())
        );

        // A timestamp handed to a date-typed picker is not a date.
        assert_eq!(ValueType::Date.decode(&stamp, &fmt, "%Y-%m-%d"), None);
    }

    #[test]
    fn test_decode_set() {
        let fmt = ChronoFormatter;
        let values = vec![
            PickerValue::Text("2021-01-05".to_owned()),
            PickerValue::Text("not a date".to_owned()),
            PickerValue::Text("2021-01-02".to_owned()),
        ];

        assert_eq!(
            ValueType::Format.decode_set(SelectionMode::Multiple, &values, &fmt, "%Y-%m-%d"),
            ValueSet::Multi(vec![date(2021, 1, 5), date(2021, 1, 2)])
        );
        assert_eq!(
            ValueType::Format.decode_set(SelectionMode::Single, &values, &fmt, "%Y-%m-%d"),
            ValueSet::Single(date(2021, 1, 5))
        );
        // Second end does not decode.
        assert_eq!(
            ValueType::Format.decode_set(SelectionMode::Range, &values, &fmt, "%Y-%m-%d"),
            ValueSet::Empty
        );
    }

    #[test]
    fn test_picker_value_untagged_serde() {
        let parsed: PickerValue = serde_json::from_str("1614816000000").expect("timestamp value");
        assert_eq!(parsed, PickerValue::Timestamp(1_614_816_000_000));

        let parsed: PickerValue = serde_json::from_str(r#""2021-03-04""#).expect("date value");
        assert_eq!(parsed, PickerValue::Date(date(2021, 3, 4)));

        let parsed: PickerValue = serde_json::from_str(r#""04/03/2021""#).expect("text value");
        assert_eq!(parsed, PickerValue::Text("04/03/2021".to_owned()));
    }
}
