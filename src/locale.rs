//! Month and weekday names plus week rules.
//!
//! A [`LocaleRegistry`] is built once and then only read; lookups for
//! unknown names fall back to its default locale.

use crate::consts::{DAYS_IN_WEEK, DEFAULT_YEAR_FORMAT};
use crate::types::{Month, WeekStart};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

static ENGLISH: LazyLock<Locale> = LazyLock::new(Locale::en);

pub(crate) fn default_locale() -> &'static Locale {
    &ENGLISH
}

const fn default_first_week_contains_date() -> u8 {
    1
}

fn default_year_format() -> String {
    DEFAULT_YEAR_FORMAT.to_owned()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// Short weekday names, Sunday first
    pub weekdays_short:           [String; 7],
    pub months_short:             [String; 12],
    #[serde(default)]
    pub first_day_of_week:        WeekStart,
    /// Day of January that week 1 must contain
    #[serde(default = "default_first_week_contains_date")]
    pub first_week_contains_date: u8,
    /// Pattern for the year label in the day panel header
    #[serde(default = "default_year_format")]
    pub year_format:              String,
    #[serde(default)]
    pub month_before_year:        bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocaleError {
    #[error("Expected {expected} {what} names, found {found}")]
    WrongNameCount {
        what:     &'static str,
        expected: usize,
        found:    usize,
    },

    #[error("Default locale '{0}' is not registered")]
    MissingDefault(String),
}

fn names<const N: usize>(what: &'static str, names: Vec<String>) -> Result<[String; N], LocaleError> {
    let found = names.len();
    names.try_into().map_err(|_| LocaleError::WrongNameCount {
        what,
        expected: N,
        found,
    })
}

fn owned<const N: usize>(names: [&str; N]) -> [String; N] {
    names.map(str::to_owned)
}

impl Locale {
    pub fn en() -> Self {
        Self {
            weekdays_short:           owned(["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]),
            months_short:             owned([
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ]),
            first_day_of_week:        WeekStart::SUNDAY,
            first_week_contains_date: 1,
            year_format:              DEFAULT_YEAR_FORMAT.to_owned(),
            month_before_year:        true,
        }
    }

    pub fn zh_cn() -> Self {
        Self {
            weekdays_short:           owned(["日", "一", "二", "三", "四", "五", "六"]),
            months_short:             owned([
                "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
            ]),
            first_day_of_week:        WeekStart::MONDAY,
            first_week_contains_date: 4,
            year_format:              "%Y年".to_owned(),
            month_before_year:        false,
        }
    }

    /// Builds a locale from name lists, keeping `en`'s week rules.
    ///
    /// # Errors
    /// Returns `LocaleError::WrongNameCount` unless there are 7 weekdays and 12 months.
    pub fn with_names(weekdays_short: Vec<String>, months_short: Vec<String>) -> Result<Self, LocaleError> {
        Ok(Self {
            weekdays_short: names::<7>("weekday", weekdays_short)?,
            months_short: names::<12>("month", months_short)?,
            ..Self::en()
        })
    }

    pub fn month_name(&self, month: Month) -> &str {
        &self.months_short[month.index()]
    }

    /// Weekday column headers, starting at `first_day_of_week`.
    pub fn weekday_headers(&self) -> Vec<&str> {
        let start = usize::from(self.first_day_of_week.get());
        (0..usize::from(DAYS_IN_WEEK))
            .map(|i| self.weekdays_short[(start + i) % usize::from(DAYS_IN_WEEK)].as_str())
            .collect()
    }

    /// A copy with every field the overrides set replaced.
    #[must_use]
    pub fn merged(&self, overrides: &LocaleOverrides) -> Self {
        let mut locale = self.clone();
        if let Some(weekdays) = &overrides.weekdays_short {
            locale.weekdays_short.clone_from(weekdays);
        }
        if let Some(months) = &overrides.months_short {
            locale.months_short.clone_from(months);
        }
        if let Some(start) = overrides.first_day_of_week {
            locale.first_day_of_week = start;
        }
        if let Some(contains) = overrides.first_week_contains_date {
            locale.first_week_contains_date = contains;
        }
        if let Some(format) = &overrides.year_format {
            locale.year_format.clone_from(format);
        }
        if let Some(order) = overrides.month_before_year {
            locale.month_before_year = order;
        }
        locale
    }
}

impl Default for Locale {
    fn default() -> Self {
        default_locale().clone()
    }
}

/// Partial locale, applied over a base with [`Locale::merged`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleOverrides {
    pub weekdays_short:           Option<[String; 7]>,
    pub months_short:             Option<[String; 12]>,
    pub first_day_of_week:        Option<WeekStart>,
    pub first_week_contains_date: Option<u8>,
    pub year_format:              Option<String>,
    pub month_before_year:        Option<bool>,
}

/// Named locales with a default.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    default: String,
    locales: HashMap<String, Locale>,
}

impl LocaleRegistry {
    /// # Errors
    /// Returns `LocaleError::MissingDefault` when `default` is not among `locales`.
    pub fn new(
        default: impl Into<String>,
        locales: impl IntoIterator<Item = (String, Locale)>,
    ) -> Result<Self, LocaleError> {
        let default = default.into();
        let locales: HashMap<String, Locale> = locales.into_iter().collect();
        if !locales.contains_key(&default) {
            return Err(LocaleError::MissingDefault(default));
        }
        Ok(Self { default, locales })
    }

    /// `en` (the default) and `zh-cn`.
    pub fn builtin() -> Self {
        let locales = HashMap::from([
            ("en".to_owned(), Locale::en()),
            ("zh-cn".to_owned(), Locale::zh_cn()),
        ]);
        Self {
            default: "en".to_owned(),
            locales,
        }
    }

    pub fn default_name(&self) -> &str {
        &self.default
    }

    pub fn contains(&self, name: &str) -> bool {
        self.locales.contains_key(name)
    }

    /// The named locale, or the default one.
    pub fn get(&self, name: Option<&str>) -> &Locale {
        name.and_then(|n| self.locales.get(n))
            .or_else(|| self.locales.get(&self.default))
            .unwrap_or(default_locale())
    }

    /// The named locale with `overrides` merged over it.
    pub fn resolve(&self, name: Option<&str>, overrides: Option<&LocaleOverrides>) -> Locale {
        let base = self.get(name);
        overrides.map_or_else(|| base.clone(), |o| base.merged(o))
    }
}

impl Default for LocaleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
