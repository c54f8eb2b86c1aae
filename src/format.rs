use crate::CalendarDate;
use chrono::NaiveTime;
use chrono::format::{Parsed, StrftimeItems, parse};
use std::fmt::Write;

/// Pattern-based formatting and parsing of single dates.
///
/// Patterns are opaque to the rest of the crate; the bundled
/// [`ChronoFormatter`] reads them as `strftime` strings.
pub trait DateFormatter {
    fn format(&self, date: &CalendarDate, pattern: &str) -> String;

    /// `None` when `text` does not describe a real date in `pattern`.
    fn parse(&self, text: &str, pattern: &str) -> Option<CalendarDate>;
}

/// `strftime` patterns through chrono.
///
/// Parsing defaults missing month and day to 1 and a missing time of day to
/// midnight, so `%Y` and `%Y-%m` patterns round-trip. A time that was only
/// partly given, such as `%I` without `%p`, does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChronoFormatter;

impl DateFormatter for ChronoFormatter {
    fn format(&self, date: &CalendarDate, pattern: &str) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.naive().format(pattern)).is_err() {
            tracing::warn!(pattern, "unsupported format pattern");
            return date.to_string();
        }
        out
    }

    fn parse(&self, text: &str, pattern: &str) -> Option<CalendarDate> {
        let mut parsed = Parsed::new();
        parse(&mut parsed, text, StrftimeItems::new(pattern)).ok()?;

        // Setters fail when the field was already parsed; that is fine.
        let _ = parsed.set_month(1);
        let _ = parsed.set_day(1);
        let date = parsed.to_naive_date().ok()?;

        let has_time = [parsed.hour_div_12(), parsed.hour_mod_12(), parsed.minute(), parsed.second()]
            .iter()
            .any(Option::is_some);
        let time = if has_time {
            let _ = parsed.set_minute(0);
            let _ = parsed.set_second(0);
            parsed.to_naive_time().ok()?
        } else {
            NaiveTime::MIN
        };

        Some(CalendarDate::from(date.and_time(time)))
    }
}
