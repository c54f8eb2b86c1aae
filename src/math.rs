//! Calendar arithmetic used by the grids and the panel state machine.
//!
//! Every function is total. Results that would leave chrono's representable
//! range saturate at [`CalendarDate::MIN`] / [`CalendarDate::MAX`].

use crate::consts::{DAYS_IN_WEEK, GRID_CELLS, JANUARY, MIN_DAY};
use crate::panel::PanelType;
use crate::types::{Month, WeekStart};
use crate::CalendarDate;
use chrono::{Datelike, Days, NaiveDate};

const MONTHS_PER_YEAR: i64 = 12;

/// `xxxx-xx-xx 00:00:00`
pub fn start_of_day(date: CalendarDate) -> CalendarDate {
    CalendarDate::from_date(date.date())
}

/// First day of the month at midnight
pub fn start_of_month(date: CalendarDate) -> CalendarDate {
    CalendarDate::from_date(date.date().with_day(1).unwrap_or_else(|| date.date()))
}

/// January 1st of the year at midnight
pub fn start_of_year(date: CalendarDate) -> CalendarDate {
    let day = date.date();
    CalendarDate::from_date(day.with_ordinal(1).unwrap_or(day))
}

/// Truncates to the granularity of a panel.
pub fn truncate(date: CalendarDate, granularity: PanelType) -> CalendarDate {
    match granularity {
        PanelType::Day => start_of_day(date),
        PanelType::Month => start_of_month(date),
        PanelType::Year => start_of_year(date),
    }
}

/// Moves to `year`/`month`, keeping the day when the target month has it and
/// the target month's last day otherwise. Time of day is preserved.
fn clamp_to(date: CalendarDate, year: i64, month: u8, fallback: CalendarDate) -> CalendarDate {
    let Ok(year) = i32::try_from(year) else {
        return fallback;
    };
    (1..=u32::from(date.day()))
        .rev()
        .find_map(|day| NaiveDate::from_ymd_opt(year, u32::from(month), day))
        .map_or(fallback, |d| CalendarDate::from(d.and_time(date.time())))
}

fn saturate(delta: i64) -> CalendarDate {
    if delta < 0 {
        CalendarDate::MIN
    } else {
        CalendarDate::MAX
    }
}

/// Adds `delta` months, clamping the day to the end of the target month:
/// Jan 31 + 1 month is Feb 28 (or 29), never March.
pub fn shift_month(date: CalendarDate, delta: i32) -> CalendarDate {
    let total = i64::from(date.year()) * MONTHS_PER_YEAR
        + i64::from(date.month() - 1)
        + i64::from(delta);
    let year = total.div_euclid(MONTHS_PER_YEAR);
    let month = u8::try_from(total.rem_euclid(MONTHS_PER_YEAR) + 1).unwrap_or(JANUARY);
    clamp_to(date, year, month, saturate(i64::from(delta)))
}

/// Adds `delta` years; Feb 29 on a non-leap target year becomes Feb 28.
pub fn shift_year(date: CalendarDate, delta: i32) -> CalendarDate {
    let year = i64::from(date.year()) + i64::from(delta);
    clamp_to(date, year, date.month(), saturate(i64::from(delta)))
}

/// Replaces the year, with the same end-of-month clamp as [`shift_year`].
pub fn with_year(date: CalendarDate, year: i32) -> CalendarDate {
    shift_year(date, year.saturating_sub(date.year()))
}

/// Replaces the month, with the same end-of-month clamp as [`shift_month`].
pub fn with_month(date: CalendarDate, month: Month) -> CalendarDate {
    clamp_to(date, i64::from(date.year()), month.get(), date)
}

/// The 42 days (6 rows of 7) shown for `year`/`month`.
///
/// The first cell is the most recent `first_day_of_week` on or before the 1st,
/// and the grid runs on into the following month to fill every cell. Returns
/// an empty grid for a year chrono cannot represent.
pub fn build_month_grid(year: i32, month: Month, first_day_of_week: WeekStart) -> Vec<CalendarDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, u32::from(month.get()), u32::from(MIN_DAY))
    else {
        return Vec::new();
    };
    let offset = first_day_of_week.offset_from(first.weekday());
    let start = first
        .checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(first);
    start
        .iter_days()
        .take(GRID_CELLS)
        .map(CalendarDate::from_date)
        .collect()
}

/// Calendar months from `a` to `b`; negative when `b` is earlier.
pub fn month_distance(a: CalendarDate, b: CalendarDate) -> i32 {
    (b.year() - a.year()) * 12 + (i32::from(b.month()) - i32::from(a.month()))
}

/// `target`'s date with `source`'s time of day.
pub fn assign_time(target: CalendarDate, source: CalendarDate) -> CalendarDate {
    CalendarDate::from(target.date().and_time(source.time()))
}

/// Week number of the week containing `date`.
///
/// Week 1 is the week (starting on `first_day_of_week`) that contains
/// January `first_week_contains_date`. With Monday and 4 this is ISO 8601
/// numbering; with Sunday and 1 it is the common US numbering.
pub fn week_number(date: CalendarDate, first_day_of_week: WeekStart, first_week_contains_date: u8) -> u32 {
    let week_start = |d: NaiveDate| {
        d.checked_sub_days(Days::new(u64::from(first_day_of_week.offset_from(d.weekday()))))
            .unwrap_or(d)
    };
    let first_week_of = |year: i32| {
        let contains = u32::from(first_week_contains_date.clamp(1, DAYS_IN_WEEK));
        NaiveDate::from_ymd_opt(year, u32::from(JANUARY), contains).map(week_start)
    };

    let day = date.date();
    let this_week = week_start(day);
    let year = day.year();
    let next_start = first_week_of(year + 1);
    let this_start = first_week_of(year);

    let base = match (next_start, this_start) {
        (Some(next), _) if day >= next => next,
        (_, Some(this)) if day >= this => this,
        _ => first_week_of(year - 1).unwrap_or(this_week),
    };
    let weeks = (this_week - base).num_days() / i64::from(DAYS_IN_WEEK);
    u32::try_from(weeks + 1).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, datetime};
    use chrono::Weekday;

    #[test]
    fn test_start_of() {
        let d = datetime(2021, 7, 19, 13, 45, 10);
        assert_eq!(start_of_day(d), date(2021, 7, 19));
        assert_eq!(start_of_month(d), date(2021, 7, 1));
        assert_eq!(start_of_year(d), date(2021, 1, 1));
    }

    #[test]
    fn test_truncate_by_panel() {
        let d = datetime(2021, 7, 19, 13, 45, 10);
        assert_eq!(truncate(d, PanelType::Day), date(2021, 7, 19));
        assert_eq!(truncate(d, PanelType::Month), date(2021, 7, 1));
        assert_eq!(truncate(d, PanelType::Year), date(2021, 1, 1));
    }

    #[test]
    fn test_shift_month_clamps() {
        struct TestCase {
            from: CalendarDate,
            delta: i32,
            expected: CalendarDate,
            description: &'static str,
        }

        let cases = [
            TestCase {
                from: date(2021, 1, 31),
                delta: 1,
                expected: date(2021, 2, 28),
                description: "clamped to end of February",
            },
            TestCase {
                from: date(2020, 1, 31),
                delta: 1,
                expected: date(2020, 2, 29),
                description: "clamped to leap day",
            },
            TestCase {
                from: date(2021, 3, 31),
                delta: -1,
                expected: date(2021, 2, 28),
                description: "backwards clamp",
            },
            TestCase {
                from: date(2021, 12, 15),
                delta: 1,
                expected: date(2022, 1, 15),
                description: "year rollover forwards",
            },
            TestCase {
                from: date(2021, 1, 15),
                delta: -1,
                expected: date(2020, 12, 15),
                description: "year rollover backwards",
            },
            TestCase {
                from: date(2021, 5, 31),
                delta: -17,
                expected: date(2019, 12, 31),
                description: "multi-year jump",
            },
        ];

        for case in &cases {
            assert_eq!(
                shift_month(case.from, case.delta),
                case.expected,
                "{}",
                case.description
            );
        }
    }

    #[test]
    fn test_shift_month_keeps_time() {
        let d = datetime(2021, 1, 31, 8, 15, 0);
        assert_eq!(shift_month(d, 1), datetime(2021, 2, 28, 8, 15, 0));
    }

    #[test]
    fn test_shift_month_saturates() {
        assert_eq!(shift_month(date(2021, 1, 1), i32::MAX), CalendarDate::MAX);
        assert_eq!(shift_month(date(2021, 1, 1), i32::MIN), CalendarDate::MIN);
    }

    #[test]
    fn test_shift_year() {
        assert_eq!(shift_year(date(2020, 2, 29), 1), date(2021, 2, 28));
        assert_eq!(shift_year(date(2020, 2, 29), 4), date(2024, 2, 29));
        assert_eq!(shift_year(date(2020, 6, 1), -10), date(2010, 6, 1));
    }

    #[test]
    fn test_with_year_and_month() {
        assert_eq!(with_year(date(2020, 2, 29), 2023), date(2023, 2, 28));
        let march = Month::new(3).expect("march");
        let april = Month::new(4).expect("april");
        assert_eq!(with_month(date(2021, 1, 31), april), date(2021, 4, 30));
        assert_eq!(with_month(date(2021, 1, 31), march), date(2021, 3, 31));
    }

    #[test]
    fn test_build_month_grid_shape_for_all_inputs() {
        for year in [1900, 2019, 2020, 2021, 2024] {
            for m in 1..=12 {
                let month = Month::new(m).expect("valid month");
                for start in 0..7 {
                    let week_start = WeekStart::new(start).expect("valid week start");
                    let grid = build_month_grid(year, month, week_start);

                    assert_eq!(grid.len(), 42, "{year}-{m} start {start}");
                    assert_eq!(grid[0].weekday(), week_start.weekday());
                    for pair in grid.windows(2) {
                        assert_eq!((pair[1].date() - pair[0].date()).num_days(), 1);
                    }
                    let first = date(year, m, 1);
                    assert!(grid[0] <= first && first < grid[7]);
                }
            }
        }
    }

    #[test]
    fn test_build_month_grid_starts_on_first_when_aligned() {
        // 2024-09-01 is a Sunday.
        let grid = build_month_grid(2024, Month::new(9).expect("september"), WeekStart::SUNDAY);
        assert_eq!(grid[0], date(2024, 9, 1));
        assert_eq!(grid[41], date(2024, 10, 12));
    }

    #[test]
    fn test_build_month_grid_monday_start() {
        // 2024-10-01 is a Tuesday, so a Monday grid starts on 2024-09-30.
        let grid = build_month_grid(2024, Month::new(10).expect("october"), WeekStart::MONDAY);
        assert_eq!(grid[0], date(2024, 9, 30));
        assert_eq!(grid[0].weekday(), Weekday::Mon);
    }

    #[test]
    fn test_build_month_grid_is_deterministic() {
        let month = Month::new(2).expect("february");
        assert_eq!(
            build_month_grid(2021, month, WeekStart::MONDAY),
            build_month_grid(2021, month, WeekStart::MONDAY)
        );
    }

    #[test]
    fn test_month_distance() {
        assert_eq!(month_distance(date(2020, 11, 30), date(2021, 2, 1)), 3);
        assert_eq!(month_distance(date(2021, 2, 1), date(2020, 11, 30)), -3);
        assert_eq!(month_distance(date(2021, 2, 1), date(2021, 2, 28)), 0);
    }

    #[test]
    fn test_assign_time() {
        let target = date(2021, 5, 1);
        let source = datetime(1999, 1, 1, 17, 30, 5);
        assert_eq!(assign_time(target, source), datetime(2021, 5, 1, 17, 30, 5));
    }

    #[test]
    fn test_week_number_iso() {
        // ISO: Monday start, week 1 contains Jan 4th.
        assert_eq!(week_number(date(2021, 1, 4), WeekStart::MONDAY, 4), 1);
        assert_eq!(week_number(date(2021, 1, 3), WeekStart::MONDAY, 4), 53);
        assert_eq!(week_number(date(2020, 12, 31), WeekStart::MONDAY, 4), 53);
        assert_eq!(week_number(date(2024, 12, 30), WeekStart::MONDAY, 4), 1);
    }

    #[test]
    fn test_week_number_us() {
        // Sunday start, week 1 contains Jan 1st.
        assert_eq!(week_number(date(2022, 1, 1), WeekStart::SUNDAY, 1), 1);
        assert_eq!(week_number(date(2022, 1, 2), WeekStart::SUNDAY, 1), 2);
        assert_eq!(week_number(date(2021, 12, 26), WeekStart::SUNDAY, 1), 1);
    }
}
