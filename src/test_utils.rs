//! Shorthand constructors shared by the unit tests.

use crate::CalendarDate;

pub fn date(year: i32, month: u8, day: u8) -> CalendarDate {
    CalendarDate::from_ymd(year, month, day).expect("test date should be valid")
}

pub fn datetime(year: i32, month: u8, day: u8, hour: u32, minute: u32, second: u32) -> CalendarDate {
    CalendarDate::from_ymd_hms(year, month, day, hour, minute, second)
        .expect("test date time should be valid")
}

pub fn never(_: &CalendarDate) -> bool {
    false
}
