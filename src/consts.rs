/// Smallest year accepted from text input
pub const MIN_YEAR: i32 = 1;

/// Largest year accepted from text input (inclusive)
pub const MAX_YEAR: i32 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Days in a week, and columns in the day grid
pub const DAYS_IN_WEEK: u8 = 7;
/// Rows in the day grid
pub const GRID_ROWS: usize = 6;
/// Cells in the day grid (always 6 x 7)
pub const GRID_CELLS: usize = GRID_ROWS * DAYS_IN_WEEK as usize;

/// Columns in the month grid (12 months as 4 rows of 3)
pub const MONTH_GRID_COLUMNS: usize = 3;

/// Years covered by the default year window and by decade navigation
pub const DECADE: i32 = 10;
/// Rows in the default year window
pub const YEAR_GRID_ROWS: usize = 2;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';
/// Time component separator
pub const TIME_SEPARATOR: char = ':';
/// Separator between the date and time halves of a displayed date
pub const DATE_TIME_SEPARATOR: char = ' ';

/// Default pattern handed to the formatter
pub const DEFAULT_FORMAT: &str = "%Y-%m-%d";
/// Default pattern for the year label of the day panel header
pub const DEFAULT_YEAR_FORMAT: &str = "%Y";

/// Separator joining multiple (or single) values in the input text
pub const LIST_SEPARATOR: &str = ",";
/// Separator joining the two ends of a range in the input text
pub const RANGE_SEPARATOR: &str = " ~ ";
