/// Minimum valid year (inclusive)
pub const MIN_YEAR: u16 = 1;

/// Maximum valid year (inclusive); keeps every year at four digits
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;
/// Month number for November, the last month whose grid fits inside `MAX_YEAR`
pub const NOVEMBER: u8 = 11;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
pub(crate) const CENTURY_CYCLE: u16 = 100;
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Separator of the canonical interchange text
pub const CANONICAL_SEPARATOR: char = '-';

/// Length of every formatted date, canonical or display
pub const FORMATTED_LEN: usize = 10;

/// Days in a week row of the month grid
pub const DAYS_PER_WEEK: usize = 7;
/// Week rows in the month grid
pub const GRID_WEEKS: usize = 6;
/// Cells in the month grid
pub const GRID_CELLS: usize = DAYS_PER_WEEK * GRID_WEEKS;

/// A known Sunday (2023-01-01) used to walk the week when deriving weekday labels
pub const REFERENCE_SUNDAY: (i32, u32, u32) = (2023, 1, 1);

/// First year offered by the year picker unless the anchor lies earlier
pub const YEAR_WINDOW_START: u16 = 1900;
/// Last year offered by the year picker unless the anchor lies later
pub const YEAR_WINDOW_END: u16 = 2100;

/// Locale used when none is configured
pub const DEFAULT_LOCALE: &str = "en-US";
