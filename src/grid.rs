use std::ops::RangeInclusive;

use crate::{
    CalendarDate, DAYS_PER_WEEK, GRID_CELLS, JANUARY, MAX_YEAR, MIN_YEAR, NOVEMBER, YEAR_WINDOW_END,
    YEAR_WINDOW_START, Year,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    const fn delta(self) -> i32 {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

/// Where a grid cell sits relative to the displayed month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    PreviousMonth,
    CurrentMonth,
    NextMonth,
}

/// Six full weeks starting on the Sunday on or before the first of the month.
///
/// Always `GRID_CELLS` long so the popup keeps its height across months.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    first: CalendarDate,
    cells: [CalendarDate; GRID_CELLS],
}

impl MonthGrid {
    /// Builds the grid for `anchor`'s month. The day of `anchor` is ignored.
    pub fn build(anchor: CalendarDate) -> Self {
        let first = clamp_anchor(anchor).first_of_month();
        let lead = i64::from(first.weekday_from_sunday());
        let start = first.checked_add_days(-lead).unwrap_or(first);
        let cells = std::array::from_fn(|i| {
            // Clamped anchors keep all 42 days inside the supported years.
            start.checked_add_days(i as i64).unwrap_or(start)
        });
        Self { first, cells }
    }

    /// First day of the displayed month.
    pub const fn month_start(&self) -> CalendarDate {
        self.first
    }

    pub const fn cells(&self) -> &[CalendarDate; GRID_CELLS] {
        &self.cells
    }

    /// The grid as six rows of seven, Sunday first.
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDate]> {
        self.cells.chunks_exact(DAYS_PER_WEEK)
    }

    pub fn kind_of(&self, date: &CalendarDate) -> CellKind {
        match (date.year(), date.month()).cmp(&(self.first.year(), self.first.month())) {
            std::cmp::Ordering::Less => CellKind::PreviousMonth,
            std::cmp::Ordering::Equal => CellKind::CurrentMonth,
            std::cmp::Ordering::Greater => CellKind::NextMonth,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CalendarDate, CellKind)> + '_ {
        self.cells.iter().map(|d| (*d, self.kind_of(d)))
    }
}

/// Keeps an anchor inside the months whose full grid exists:
/// 0001-01 starts on a Monday and 9999-12 spills into year 10000.
pub fn clamp_anchor(anchor: CalendarDate) -> CalendarDate {
    let key = (anchor.year(), anchor.month());
    if key < (MIN_YEAR, JANUARY + 1) {
        shifted_to(anchor, MIN_YEAR, JANUARY + 1)
    } else if key > (MAX_YEAR, NOVEMBER) {
        shifted_to(anchor, MAX_YEAR, NOVEMBER)
    } else {
        anchor
    }
}

fn shifted_to(anchor: CalendarDate, year: u16, month: u8) -> CalendarDate {
    let month_delta = (i32::from(year) - i32::from(anchor.year())) * 12
        + (i32::from(month) - i32::from(anchor.month()));
    anchor.checked_add_months(month_delta).unwrap_or(anchor)
}

/// Moves the anchor one month back or forward; the year rolls over
/// naturally and the day is clamped to the target month.
pub fn navigate_month(anchor: CalendarDate, direction: Direction) -> CalendarDate {
    anchor
        .checked_add_months(direction.delta())
        .map_or_else(|| clamp_anchor(anchor), clamp_anchor)
}

/// Years offered by the year picker: 1900..=2100 widened to contain `anchor_year`.
pub fn year_window(anchor_year: Year) -> RangeInclusive<u16> {
    let year = anchor_year.get();
    YEAR_WINDOW_START.min(year)..=YEAR_WINDOW_END.max(year)
}
