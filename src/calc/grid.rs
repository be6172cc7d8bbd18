use crate::calc::hijri::{self, HijriDate};
use crate::calc::resolve::{Indicator, resolve_indicator};
use crate::data::miqaat::DayRecord;
use chrono::{Datelike, Duration, NaiveDate};

pub const DAYS_PER_WEEK: usize = 7;
pub const MAX_GRID_ROWS: usize = 6;

/// One day slot in the month view, rebuilt on every render.
#[derive(Clone, Debug)]
pub struct CalendarCell {
    pub gregorian: NaiveDate,
    pub hijri: HijriDate,
    /// Cell belongs to the viewed Hijri month/year (as opposed to the
    /// adjacent-month padding at the grid edges).
    pub in_view_month: bool,
    pub is_today: bool,
    pub indicator: Option<Indicator>,
}

/// A week-aligned month view: up to six rows of seven consecutive days.
#[derive(Clone, Debug)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// First cell of the grid; always the first day of a week.
    pub start: NaiveDate,
    pub weeks: Vec<Vec<CalendarCell>>,
}

impl MonthGrid {
    pub fn last(&self) -> NaiveDate {
        self.start + Duration::days((self.weeks.len() * DAYS_PER_WEEK) as i64 - 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.last()
    }

    pub fn cell_at(&self, date: NaiveDate) -> Option<&CalendarCell> {
        if !self.contains(date) {
            return None;
        }
        let offset = (date - self.start).num_days() as usize;
        Some(&self.weeks[offset / DAYS_PER_WEEK][offset % DAYS_PER_WEEK])
    }
}

/// Builds the display grid for a Hijri month.
///
/// The grid starts on the Sunday on or before Hijri day 1 and ends with the
/// last week that still touches the viewed month: row emission stops as soon
/// as the following week would fall entirely in a later Hijri month.
/// `today` is an explicit input so callers (and tests) control it.
pub fn build_grid(records: &[DayRecord], year: i32, month: u32, today: NaiveDate) -> MonthGrid {
    let first = HijriDate::new(year, month, 1).to_gregorian();
    let start = first - Duration::days(first.weekday().num_days_from_sunday() as i64);

    let mut weeks = Vec::new();
    let mut date = start;
    for _row in 0..MAX_GRID_ROWS {
        let mut week = Vec::with_capacity(DAYS_PER_WEEK);
        for _col in 0..DAYS_PER_WEEK {
            let hijri = HijriDate::from_gregorian(date);
            week.push(CalendarCell {
                gregorian: date,
                hijri,
                in_view_month: hijri.year == year && hijri.month == month,
                is_today: date == today,
                indicator: resolve_indicator(records, hijri.year, hijri.month, hijri.day),
            });
            date += Duration::days(1);
        }
        weeks.push(week);

        let next = HijriDate::from_gregorian(date);
        if next.year > year || (next.year == year && next.month > month) {
            break;
        }
    }

    MonthGrid {
        year,
        month,
        start,
        weeks,
    }
}

/// The viewed (Hijri year, Hijri month) pair: the UI shell's only mutable
/// navigation state, threaded through rebuilds rather than held globally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewMonth {
    pub year: i32,
    pub month: u32,
}

impl ViewMonth {
    pub fn of(date: NaiveDate) -> Self {
        let hijri = HijriDate::from_gregorian(date);
        ViewMonth {
            year: hijri.year,
            month: hijri.month,
        }
    }

    pub fn first_day(self) -> NaiveDate {
        HijriDate::new(self.year, self.month, 1).to_gregorian()
    }

    pub fn prev_month(self) -> Self {
        if self.month == 0 {
            ViewMonth {
                year: self.year - 1,
                month: 11,
            }
        } else {
            ViewMonth {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next_month(self) -> Self {
        if self.month == 11 {
            ViewMonth {
                year: self.year + 1,
                month: 0,
            }
        } else {
            ViewMonth {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev_year(self) -> Self {
        ViewMonth {
            year: self.year - 1,
            month: self.month,
        }
    }

    pub fn next_year(self) -> Self {
        ViewMonth {
            year: self.year + 1,
            month: self.month,
        }
    }

    pub fn title(self) -> String {
        format!("{} {}H", hijri::month_name(self.month), self.year)
    }
}
