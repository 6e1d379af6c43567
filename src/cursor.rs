//! The month currently displayed by the calendar view

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use chrono::{Datelike, Local};

/// Month names, indexed by `month - 1`
pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];


/// A `(year, month)` pair, `month` being in `1..=12`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DateCursor {
    year: i32,
    month: u32,
}

impl DateCursor {
    /// Returns `None` in case `month` is not in `1..=12`
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The current month, in the local time zone
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self { year: today.year(), month: today.month() }
    }

    pub fn year(&self) -> i32  { self.year  }
    pub fn month(&self) -> u32 { self.month }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// Move by `delta` months (negative values go back in time), wrapping over years as many times as needed.
    ///
    /// The cursor saturates at December of `i32::MAX` and January of `i32::MIN`
    pub fn advance(&mut self, delta: i32) {
        let months_since_epoch = i64::from(self.year) * 12 + (i64::from(self.month) - 1) + i64::from(delta);
        match i32::try_from(months_since_epoch.div_euclid(12)) {
            Ok(year) => {
                self.year = year;
                self.month = months_since_epoch.rem_euclid(12) as u32 + 1;
            },
            Err(_) if months_since_epoch > 0 => {
                log::warn!("Cannot go past December {}", i32::MAX);
                self.year = i32::MAX;
                self.month = 12;
            },
            Err(_) => {
                log::warn!("Cannot go before January {}", i32::MIN);
                self.year = i32::MIN;
                self.month = 1;
            },
        }
    }
}

impl Default for DateCursor {
    fn default() -> Self {
        Self::current()
    }
}

impl Display for DateCursor {
    /// e.g. `March 2024`
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_steps() {
        let mut cursor = DateCursor::new(2024, 12).unwrap();
        cursor.advance(1);
        assert_eq!(cursor, DateCursor::new(2025, 1).unwrap());
        cursor.advance(-1);
        assert_eq!(cursor, DateCursor::new(2024, 12).unwrap());

        let mut cursor = DateCursor::new(2024, 1).unwrap();
        cursor.advance(-1);
        assert_eq!(cursor, DateCursor::new(2023, 12).unwrap());
    }

    #[test]
    fn large_deltas_wrap_as_many_years_as_needed() {
        let mut cursor = DateCursor::new(2024, 5).unwrap();
        cursor.advance(25);
        assert_eq!(cursor, DateCursor::new(2026, 6).unwrap());
        cursor.advance(-25);
        assert_eq!(cursor, DateCursor::new(2024, 5).unwrap());
        cursor.advance(-17);
        assert_eq!(cursor, DateCursor::new(2022, 12).unwrap());
        cursor.advance(0);
        assert_eq!(cursor, DateCursor::new(2022, 12).unwrap());
    }

    #[test]
    fn every_delta_stays_in_range() {
        for start_month in 1..=12 {
            for delta in -40..=40 {
                let mut cursor = DateCursor::new(2000, start_month).unwrap();
                cursor.advance(delta);
                assert!((1..=12).contains(&cursor.month()));

                let total_before = 2000 * 12 + start_month as i32 - 1;
                let total_after = cursor.year() * 12 + cursor.month() as i32 - 1;
                assert_eq!(total_after - total_before, delta);
            }
        }
    }

    #[test]
    fn saturates_at_the_edges_of_the_year_range() {
        let mut cursor = DateCursor::new(i32::MAX, 12).unwrap();
        cursor.advance(1);
        assert_eq!(cursor, DateCursor::new(i32::MAX, 12).unwrap());
        cursor.advance(-1);
        assert_eq!(cursor, DateCursor::new(i32::MAX, 11).unwrap());

        let mut cursor = DateCursor::new(i32::MIN, 2).unwrap();
        cursor.advance(-1);
        assert_eq!(cursor, DateCursor::new(i32::MIN, 1).unwrap());
        cursor.advance(i32::MIN);
        assert_eq!(cursor, DateCursor::new(i32::MIN, 1).unwrap());
    }

    #[test]
    fn titles() {
        assert_eq!(DateCursor::new(2024, 3).unwrap().to_string(), "March 2024");
        assert_eq!(DateCursor::new(1999, 12).unwrap().month_name(), "December");
        assert!(DateCursor::new(2024, 13).is_none());
        assert!(DateCursor::new(2024, 0).is_none());
    }
}
