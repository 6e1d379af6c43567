//! Month calendars, as computed by the task server
//!
//! A [`CalendarMonth`] is a grid of weeks, each one made of exactly seven days (Sunday to Saturday).
//! The grid covers the whole requested month, padded with the last days of the previous month and the first days of the next one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use chrono::{Datelike, Duration, NaiveDate};

use crate::task::Task;

/// How many days there are in a calendar week
pub const DAYS_PER_WEEK: usize = 7;


/// A single cell of the calendar grid
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    date: NaiveDate,
    /// Tasks due that day, in the order chosen by the server
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    is_today: bool,
    #[serde(default)]
    is_current_month: bool,
    #[serde(default)]
    is_current_week: bool,
}

impl CalendarDay {
    pub fn new(date: NaiveDate, tasks: Vec<Task>, is_today: bool, is_current_month: bool, is_current_week: bool) -> Self {
        Self { date, tasks, is_today, is_current_month, is_current_week }
    }

    pub fn date(&self) -> NaiveDate       { self.date              }
    pub fn tasks(&self) -> &[Task]        { &self.tasks            }
    pub fn is_today(&self) -> bool        { self.is_today          }
    pub fn is_current_month(&self) -> bool { self.is_current_month }
    /// Whether this day belongs to the week that contains today. This can be true for a day of an adjacent month.
    pub fn is_current_week(&self) -> bool { self.is_current_week   }
}


/// A row of the calendar grid
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarWeek {
    days: Vec<CalendarDay>,
}

impl CalendarWeek {
    pub fn new(days: Vec<CalendarDay>) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }
}


/// The full display grid for a month
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarMonth {
    #[serde(default)]
    year: i32,
    #[serde(default)]
    month: u32,
    weeks: Vec<CalendarWeek>,
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32, weeks: Vec<CalendarWeek>) -> Self {
        Self { year, month, weeks }
    }

    pub fn year(&self) -> i32              { self.year   }
    pub fn month(&self) -> u32             { self.month  }
    pub fn weeks(&self) -> &[CalendarWeek] { &self.weeks }

    /// Iterate over every day of the grid, week after week
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flat_map(|week| week.days.iter())
    }

    /// Build the grid for a month, placing every task on the (UTC) date it is due.
    ///
    /// Tasks without a due date are not shown. Tasks that are due the same day keep their relative order from `tasks`.
    /// Returns `None` in case `(year, month)` is not a valid month.
    pub fn generate(year: i32, month: u32, tasks: &[Task], today: NaiveDate) -> Option<Self> {
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last_day = last_day_of_month(year, month)?;

        let mut tasks_by_date: HashMap<NaiveDate, Vec<Task>> = HashMap::new();
        for task in tasks {
            if let Some(due_date) = task.due_date() {
                tasks_by_date
                    .entry(due_date.naive_utc().date())
                    .or_insert_with(Vec::new)
                    .push(task.clone());
            }
        }

        let current_week_start = start_of_week(today);
        let current_week_end = current_week_start + Duration::days(6);

        let grid_end = end_of_week(last_day);
        let mut current_date = start_of_week(first_day);
        let mut weeks = Vec::new();
        while current_date <= grid_end {
            let mut days = Vec::with_capacity(DAYS_PER_WEEK);
            for _ in 0..DAYS_PER_WEEK {
                days.push(CalendarDay {
                    date: current_date,
                    tasks: tasks_by_date.remove(&current_date).unwrap_or_default(),
                    is_today: current_date == today,
                    is_current_month: current_date.month() == month,
                    is_current_week: current_date >= current_week_start && current_date <= current_week_end,
                });
                current_date = current_date + Duration::days(1);
            }
            weeks.push(CalendarWeek { days });
        }

        Some(Self { year, month, weeks })
    }
}


fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(first_of_next - Duration::days(1))
}

/// The Sunday on or before `date`
fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// The Saturday on or after `date`
fn end_of_week(date: NaiveDate) -> NaiveDate {
    date + Duration::days(6 - date.weekday().num_days_from_sunday() as i64)
}
