//! The month calendar view

use bitflags::bitflags;
use chrono::{Datelike, NaiveDate};
use hypertext::prelude::*;

use crate::calendar::{CalendarDay, CalendarMonth, DAYS_PER_WEEK};
use crate::cursor::DateCursor;
use crate::task::{Task, TaskId};

/// How many tasks a day cell lists before collapsing the rest into a "+N more" indicator
pub const VISIBLE_TASKS_PER_DAY: usize = 3;

/// Headers of the grid columns
pub const DAY_HEADERS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

bitflags! {
    /// Highlights of a day cell. A cell can have several of them at once
    pub struct DayClasses: u8 {
        /// Every cell has it
        const DAY = 1;
        const TODAY = 2;
        /// A day of the displayed month, in the week that contains today
        const CURRENT_WEEK = 4;
        /// A padding day, from an adjacent month
        const OTHER_MONTH = 8;
    }
}

impl DayClasses {
    pub fn for_day(day: &CalendarDay) -> Self {
        let mut classes = DayClasses::DAY;
        if day.is_today() {
            classes.insert(DayClasses::TODAY);
        }
        // Adjacent-month days of the current week are not highlighted
        if day.is_current_week() && day.is_current_month() {
            classes.insert(DayClasses::CURRENT_WEEK);
        }
        if day.is_current_month() == false {
            classes.insert(DayClasses::OTHER_MONTH);
        }
        classes
    }

    /// The CSS classes, in a stable order (e.g. `calendar-day is-today is-current-week`)
    pub fn css(&self) -> String {
        let mut names = Vec::new();
        if self.contains(DayClasses::DAY)          { names.push("calendar-day");     }
        if self.contains(DayClasses::TODAY)        { names.push("is-today");         }
        if self.contains(DayClasses::CURRENT_WEEK) { names.push("is-current-week");  }
        if self.contains(DayClasses::OTHER_MONTH)  { names.push("is-other-month");   }
        names.join(" ")
    }
}


/// A cell of the calendar grid
#[derive(Clone, Debug, PartialEq)]
pub struct DayCell {
    date: NaiveDate,
    classes: DayClasses,
    /// The first tasks of the day, in server order
    visible_tasks: Vec<Task>,
    hidden_task_count: usize,
}

impl DayCell {
    fn new(day: &CalendarDay) -> Self {
        let tasks = day.tasks();
        let visible = tasks.len().min(VISIBLE_TASKS_PER_DAY);
        Self {
            date: day.date(),
            classes: DayClasses::for_day(day),
            visible_tasks: tasks[..visible].to_vec(),
            hidden_task_count: tasks.len() - visible,
        }
    }

    pub fn date(&self) -> NaiveDate           { self.date          }
    pub fn classes(&self) -> DayClasses       { self.classes       }
    pub fn visible_tasks(&self) -> &[Task]    { &self.visible_tasks }
    pub fn hidden_task_count(&self) -> usize  { self.hidden_task_count }

    pub fn day_number(&self) -> u32 {
        self.date.day()
    }

    /// e.g. `+2 more`, for days that have more tasks than they can show
    pub fn overflow_label(&self) -> Option<String> {
        match self.hidden_task_count {
            0 => None,
            n => Some(format!("+{} more", n)),
        }
    }

    fn html(&self) -> String {
        let overflow = self.overflow_label().unwrap_or_default();
        maud! {
            div class=(self.classes.css()) {
                // Two digits, as in the ISO date the cell comes from
                div .calendar-day-number { (format!("{:02}", self.day_number())) }
                div .calendar-day-tasks {
                    @for task in &self.visible_tasks {
                        div .calendar-task id=(format!("calendar-task-{}", task.id())) { (task.name()) }
                    }
                    @if !overflow.is_empty() {
                        div .calendar-more-tasks { (overflow) }
                    }
                }
            }
        }
        .render()
        .into_inner()
    }
}


/// The rendered calendar: a title, then a fixed 7-column grid of cells, week after week
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarView {
    cursor: DateCursor,
    cells: Vec<DayCell>,
}

impl CalendarView {
    /// The displayed month
    pub fn cursor(&self) -> DateCursor {
        self.cursor
    }

    /// e.g. `March 2024`
    pub fn title(&self) -> String {
        self.cursor.to_string()
    }

    pub fn headers(&self) -> &'static [&'static str] {
        &DAY_HEADERS
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    /// Find the snapshot of a task shown in the grid
    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.cells.iter()
            .flat_map(|cell| cell.visible_tasks.iter())
            .find(|task| task.id() == id)
    }

    /// The markup of the grid (headers and cells). The title is not part of it
    pub fn html(&self) -> String {
        let mut html = maud! {
            @for header in DAY_HEADERS.iter() {
                div .calendar-day-header { (*header) }
            }
        }
        .render()
        .into_inner();

        for cell in &self.cells {
            html.push_str(&cell.html());
        }
        html
    }
}


/// Build the calendar view of `month`, as displayed for `cursor`
pub fn render_calendar(month: &CalendarMonth, cursor: DateCursor) -> CalendarView {
    for (index, week) in month.weeks().iter().enumerate() {
        if week.days().len() != DAYS_PER_WEEK {
            log::warn!("Week #{} of {} has {} days instead of {}. The grid will be shifted", index, cursor, week.days().len(), DAYS_PER_WEEK);
        }
    }

    CalendarView {
        cursor,
        cells: month.days().map(DayCell::new).collect(),
    }
}
