//! Pure functions that turn server data into view state and HTML markup
//!
//! Renderers never perform I/O: the [`coordinator`](crate::coordinator) fetches data, then hands it to them. \
//! Markup is built with `hypertext`'s `maud!` macro, which escapes every inserted text and attribute value.

pub mod task_list;
pub use task_list::{render_task_list, TaskEntry, TaskListView};
pub mod calendar;
pub use calendar::{render_calendar, CalendarView, DayCell, DayClasses};
