///! Some utility functions

use crate::calendar::DAYS_PER_WEEK;
use crate::form::TaskFormController;
use crate::render::{CalendarView, DayClasses, TaskListView};
use crate::render::task_list::EMPTY_LIST_MESSAGE;

/// A debug utility that pretty-prints the task list
pub fn print_task_list(list: &TaskListView) {
    if list.is_empty() {
        println!("    {}", EMPTY_LIST_MESSAGE);
        return;
    }
    for entry in list.entries() {
        let task = entry.task();
        let badge = entry.frequency_badge().unwrap_or_default();
        let due = entry.due_label().map(|due| format!("due {}", due)).unwrap_or_default();
        println!("    [{:<11}] {}\t{}\t{}\t{}", task.status().label(), task.name(), due, badge, task.id());
        if let Some(description) = task.description() {
            println!("                  {}", description);
        }
    }
}

/// A debug utility that pretty-prints the calendar grid
pub fn print_calendar(calendar: &CalendarView) {
    println!("{:^35}", calendar.title());
    for header in calendar.headers() {
        print!(" {:<4}", header);
    }
    println!();

    let mut overflows = Vec::new();
    for (index, cell) in calendar.cells().iter().enumerate() {
        let marker = if cell.classes().contains(DayClasses::TODAY) { '*' } else { ' ' };
        let count = cell.visible_tasks().len() + cell.hidden_task_count();
        match (cell.classes().contains(DayClasses::OTHER_MONTH), count) {
            (true, _) => print!("  .  "),
            (false, 0) => print!(" {:>2}{} ", cell.day_number(), marker),
            (false, n) => print!(" {:>2}{}{}", cell.day_number(), marker, n.min(9)),
        }
        if (index + 1) % DAYS_PER_WEEK == 0 {
            println!();
        }

        if cell.visible_tasks().is_empty() == false {
            let mut line = format!("{}:", cell.date());
            for task in cell.visible_tasks() {
                line.push_str(&format!(" \"{}\"", task.name()));
            }
            if let Some(label) = cell.overflow_label() {
                line.push_str(&format!(" ({})", label));
            }
            overflows.push(line);
        }
    }
    for line in overflows {
        println!("    {}", line);
    }
}

/// A debug utility that pretty-prints the task form
pub fn print_form(form: &TaskFormController) {
    match form.session() {
        None => println!("The task form is closed"),
        Some(session) => {
            let fields = form.fields();
            println!("--- {} ---", session.title());
            println!("    name:        {}", fields.name);
            println!("    description: {}", fields.description);
            println!("    due:         {}", fields.due_date);
            println!("    frequency:   {}", fields.frequency);
            if form.is_recurrence_visible() {
                println!("    recurrence:  {}", fields.recurrence_date);
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use crate::calendar::{CalendarDay, CalendarMonth, CalendarWeek};
    use crate::cursor::DateCursor;
    use crate::render::{render_calendar, render_task_list};
    use crate::task::{Frequency, Task, TaskDraft, TaskId};
    use crate::zone::DisplayZone;

    fn chore(id: &str) -> Task {
        let draft = TaskDraft {
            name: format!("chore {}", id),
            description: Some("twice".to_string()),
            frequency: Frequency::Weekly,
            due_date: Some(Utc.ymd(2024, 3, 2).and_hms(10, 0, 0)),
            ..TaskDraft::default()
        };
        Task::from_draft(TaskId::from(id), &draft, Utc::now())
    }

    #[test]
    fn printers_handle_every_view() {
        let zone = DisplayZone::default();
        print_task_list(&render_task_list(Vec::new(), &zone));
        print_task_list(&render_task_list(vec![chore("a"), chore("b")], &zone));

        let days = (1..=7)
            .map(|d| {
                let date = NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
                let tasks = if d == 2 { (0..5).map(|i| chore(&i.to_string())).collect() } else { Vec::new() };
                CalendarDay::new(date, tasks, d == 4, true, false)
            })
            .collect();
        let month = CalendarMonth::new(2024, 3, vec![CalendarWeek::new(days)]);
        print_calendar(&render_calendar(&month, DateCursor::new(2024, 3).unwrap()));

        let mut form = TaskFormController::new(zone);
        print_form(&form);
        form.open(None);
        form.set_frequency(Frequency::Daily);
        print_form(&form);
    }
}
