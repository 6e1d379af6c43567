//! The task list view

use hypertext::prelude::*;

use crate::task::{Task, TaskId, TaskStatus};
use crate::zone::DisplayZone;

/// What the list shows when there is no task at all
pub const EMPTY_LIST_MESSAGE: &str = "No tasks yet. Create your first task!";

/// How due dates are displayed in the list
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";


/// One entry of the status selector of a task
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusOption {
    pub status: TaskStatus,
    pub selected: bool,
}

/// A task, as displayed in the list
#[derive(Clone, Debug, PartialEq)]
pub struct TaskEntry {
    task: Task,
    due_label: Option<String>,
}

impl TaskEntry {
    pub fn task(&self) -> &Task {
        &self.task
    }

    /// The due date, formatted in the display zone
    pub fn due_label(&self) -> Option<&str> {
        self.due_label.as_deref()
    }

    /// e.g. `status-inprogress`
    pub fn status_class(&self) -> String {
        format!("status-{}", self.task.status().as_str().to_lowercase())
    }

    /// e.g. `🔁 Weekly`. Non-recurring tasks have no badge
    pub fn frequency_badge(&self) -> Option<String> {
        let frequency = self.task.frequency();
        if frequency.is_recurring() {
            Some(format!("🔁 {}", frequency))
        } else {
            None
        }
    }

    /// Every status, the current one being selected
    pub fn status_options(&self) -> Vec<StatusOption> {
        TaskStatus::ALL.iter()
            .map(|&status| StatusOption { status, selected: status == self.task.status() })
            .collect()
    }

    fn html(&self) -> String {
        let task = &self.task;
        let id = task.id().as_str();
        let description = task.description().unwrap_or_default();
        let due = self.due_label().unwrap_or_default();
        let badge = self.frequency_badge().unwrap_or_default();
        let status_options = self.status_options();

        maud! {
            div .task-item id=(format!("task-{}", id)) {
                div .task-header {
                    div .task-content {
                        div .task-name { (task.name()) }
                        @if !description.is_empty() {
                            div .task-description { (description) }
                        }
                        div .task-meta {
                            @if !due.is_empty() {
                                span { "Due: " (due) }
                            }
                            span class=(format!("task-status {}", self.status_class())) { (task.status().label()) }
                            @if !badge.is_empty() {
                                span .frequency-badge { (badge) }
                            }
                        }
                    }
                    div .task-actions {
                        select .status-select name="status" id=(format!("status-{}", id)) {
                            @for choice in &status_options {
                                @if choice.selected {
                                    option value=(choice.status.as_str()) selected { (choice.status.label()) }
                                } @else {
                                    option value=(choice.status.as_str()) { (choice.status.label()) }
                                }
                            }
                        }
                        button .btn .btn-secondary .btn-small name="edit" value=(id) { "Edit" }
                        button .btn .btn-secondary .btn-small name="delete" value=(id) { "Delete" }
                    }
                }
            }
        }
        .render()
        .into_inner()
    }
}


/// The rendered task list. Tasks keep the order of the server.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskListView {
    entries: Vec<TaskEntry>,
}

impl TaskListView {
    /// Whether the "no tasks" placeholder is shown
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TaskEntry] {
        &self.entries
    }

    /// Find the snapshot of a displayed task
    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.entries.iter()
            .map(|entry| &entry.task)
            .find(|task| task.id() == id)
    }

    pub fn html(&self) -> String {
        if self.entries.is_empty() {
            return maud! { div .empty-state { (EMPTY_LIST_MESSAGE) } }
                .render()
                .into_inner();
        }
        self.entries.iter()
            .map(|entry| entry.html())
            .collect()
    }
}


/// Build the list view of `tasks`. Due dates are shown in `zone`
pub fn render_task_list(tasks: Vec<Task>, zone: &DisplayZone) -> TaskListView {
    let entries = tasks.into_iter()
        .map(|task| {
            let due_label = task.due_date()
                .map(|due| zone.format(due, DUE_DATE_FORMAT));
            TaskEntry { task, due_label }
        })
        .collect();
    TaskListView { entries }
}
