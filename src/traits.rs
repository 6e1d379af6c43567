use std::error::Error;

use async_trait::async_trait;

use crate::task::{Task, TaskDraft, TaskFilter, TaskId, TaskUpdate};
use crate::calendar::CalendarMonth;

/// A remote source of tasks, usually the task server reached through an [`ApiClient`](crate::client::ApiClient).
///
/// Every error is returned as-is: deciding whether a failure should be shown to the user or silently degraded is up to the caller.
#[async_trait]
pub trait TaskStore {
    /// Returns the tasks matching `filter`, in the order chosen by the store
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, Box<dyn Error>>;
    /// Returns a single task, or `None` if the store does not know this ID
    async fn get_task(&self, id: &TaskId) -> Result<Option<Task>, Box<dyn Error>>;
    /// Create a task. Its status is always `Pending`
    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, Box<dyn Error>>;
    /// Update some fields of a task
    async fn update_task(&self, id: &TaskId, update: &TaskUpdate) -> Result<Task, Box<dyn Error>>;
    async fn delete_task(&self, id: &TaskId) -> Result<(), Box<dyn Error>>;

    /// Returns the calendar grid of a given month
    async fn get_calendar(&self, year: i32, month: u32) -> Result<CalendarMonth, Box<dyn Error>>;
}

/// The blocking prompts a front-end offers to the user
pub trait UserPrompt {
    /// Ask a yes/no question. Returns whether the user agreed.
    fn confirm(&self, question: &str) -> bool;
    /// Show a notice the user has to acknowledge
    fn alert(&self, message: &str);
}
