//! An in-memory [`TaskStore`], that behaves like the task server
//!
//! This is mostly useful in tests, where it plays the role of the server. It can also be used for offline demos.

use std::error::Error;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Local, NaiveDate, Utc};

use crate::traits::TaskStore;
use crate::task::{Task, TaskDraft, TaskFilter, TaskId, TaskUpdate};
use crate::calendar::CalendarMonth;
use crate::mock_behaviour::MockBehaviour;


/// A task store that keeps its tasks in memory, in creation order
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: Mutex<Vec<Task>>,
    /// The day that calendars consider as "today". `None` means the actual current day
    today: Option<NaiveDate>,

    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the date calendars will consider as "today"
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Make this store fail according to `mock_behaviour`
    pub fn set_mock_behaviour(&mut self, mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>) {
        self.mock_behaviour = mock_behaviour;
    }

    /// Returns a copy of every stored task
    pub fn tasks(&self) -> Vec<Task> {
        match self.tasks.lock() {
            Ok(tasks) => tasks.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Store a task as-is, bypassing the mock behaviour
    pub fn insert(&self, task: Task) -> Result<(), Box<dyn Error>> {
        self.lock_tasks()?.push(task);
        Ok(())
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn lock_tasks(&self) -> Result<MutexGuard<'_, Vec<Task>>, Box<dyn Error>> {
        self.tasks.lock()
            .map_err(|_| "The task list has been poisoned".into())
    }

    fn check_behaviour<F>(&self, can_do: F) -> Result<(), Box<dyn Error>>
    where
        F: FnOnce(&mut MockBehaviour) -> Result<(), Box<dyn Error>>,
    {
        match &self.mock_behaviour {
            None => Ok(()),
            Some(behaviour) => {
                let mut behaviour = behaviour.lock()
                    .map_err(|_| "The mock behaviour has been poisoned")?;
                can_do(&mut *behaviour)
            },
        }
    }
}


#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, Box<dyn Error>> {
        self.check_behaviour(MockBehaviour::can_list_tasks)?;
        let tasks = self.lock_tasks()?;
        Ok(tasks.iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }

    async fn get_task(&self, id: &TaskId) -> Result<Option<Task>, Box<dyn Error>> {
        self.check_behaviour(MockBehaviour::can_get_task)?;
        let tasks = self.lock_tasks()?;
        Ok(tasks.iter().find(|task| task.id() == id).cloned())
    }

    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, Box<dyn Error>> {
        self.check_behaviour(MockBehaviour::can_create_task)?;
        if draft.name.trim().is_empty() {
            return Err("A task name cannot be empty".into());
        }

        let task = Task::from_draft(TaskId::random(), draft, Utc::now());
        self.lock_tasks()?.push(task.clone());
        log::debug!("Memory store: created task {}", task.id());
        Ok(task)
    }

    async fn update_task(&self, id: &TaskId, update: &TaskUpdate) -> Result<Task, Box<dyn Error>> {
        self.check_behaviour(MockBehaviour::can_update_task)?;
        let mut tasks = self.lock_tasks()?;
        match tasks.iter_mut().find(|task| task.id() == id) {
            None => Err(format!("No task with ID {}", id).into()),
            Some(task) => {
                task.apply_update(update, Utc::now());
                log::debug!("Memory store: updated task {}", id);
                Ok(task.clone())
            },
        }
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), Box<dyn Error>> {
        self.check_behaviour(MockBehaviour::can_delete_task)?;
        let mut tasks = self.lock_tasks()?;
        let count_before = tasks.len();
        tasks.retain(|task| task.id() != id);
        if tasks.len() == count_before {
            return Err(format!("No task with ID {}", id).into());
        }
        log::debug!("Memory store: deleted task {}", id);
        Ok(())
    }

    async fn get_calendar(&self, year: i32, month: u32) -> Result<CalendarMonth, Box<dyn Error>> {
        self.check_behaviour(MockBehaviour::can_get_calendar)?;
        let tasks = self.lock_tasks()?;
        CalendarMonth::generate(year, month, &tasks, self.today())
            .ok_or_else(|| format!("Invalid month {}-{}", year, month).into())
    }
}
