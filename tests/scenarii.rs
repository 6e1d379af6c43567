//! Fixtures shared by the integration tests: a scripted user, a slow store, and some pre-filled stores

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

use taskboard::{DateCursor, MemoryStore, SyncCoordinator, Task, TaskId};
use taskboard::calendar::CalendarMonth;
use taskboard::mock_behaviour::MockBehaviour;
use taskboard::task::{Frequency, TaskDraft, TaskFilter, TaskUpdate};
use taskboard::traits::{TaskStore, UserPrompt};
use taskboard::zone::DisplayZone;

/// The day every test considers as "today"
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

pub fn march_2024() -> DateCursor {
    DateCursor::new(2024, 3).unwrap()
}

pub fn utc() -> DisplayZone {
    DisplayZone::Fixed(FixedOffset::east_opt(0).unwrap())
}


/// A user that answers every confirmation the same way, and remembers what it has been told
#[derive(Default)]
pub struct ScriptedPrompt {
    pub confirm_answer: Cell<bool>,
    pub questions: RefCell<Vec<String>>,
    pub alerts: RefCell<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn agreeing() -> Self {
        Self { confirm_answer: Cell::new(true), ..Self::default() }
    }

    pub fn declining() -> Self {
        Self { confirm_answer: Cell::new(false), ..Self::default() }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl UserPrompt for ScriptedPrompt {
    fn confirm(&self, question: &str) -> bool {
        self.questions.borrow_mut().push(question.to_string());
        self.confirm_answer.get()
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}


/// A store that reads its data immediately, but only replies after a delay.
///
/// Each read pops the next delay of its queue. Reads with an empty queue reply at once.
#[derive(Default)]
pub struct DelayedStore {
    inner: MemoryStore,
    list_delays: Mutex<VecDeque<Duration>>,
    calendar_delays: Mutex<VecDeque<Duration>>,
}

impl DelayedStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self { inner, ..Self::default() }
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn delay_next_lists(&self, delays: &[u64]) {
        self.list_delays.lock().unwrap().extend(delays.iter().map(|ms| Duration::from_millis(*ms)));
    }

    pub fn delay_next_calendars(&self, delays: &[u64]) {
        self.calendar_delays.lock().unwrap().extend(delays.iter().map(|ms| Duration::from_millis(*ms)));
    }
}

fn next_delay(queue: &Mutex<VecDeque<Duration>>) -> Option<Duration> {
    queue.lock().unwrap().pop_front()
}

#[async_trait]
impl TaskStore for DelayedStore {
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, Box<dyn Error>> {
        // Boxed errors are not `Send`, they must not be held across the sleep
        let result = self.inner.list_tasks(filter).await.map_err(|err| err.to_string());
        if let Some(delay) = next_delay(&self.list_delays) {
            tokio::time::sleep(delay).await;
        }
        result.map_err(|err| err.into())
    }

    async fn get_task(&self, id: &TaskId) -> Result<Option<Task>, Box<dyn Error>> {
        self.inner.get_task(id).await
    }

    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, Box<dyn Error>> {
        self.inner.create_task(draft).await
    }

    async fn update_task(&self, id: &TaskId, update: &TaskUpdate) -> Result<Task, Box<dyn Error>> {
        self.inner.update_task(id, update).await
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), Box<dyn Error>> {
        self.inner.delete_task(id).await
    }

    async fn get_calendar(&self, year: i32, month: u32) -> Result<CalendarMonth, Box<dyn Error>> {
        let result = self.inner.get_calendar(year, month).await.map_err(|err| err.to_string());
        if let Some(delay) = next_delay(&self.calendar_delays) {
            tokio::time::sleep(delay).await;
        }
        result.map_err(|err| err.into())
    }
}


/// A task due at the given day and hour (UTC)
pub fn task_due(id: &str, name: &str, (year, month, day): (i32, u32, u32), hour: u32) -> Task {
    let draft = TaskDraft {
        name: name.to_string(),
        due_date: Some(Utc.ymd(year, month, day).and_hms(hour, 0, 0)),
        ..TaskDraft::default()
    };
    Task::from_draft(TaskId::from(id), &draft, Utc::now())
}

/// A store with a few March 2024 tasks:
/// * `laundry`, due on March 2nd, weekly
/// * `dentist`, due on March 15th (today)
/// * `taxes`, due on April 10th
pub fn household_store() -> MemoryStore {
    let store = MemoryStore::new().with_today(today());

    let laundry = Task::from_draft(TaskId::from("laundry"), &TaskDraft {
        name: "Laundry".to_string(),
        frequency: Frequency::Weekly,
        due_date: Some(Utc.ymd(2024, 3, 2).and_hms(10, 0, 0)),
        recurrence_date: Some(Utc.ymd(2024, 3, 9).and_hms(10, 0, 0)),
        ..TaskDraft::default()
    }, Utc::now());
    store.insert(laundry).unwrap();
    store.insert(task_due("dentist", "Dentist", (2024, 3, 15), 14)).unwrap();
    store.insert(task_due("taxes", "Taxes", (2024, 4, 10), 9)).unwrap();
    store
}

/// `store`, that fails according to a behaviour the caller can still tweak
pub fn with_behaviour(mut store: MemoryStore) -> (MemoryStore, Arc<Mutex<MockBehaviour>>) {
    let behaviour = Arc::new(Mutex::new(MockBehaviour::new()));
    store.set_mock_behaviour(Some(Arc::clone(&behaviour)));
    (store, behaviour)
}

pub fn coordinator<S: TaskStore>(store: S, prompt: ScriptedPrompt) -> SyncCoordinator<S, ScriptedPrompt> {
    let _ = env_logger::builder().is_test(true).try_init();
    SyncCoordinator::new_with_parameters(store, prompt, march_2024(), utc())
}
