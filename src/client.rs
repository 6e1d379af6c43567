//! This module provides a client to connect to the task server
//!
//! The client is a thin typed wrapper around the server's REST endpoints:
//!
//! | Operation    | Request                      |
//! |--------------|------------------------------|
//! | List tasks   | `GET /tasks`                 |
//! | Get a task   | `GET /tasks/{id}`            |
//! | Create task  | `POST /tasks`                |
//! | Update task  | `PUT /tasks/{id}`            |
//! | Delete task  | `DELETE /tasks/{id}`         |
//! | Get calendar | `GET /calendar/{year}/{month}` |
//!
//! Any non-2xx reply is turned into an error.

use std::error::Error;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use url::Url;

use crate::traits::TaskStore;
use crate::task::{Task, TaskDraft, TaskFilter, TaskId, TaskUpdate};
use crate::calendar::CalendarMonth;


/// A [`TaskStore`] that fetches its data from the task server
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(base_url: S) -> Result<Self, Box<dyn Error>> {
        let base_url = Url::parse(base_url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(format!("{} cannot be used as a base URL", base_url).into());
        }

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Create a client for the server set in [`crate::config::API_BASE_URL`]
    pub fn from_config() -> Result<Self, Box<dyn Error>> {
        let url = crate::config::api_base_url()?;
        Self::new(url.as_str())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the URL of an endpoint, below the base URL. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, Box<dyn Error>> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| format!("{} cannot be used as a base URL", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Turn a non-2xx response into an error
fn check_status(response: Response, action: &str) -> Result<Response, Box<dyn Error>> {
    let status = response.status();
    if status.is_success() == false {
        return Err(format!("Unable to {}: unexpected HTTP status code {:?} (from {})", action, status, response.url()).into());
    }
    Ok(response)
}


#[async_trait]
impl TaskStore for ApiClient {
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, Box<dyn Error>> {
        let url = self.endpoint(&["tasks"])?;
        let mut request = self.http.get(url);
        if filter.is_empty() == false {
            request = request.query(filter);
        }

        let response = check_status(request.send().await?, "fetch tasks")?;
        let tasks: Vec<Task> = response.json().await?;
        log::debug!("Fetched {} tasks", tasks.len());
        Ok(tasks)
    }

    async fn get_task(&self, id: &TaskId) -> Result<Option<Task>, Box<dyn Error>> {
        let url = self.endpoint(&["tasks", id.as_str()])?;
        let response = self.http.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = check_status(response, "fetch task")?;
        let task: Task = response.json().await?;
        Ok(Some(task))
    }

    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, Box<dyn Error>> {
        let url = self.endpoint(&["tasks"])?;
        let response = self.http.post(url)
            .json(draft)
            .send()
            .await?;

        let response = check_status(response, "create task")?;
        let task: Task = response.json().await?;
        log::info!("Created task {} ({})", task.name(), task.id());
        Ok(task)
    }

    async fn update_task(&self, id: &TaskId, update: &TaskUpdate) -> Result<Task, Box<dyn Error>> {
        let url = self.endpoint(&["tasks", id.as_str()])?;
        let response = self.http.put(url)
            .json(update)
            .send()
            .await?;

        let response = check_status(response, "update task")?;
        let task: Task = response.json().await?;
        log::info!("Updated task {}", task.id());
        Ok(task)
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), Box<dyn Error>> {
        let url = self.endpoint(&["tasks", id.as_str()])?;
        let response = self.http.delete(url).send().await?;

        check_status(response, "delete task")?;
        log::info!("Deleted task {}", id);
        Ok(())
    }

    async fn get_calendar(&self, year: i32, month: u32) -> Result<CalendarMonth, Box<dyn Error>> {
        let url = self.endpoint(&["calendar", &year.to_string(), &month.to_string()])?;
        let response = self.http.get(url).send().await?;

        let response = check_status(response, "fetch calendar")?;
        let calendar: CalendarMonth = response.json().await?;
        Ok(calendar)
    }
}
