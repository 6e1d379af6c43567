//! Tasks, as they are exchanged with the task server

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::error::Error;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use chrono::{DateTime, Utc};


/// The server-assigned identifier of a task.
///
/// This is an opaque string: the client never builds one, it only echoes back what the server gave.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId {
    content: String,
}

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Generate a random TaskId, the way the task server does
    pub fn random() -> Self {
        let random = uuid::Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }
}
impl From<String> for TaskId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for TaskId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}
impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}



/// The progress of a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// Every status, in the order they are offered to the user
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    /// The value used on the wire (e.g. `InProgress`)
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "InProgress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Cancelled => "Cancelled",
        }
    }

    /// The human-readable label (e.g. `In Progress`)
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Cancelled => "Cancelled",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = Box<dyn Error>;

    /// Accepts either the wire value or the label, ignoring case and blanks
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        TaskStatus::ALL.iter()
            .find(|status| status.as_str().to_lowercase() == wanted)
            .copied()
            .ok_or_else(|| format!("Unknown task status {:?}", s).into())
    }
}



/// How often a task recurs.
///
/// The set of frequencies is defined by the server. Known values get their own variant, other ones are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Frequency {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
    Other(String),
}

impl Frequency {
    /// The frequencies this crate knows about
    pub const KNOWN: [Frequency; 6] = [
        Frequency::None,
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
        Frequency::Custom,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Frequency::None => "None",
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
            Frequency::Custom => "Custom",
            Frequency::Other(other) => other,
        }
    }

    /// Whether this is a recurring frequency, i.e. a recurrence date is expected
    pub fn is_recurring(&self) -> bool {
        *self != Frequency::None
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::None
    }
}

impl From<&str> for Frequency {
    fn from(s: &str) -> Self {
        match s {
            "None" => Frequency::None,
            "Daily" => Frequency::Daily,
            "Weekly" => Frequency::Weekly,
            "Monthly" => Frequency::Monthly,
            "Yearly" => Frequency::Yearly,
            "Custom" => Frequency::Custom,
            other => Frequency::Other(other.to_string()),
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}

/// Used to support serde
impl Serialize for Frequency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D>(deserializer: D) -> Result<Frequency, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Frequency::from(s.as_str()))
    }
}



/// A task, as returned by the server
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: TaskStatus,
    #[serde(default)]
    frequency: Frequency,
    #[serde(default)]
    due_date: Option<DateTime<Utc>>,
    /// Expected to be present iff `frequency` is not `None`. The server is the authority on this.
    #[serde(default)]
    recurrence_date: Option<DateTime<Utc>>,

    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a task the way the server does when it receives a draft
    pub fn from_draft(id: TaskId, draft: &TaskDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            status: TaskStatus::Pending,
            frequency: draft.frequency.clone(),
            due_date: draft.due_date,
            recurrence_date: draft.recurrence_date,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn id(&self) -> &TaskId                  { &self.id              }
    pub fn name(&self) -> &str                   { &self.name            }
    pub fn description(&self) -> Option<&str>    { self.description.as_deref() }
    pub fn status(&self) -> TaskStatus           { self.status           }
    pub fn frequency(&self) -> &Frequency        { &self.frequency       }
    pub fn due_date(&self) -> Option<&DateTime<Utc>>        { self.due_date.as_ref() }
    pub fn recurrence_date(&self) -> Option<&DateTime<Utc>> { self.recurrence_date.as_ref() }
    pub fn created_at(&self) -> Option<&DateTime<Utc>>      { self.created_at.as_ref() }
    pub fn updated_at(&self) -> Option<&DateTime<Utc>>      { self.updated_at.as_ref() }

    /// Apply a partial update the way the server does: absent fields are left untouched
    pub fn apply_update(&mut self, update: &TaskUpdate, now: DateTime<Utc>) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(frequency) = &update.frequency {
            self.frequency = frequency.clone();
        }
        if let Some(due_date) = update.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(recurrence_date) = update.recurrence_date {
            self.recurrence_date = Some(recurrence_date);
        }
        self.updated_at = Some(now);
    }
}



/// The fields of a task that a client sends to create one (`POST /tasks`) or to overwrite one from the edit form (`PUT /tasks/{id}`)
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TaskDraft {
    pub name: String,
    /// Sent as `null` when blank
    pub description: Option<String>,
    pub frequency: Frequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_date: Option<DateTime<Utc>>,
}


/// A partial update of a task (`PUT /tasks/{id}`). Fields that are `None` are not sent at all.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `Some(None)` is sent as an explicit `null`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_date: Option<DateTime<Utc>>,
}

impl TaskUpdate {
    /// An update that only changes the status
    pub fn status(status: TaskStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }
}

impl From<TaskDraft> for TaskUpdate {
    fn from(draft: TaskDraft) -> Self {
        Self {
            name: Some(draft.name),
            description: Some(draft.description),
            status: None,
            frequency: Some(draft.frequency),
            due_date: draft.due_date,
            recurrence_date: draft.recurrence_date,
        }
    }
}


/// Query parameters accepted by `GET /tasks`. An empty filter lists every task.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TaskFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    /// Case-insensitive substring of the name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_end_date: Option<DateTime<Utc>>,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a task passes this filter, with the semantics of the server
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(frequency) = &self.frequency {
            if &task.frequency != frequency {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if task.name.to_lowercase().contains(&name.to_lowercase()) == false {
                return false;
            }
        }
        within(task.created_at, self.created_start_date, self.created_end_date)
            && within(task.updated_at, self.updated_start_date, self.updated_end_date)
            && within(task.due_date, self.due_start_date, self.due_end_date)
    }
}

/// Inclusive bounds. A task without the timestamp only passes when there are no bounds at all
fn within(value: Option<DateTime<Utc>>, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    match value {
        None => false,
        Some(value) => {
            start.map_or(true, |start| value >= start)
                && end.map_or(true, |end| value <= end)
        },
    }
}
