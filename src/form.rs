//! The task form, used to create a task or to edit an existing one
//!
//! The form state is an explicit [`TaskForm`] struct, updated on every input event, rather than values read back from a UI.
//! Date fields hold the `YYYY-MM-DDTHH:MM` local-time representation of an HTML `datetime-local` input; conversion from and to absolute timestamps only happens here.

use std::error::Error;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::task::{Frequency, Task, TaskDraft, TaskId};
use crate::coordinator::Mutation;
use crate::zone::DisplayZone;

/// Format of the date fields of the form
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const INPUT_DATE_FORMAT_WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";


/// An in-progress create or edit operation. There is at most one at a time.
///
/// While it is open, an edit session keeps the snapshot of the task it was opened with, and does not follow later changes on the server.
#[derive(Clone, Debug, PartialEq)]
pub enum EditSession {
    Creating,
    Editing(Task),
}

impl EditSession {
    /// The task being edited, if any
    pub fn task_id(&self) -> Option<&TaskId> {
        match self {
            EditSession::Creating => None,
            EditSession::Editing(task) => Some(task.id()),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            EditSession::Creating => "Create New Task",
            EditSession::Editing(_) => "Edit Task",
        }
    }
}


/// The raw values of the form fields
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskForm {
    pub name: String,
    pub description: String,
    pub due_date: String,
    pub frequency: Frequency,
    pub recurrence_date: String,
}


/// Owns the edit session and the form fields
#[derive(Clone, Debug)]
pub struct TaskFormController {
    session: Option<EditSession>,
    fields: TaskForm,
    recurrence_visible: bool,
    /// The zone of the local time used by the date fields
    zone: DisplayZone,
}

impl Default for TaskFormController {
    /// A form that uses the local time zone
    fn default() -> Self {
        Self::new(DisplayZone::Local)
    }
}

impl TaskFormController {
    pub fn new(zone: DisplayZone) -> Self {
        Self {
            session: None,
            fields: TaskForm::default(),
            recurrence_visible: false,
            zone,
        }
    }

    pub fn session(&self) -> Option<&EditSession> { self.session.as_ref() }
    pub fn is_open(&self) -> bool                { self.session.is_some() }
    pub fn fields(&self) -> &TaskForm            { &self.fields           }
    pub fn zone(&self) -> &DisplayZone           { &self.zone             }
    /// Whether the recurrence date field is shown
    pub fn is_recurrence_visible(&self) -> bool  { self.recurrence_visible }

    /// Open the form, either to edit `task` (fields are prefilled from it) or to create a new task (fields are cleared).
    ///
    /// This replaces any session that was already open.
    pub fn open(&mut self, task: Option<&Task>) {
        self.fields = TaskForm::default();
        match task {
            None => {
                self.session = Some(EditSession::Creating);
            },
            Some(task) => {
                self.fields.name = task.name().to_string();
                self.fields.description = task.description().unwrap_or_default().to_string();
                self.fields.due_date = task.due_date()
                    .map(|date| to_input_value(date, &self.zone))
                    .unwrap_or_default();
                self.fields.frequency = task.frequency().clone();
                self.fields.recurrence_date = task.recurrence_date()
                    .map(|date| to_input_value(date, &self.zone))
                    .unwrap_or_default();
                self.session = Some(EditSession::Editing(task.clone()));
            },
        }
        self.recurrence_visible = self.fields.frequency.is_recurring();
    }

    pub fn set_name<S: ToString>(&mut self, name: S) {
        self.fields.name = name.to_string();
    }

    pub fn set_description<S: ToString>(&mut self, description: S) {
        self.fields.description = description.to_string();
    }

    pub fn set_due_date<S: ToString>(&mut self, due_date: S) {
        self.fields.due_date = due_date.to_string();
    }

    pub fn set_recurrence_date<S: ToString>(&mut self, recurrence_date: S) {
        self.fields.recurrence_date = recurrence_date.to_string();
    }

    /// Change the frequency. The recurrence date field is shown for recurring frequencies only.
    ///
    /// Hiding the recurrence date does not clear it: it is shown again with the same value if a recurring frequency is chosen back.
    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.recurrence_visible = frequency.is_recurring();
        self.fields.frequency = frequency;
    }

    /// Build the payload to send to the server from the current field values.
    ///
    /// A missing recurrence date does not prevent the submission, the server decides whether it is acceptable.
    pub fn build_draft(&self) -> Result<TaskDraft, Box<dyn Error>> {
        let fields = &self.fields;
        if fields.name.trim().is_empty() {
            return Err("A task needs a name".into());
        }

        let description = if fields.description.trim().is_empty() {
            None
        } else {
            Some(fields.description.clone())
        };

        let due_date = from_input_value(&fields.due_date, &self.zone)?;

        let recurrence_date = if fields.frequency.is_recurring() {
            from_input_value(&fields.recurrence_date, &self.zone)?
        } else {
            None
        };

        Ok(TaskDraft {
            name: fields.name.clone(),
            description,
            frequency: fields.frequency.clone(),
            due_date,
            recurrence_date,
        })
    }

    /// The mutation a submission of the form should perform: a creation or an update, depending on the session
    pub fn submission(&self) -> Result<Mutation, Box<dyn Error>> {
        let session = self.session.as_ref().ok_or("The task form is not open")?;
        let draft = self.build_draft()?;
        match session {
            EditSession::Creating => Ok(Mutation::Create(draft)),
            EditSession::Editing(task) => Ok(Mutation::Update(task.id().clone(), draft)),
        }
    }

    /// Close the session and discard every field value
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("Closing the task form ({})", session.title());
        }
        self.fields = TaskForm::default();
        self.recurrence_visible = false;
    }
}


/// Format a timestamp as the value of a `datetime-local` input, in the given zone
pub fn to_input_value(timestamp: &DateTime<Utc>, zone: &DisplayZone) -> String {
    zone.format(timestamp, INPUT_DATE_FORMAT)
}

/// Parse the value of a `datetime-local` input, expressed in the given zone. Blank values mean "no date".
pub fn from_input_value(value: &str, zone: &DisplayZone) -> Result<Option<DateTime<Utc>>, Box<dyn Error>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let naive = NaiveDateTime::parse_from_str(value, INPUT_DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, INPUT_DATE_FORMAT_WITH_SECONDS))
        .map_err(|err| format!("Invalid date {:?}: {}", value, err))?;
    let instant = zone.to_utc(&naive)
        .ok_or_else(|| format!("{:?} does not exist in the local time zone", value))?;
    Ok(Some(instant))
}
