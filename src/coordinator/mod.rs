//! This module glues the task store and the views together
//!
//! It owns the whole client-side state: the displayed month, the task form, the active filter, and the last rendered views.
//! Every mutation is followed by a reload of both views, so that what is displayed always reflects the server.

use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::traits::{TaskStore, UserPrompt};
use crate::task::{TaskDraft, TaskFilter, TaskId, TaskStatus, TaskUpdate};
use crate::cursor::DateCursor;
use crate::form::TaskFormController;
use crate::render::{render_calendar, render_task_list, CalendarView, TaskListView};
use crate::zone::DisplayZone;

pub mod progress;
use progress::{FeedbackSender, SyncEvent, SyncProgress};

/// Shown when a task could not be created or updated
pub const SAVE_FAILURE_NOTICE: &str = "Failed to save task. Please try again.";
/// Shown when the status of a task could not be changed
pub const STATUS_FAILURE_NOTICE: &str = "Failed to update task status.";
/// Shown when a task could not be deleted
pub const DELETE_FAILURE_NOTICE: &str = "Failed to delete task.";
/// Asked before any deletion
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this task?";


/// A change the user asked for
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    Create(TaskDraft),
    /// Replace every editable field of a task
    Update(TaskId, TaskDraft),
    Delete(TaskId),
    SetStatus(TaskId, TaskStatus),
}

impl Mutation {
    /// The notice shown to the user when this mutation fails
    pub fn failure_notice(&self) -> &'static str {
        match self {
            Mutation::Create(_) | Mutation::Update(_, _) => SAVE_FAILURE_NOTICE,
            Mutation::SetStatus(_, _) => STATUS_FAILURE_NOTICE,
            Mutation::Delete(_) => DELETE_FAILURE_NOTICE,
        }
    }

    fn ends_edit_session(&self) -> bool {
        matches!(self, Mutation::Create(_) | Mutation::Update(_, _))
    }
}

impl Display for Mutation {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Mutation::Create(draft) => write!(f, "creation of task \"{}\"", draft.name),
            Mutation::Update(id, _) => write!(f, "update of task {}", id),
            Mutation::Delete(id) => write!(f, "deletion of task {}", id),
            Mutation::SetStatus(id, status) => write!(f, "status change of task {} to {}", id, status),
        }
    }
}


/// Hands out monotonic tickets to the reloads of a view, so that a late reply to an older reload never overwrites a newer one
#[derive(Debug, Default)]
struct ReloadSequence {
    issued: AtomicU64,
}

impl ReloadSequence {
    fn next(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket
    }
}


/// Everything the coordinator displays or edits
#[derive(Debug)]
struct ViewState {
    cursor: DateCursor,
    form: TaskFormController,
    filter: TaskFilter,
    task_list: TaskListView,
    /// `None` until a calendar has been fetched successfully once
    calendar: Option<CalendarView>,
}


/// Drives the task list, the calendar and the task form against a [`TaskStore`].
///
/// Its methods take `&self`, so that several user actions can be in flight at the same time.
/// The internal state is never locked across an `await`.
pub struct SyncCoordinator<S, P>
where
    S: TaskStore,
    P: UserPrompt,
{
    store: S,
    prompt: P,
    /// Due dates and form fields are displayed in this zone
    display_zone: DisplayZone,
    state: Mutex<ViewState>,

    list_reloads: ReloadSequence,
    calendar_reloads: ReloadSequence,

    feedback_channel: Option<FeedbackSender>,
}

impl<S, P> SyncCoordinator<S, P>
where
    S: TaskStore,
    P: UserPrompt,
{
    /// Create a coordinator that shows the current month, in the local time zone
    pub fn new(store: S, prompt: P) -> Self {
        Self::new_with_parameters(store, prompt, DateCursor::current(), DisplayZone::Local)
    }

    /// Create a coordinator that shows `cursor`, and displays dates in `display_zone`
    pub fn new_with_parameters(store: S, prompt: P, cursor: DateCursor, display_zone: DisplayZone) -> Self {
        Self {
            store,
            prompt,
            display_zone,
            state: Mutex::new(ViewState {
                cursor,
                form: TaskFormController::new(display_zone),
                filter: TaskFilter::default(),
                task_list: TaskListView::default(),
                calendar: None,
            }),
            list_reloads: ReloadSequence::default(),
            calendar_reloads: ReloadSequence::default(),
            feedback_channel: None,
        }
    }

    /// Every further mutation will report its progress to this channel
    pub fn set_feedback_channel(&mut self, sender: FeedbackSender) {
        self.feedback_channel = Some(sender);
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        // The state is always left consistent, even by a panicking holder
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The displayed month
    pub fn cursor(&self) -> DateCursor {
        self.state().cursor
    }

    /// The last rendered task list
    pub fn task_list(&self) -> TaskListView {
        self.state().task_list.clone()
    }

    /// The last rendered calendar. `None` in case no calendar has been fetched successfully yet
    pub fn calendar(&self) -> Option<CalendarView> {
        self.state().calendar.clone()
    }

    /// A snapshot of the task form
    pub fn form(&self) -> TaskFormController {
        self.state().form.clone()
    }

    pub fn filter(&self) -> TaskFilter {
        self.state().filter.clone()
    }


    /// Fetch and render both views again
    pub async fn reload(&self) {
        tokio::join!(
            self.reload_task_list(),
            self.reload_calendar(),
        );
    }

    /// Fetch and render the task list again.
    ///
    /// A failed fetch shows an empty list. It is not reported to the user.
    pub async fn reload_task_list(&self) {
        let ticket = self.list_reloads.next();
        let filter = self.filter();

        let tasks = match self.store.list_tasks(&filter).await {
            Ok(tasks) => tasks,
            Err(err) => {
                log::warn!("Unable to fetch the task list: {}. Showing an empty list instead", err);
                Vec::new()
            },
        };

        let mut state = self.state();
        if self.list_reloads.is_latest(ticket) == false {
            log::debug!("Dropping the result of task list reload #{}, a newer one has been issued", ticket);
            return;
        }
        state.task_list = render_task_list(tasks, &self.display_zone);
    }

    /// Fetch and render the calendar of the displayed month again.
    ///
    /// A failed fetch keeps the previous grid and title. It is not reported to the user.
    pub async fn reload_calendar(&self) {
        let ticket = self.calendar_reloads.next();
        let cursor = self.cursor();

        let month = match self.store.get_calendar(cursor.year(), cursor.month()).await {
            Ok(month) => month,
            Err(err) => {
                log::warn!("Unable to fetch the calendar of {}: {}. Keeping the previous one", cursor, err);
                return;
            },
        };

        let mut state = self.state();
        if self.calendar_reloads.is_latest(ticket) == false {
            log::debug!("Dropping the result of calendar reload #{} ({}), a newer one has been issued", ticket, cursor);
            return;
        }
        state.calendar = Some(render_calendar(&month, cursor));
    }

    /// Send a mutation to the store.
    ///
    /// In case of success, the task form is closed (for creations and updates), and both views are reloaded. \
    /// In case of failure, the user is notified, and nothing else changes.
    /// Returns whether the mutation succeeded
    pub async fn mutate(&self, mutation: Mutation) -> bool {
        let mut progress = SyncProgress::new(self.feedback_channel.as_ref());
        progress.info(&format!("Sending the {}", mutation));
        progress.feedback(SyncEvent::Mutating{ action: mutation.to_string() });

        let result = match &mutation {
            Mutation::Create(draft) => {
                self.store.create_task(draft).await.map(|task| progress.debug(&format!("Created task {}", task.id())))
            },
            Mutation::Update(id, draft) => {
                let update = TaskUpdate::from(draft.clone());
                self.store.update_task(id, &update).await.map(|_| ())
            },
            Mutation::Delete(id) => self.store.delete_task(id).await,
            Mutation::SetStatus(id, status) => {
                self.store.update_task(id, &TaskUpdate::status(*status)).await.map(|_| ())
            },
        };

        match result {
            Err(err) => {
                progress.error(&format!("Unable to perform the {}: {}", mutation, err));
                progress.finish();
                self.prompt.alert(mutation.failure_notice());
                false
            },
            Ok(()) => {
                if mutation.ends_edit_session() {
                    self.state().form.close();
                }
                progress.feedback(SyncEvent::Reloading);
                self.reload().await;
                progress.finish();
                true
            },
        }
    }


    /// Open the form to create a new task
    pub fn open_new_task_form(&self) {
        self.state().form.open(None);
    }

    /// Open the form to edit a displayed task, prefilled with its last rendered values.
    ///
    /// Returns `false` in case this task is neither in the list nor in the calendar
    pub fn open_edit_form(&self, id: &TaskId) -> bool {
        let mut state = self.state();
        let task = state.task_list.find(id)
            .or_else(|| state.calendar.as_ref().and_then(|calendar| calendar.find(id)))
            .cloned();

        match task {
            None => {
                log::warn!("Task {} is not displayed, it cannot be edited", id);
                false
            },
            Some(task) => {
                state.form.open(Some(&task));
                true
            },
        }
    }

    /// Change the form, e.g. as the user types in its fields
    pub fn edit_form<F>(&self, edit: F)
    where
        F: FnOnce(&mut TaskFormController),
    {
        edit(&mut self.state().form);
    }

    /// Close the form without sending anything
    pub fn cancel_form(&self) {
        self.state().form.close();
    }

    /// Send the content of the form, as a creation or an update depending on the open session.
    ///
    /// A form that cannot be turned into a request (e.g. because of an invalid date) is reported just like a failed save.
    pub async fn submit_form(&self) -> bool {
        let submission = self.state().form.submission();
        match submission {
            Err(err) => {
                log::error!("Unable to submit the task form: {}", err);
                self.prompt.alert(SAVE_FAILURE_NOTICE);
                false
            },
            Ok(mutation) => self.mutate(mutation).await,
        }
    }

    pub async fn set_status(&self, id: &TaskId, status: TaskStatus) -> bool {
        self.mutate(Mutation::SetStatus(id.clone(), status)).await
    }

    /// Delete a task, once the user has confirmed it
    pub async fn delete_task(&self, id: &TaskId) -> bool {
        if self.prompt.confirm(DELETE_CONFIRMATION) == false {
            log::info!("Deletion of task {} cancelled by the user", id);
            return false;
        }
        self.mutate(Mutation::Delete(id.clone())).await
    }

    /// Move the displayed month by `delta` months (forward for positive values), and reload the calendar.
    /// The task list is left untouched
    pub async fn change_month(&self, delta: i32) {
        {
            let mut state = self.state();
            state.cursor.advance(delta);
            log::debug!("Now showing {}", state.cursor);
        }
        self.reload_calendar().await;
    }

    /// Change the filter of the task list, and reload it
    pub async fn set_filter(&self, filter: TaskFilter) {
        self.state().filter = filter;
        self.reload_task_list().await;
    }
}
