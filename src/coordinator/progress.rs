//! Utilities to track the progression of a mutation and of the reload that follows it

use std::fmt::{Display, Error, Formatter};

/// An event that happens while the coordinator talks to the server
#[derive(Clone, Debug, PartialEq)]
pub enum SyncEvent {
    /// Nothing has been sent yet
    Idle,
    /// A mutation has been sent, and its reply is awaited
    Mutating{ action: String },
    /// The mutation succeeded, the views are being fetched again
    Reloading,
    /// The whole round trip is over
    Finished{ success: bool },
}

impl Display for SyncEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            SyncEvent::Idle => write!(f, "Idle"),
            SyncEvent::Mutating{action} => write!(f, "Sending {}...", action),
            SyncEvent::Reloading => write!(f, "Reloading tasks and calendar..."),
            SyncEvent::Finished{success} => match success {
                true => write!(f, "Done"),
                false => write!(f, "Failed"),
            }
        }
    }
}

impl Default for SyncEvent {
    fn default() -> Self {
        Self::Idle
    }
}



/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<SyncEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<SyncEvent>;

/// Create a feeback channel, that can be used to know whether the coordinator is waiting for the server
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(SyncEvent::default())
}



/// Tracks the errors that happen during one mutation, and forwards its progress to the feedback channel (if any)
pub struct SyncProgress<'a> {
    n_errors: u32,
    feedback_channel: Option<&'a FeedbackSender>,
}
impl<'a> SyncProgress<'a> {
    pub fn new(feedback_channel: Option<&'a FeedbackSender>) -> Self {
        Self { n_errors: 0, feedback_channel }
    }

    pub fn is_success(&self) -> bool {
        self.n_errors == 0
    }

    /// Log an error
    pub fn error(&mut self, text: &str) {
        log::error!("{}", text);
        self.n_errors += 1;
    }
    /// Log an info
    pub fn info(&mut self, text: &str) {
        log::info!("{}", text);
    }
    /// Log a debug message
    pub fn debug(&mut self, text: &str) {
        log::debug!("{}", text);
    }
    /// Send an event as a feedback to the listener (if any).
    pub fn feedback(&mut self, event: SyncEvent) {
        if let Some(sender) = self.feedback_channel {
            // Nobody listening is fine
            let _ = sender.send(event);
        }
    }
    /// Send the final event, according to the errors that have been logged
    pub fn finish(&mut self) {
        let success = self.is_success();
        self.feedback(SyncEvent::Finished{ success });
    }
}
