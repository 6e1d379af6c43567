//! This crate provides a client for a recurring-task server.
//!
//! The server is reached through the HTTP client of the [`client`] module, which can be used as a stand-alone module. \
//! An in-memory store (see [`memory`]) implements the same [`TaskStore`](traits::TaskStore) trait, and can stand in for the server in tests or offline demos.
//!
//! A [`SyncCoordinator`](coordinator::SyncCoordinator) keeps two views in sync with a store: a task list (see [`render::task_list`])
//! and a month calendar (see [`render::calendar`]). \
//! It also owns the task form (see [`form`]) used to create and edit tasks, and reloads both views after every change.

pub mod traits;

pub mod task;
pub use task::{Task, TaskId, TaskStatus, Frequency};
pub mod calendar;
pub use calendar::CalendarMonth;
pub mod cursor;
pub use cursor::DateCursor;

pub mod client;
pub use client::ApiClient;
pub mod memory;
pub use memory::MemoryStore;
pub mod mock_behaviour;

pub mod zone;
pub mod form;
pub mod render;
pub mod coordinator;
pub use coordinator::SyncCoordinator;

/// A [`SyncCoordinator`] that talks to the actual task server
pub type ApiCoordinator<P> = SyncCoordinator<ApiClient, P>;

pub mod config;
pub mod utils;
