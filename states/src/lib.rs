//! Async plumbing shared by the admin panel crates.
//!
//! Owned state lives on one thread. Remote work runs as tokio tasks tracked by a
//! [`TaskSet`] and reports back through an [`Updater`]; the owner applies results
//! by draining the matching [`UpdateReceiver`].

mod task;
mod task_set;
mod updater;

pub use task::{TaskHandle, TaskId};
pub use task_set::TaskSet;
pub use updater::{UpdateReceiver, Updater, update_channel};
