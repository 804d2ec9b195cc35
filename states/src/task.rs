//! Task identity and cancellation handles.
//!
//! - `TaskId`: names a spawned remote operation by label and generation
//! - `TaskHandle`: pairs a `TaskId` with the `CancellationToken` the task races against
//!
//! Generations are handed out by [`crate::TaskSet`] and only ever grow, so a larger
//! generation always means a more recently issued task. Callers rely on this to
//! discard results from superseded work (for example an older `load`).

use tokio_util::sync::CancellationToken;

/// Unique identifier for a spawned task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId {
    label: &'static str,
    generation: u64,
}

impl TaskId {
    pub fn new(label: &'static str, generation: u64) -> Self {
        Self { label, generation }
    }

    /// Short operation name, used for logging.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Monotonic counter; higher values were issued later.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.label, self.generation)
    }
}

/// Handle to a spawned task with cooperative cancellation.
///
/// Cancelling does not abort the task forcibly. The future spawned through
/// [`crate::TaskSet::spawn`] is raced against the token, so it is dropped at its
/// next await point and never reports a result.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}
