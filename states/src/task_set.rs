//! Bookkeeping for in-flight tasks owned by a single component.

use std::collections::BTreeMap;
use std::future::Future;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::{TaskHandle, TaskId};

/// Tracks the tasks a component has spawned so they can be finished
/// individually or cancelled all at once (for example when a page unmounts).
#[derive(Debug, Default)]
pub struct TaskSet {
    next_generation: u64,
    handles: BTreeMap<TaskId, TaskHandle>,
}

impl TaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the future built by `work` on `runtime`, raced against a fresh
    /// cancellation token. `work` receives the id so the task can tag its result.
    ///
    /// When the token fires first the future is dropped without running to
    /// completion, so whatever it would have reported is never published.
    pub fn spawn<W, F>(&mut self, runtime: &Handle, label: &'static str, work: W) -> TaskId
    where
        W: FnOnce(TaskId) -> F,
        F: Future<Output = ()> + Send + 'static,
    {
        self.next_generation += 1;
        let id = TaskId::new(label, self.next_generation);
        let token = CancellationToken::new();
        let handle = TaskHandle::new(id, token.clone());
        let work = work(id);

        runtime.spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    log::debug!("task {id} cancelled");
                }
                () = work => {}
            }
        });

        self.handles.insert(id, handle);
        id
    }

    /// Forget a task that reported its result. Returns `false` if it was not tracked.
    pub fn finish(&mut self, id: TaskId) -> bool {
        self.handles.remove(&id).is_some()
    }

    pub fn cancel(&mut self, id: TaskId) {
        if let Some(handle) = self.handles.remove(&id) {
            handle.cancel();
        }
    }

    /// Cancel every tracked task and forget them.
    pub fn cancel_all(&mut self) {
        let handles = std::mem::take(&mut self.handles);
        for handle in handles.values() {
            handle.cancel();
        }
        if !handles.is_empty() {
            log::debug!("cancelled {} in-flight task(s)", handles.len());
        }
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.handles.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for TaskSet {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
