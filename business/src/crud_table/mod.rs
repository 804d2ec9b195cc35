//! Generic CRUD table engine.
//!
//! `CrudTable` owns the records of one page and keeps them in step with a
//! remote resource:
//! - every operation mutates local state synchronously, spawns the remote call
//!   and returns without waiting
//! - completions come back over an update channel and are applied by `sync()`
//!   (once per frame) or `next_outcomes()` (async callers, tests)
//! - edits and removals are optimistic and rolled back when the server refuses
//!
//! Writes to different records are independent. Writes to the same record are
//! serialized: a second update waits behind the first, and a removal is refused
//! while an update is outstanding. A load that finishes while edits are pending
//! keeps the local patches on top of the fetched rows.

mod state;

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use admin_states::{TaskId, TaskSet, UpdateReceiver, Updater, update_channel};
use chrono::Utc;
use log::{debug, error, info, warn};
use tokio::runtime::Handle;

use crate::resource::{PageRequest, ResourceClient};
use crate::{CrudError, OpKind, PageConfig, Patch, Record, Uid};

pub use state::{PendingEdit, PendingRemoval, TableState};

/// Result of one remote operation, reported once it has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub op: OpKind,
    pub uid: Option<Uid>,
    pub result: Result<(), CrudError>,
}

impl Outcome {
    fn ok(op: OpKind, uid: Option<Uid>) -> Self {
        Self {
            op,
            uid,
            result: Ok(()),
        }
    }

    fn err(op: OpKind, uid: Option<Uid>, err: CrudError) -> Self {
        Self {
            op,
            uid,
            result: Err(err),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

enum Completion {
    Loaded {
        task: TaskId,
        result: Result<Vec<Record>, CrudError>,
    },
    Created {
        task: TaskId,
        result: Result<Record, CrudError>,
    },
    Updated {
        task: TaskId,
        uid: Uid,
        result: Result<Record, CrudError>,
    },
    Removed {
        task: TaskId,
        uid: Uid,
        result: Result<(), CrudError>,
    },
}

pub struct CrudTable<C: ResourceClient + ?Sized> {
    config: Arc<PageConfig>,
    client: Arc<C>,
    runtime: Handle,
    state: TableState,
    tasks: TaskSet,
    updater: Updater<Completion>,
    receiver: UpdateReceiver<Completion>,
    latest_load: Option<TaskId>,
}

impl<C: ResourceClient + ?Sized> CrudTable<C> {
    /// Remote calls are spawned on `runtime`; results are applied on the
    /// caller's thread.
    pub fn new(config: Arc<PageConfig>, client: Arc<C>, runtime: Handle) -> Self {
        let (updater, receiver) = update_channel();
        Self {
            config,
            client,
            runtime,
            state: TableState::default(),
            tasks: TaskSet::new(),
            updater,
            receiver,
            latest_load: None,
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn records(&self) -> &[Record] {
        self.state.records()
    }

    pub fn record(&self, uid: Uid) -> Option<&Record> {
        self.state.find(self.config.uid_field(), uid)
    }

    /// Whether any remote call has not reported back yet.
    pub fn has_in_flight(&self) -> bool {
        !self.tasks.is_empty()
    }

    pub fn can_edit(&self, uid: Uid) -> bool {
        self.record(uid)
            .is_some_and(|record| self.config.is_editable().allows(record))
    }

    pub fn can_delete(&self, uid: Uid) -> bool {
        !self.state.pending_edits.contains_key(&uid)
            && self
                .record(uid)
                .is_some_and(|record| self.config.is_deletable().allows(record))
    }

    /// Select the page the next `load()` fetches. Ignored by unpaginated pages.
    pub fn set_page(&mut self, page: usize) {
        self.state.page = page;
    }

    pub fn clear_error(&mut self) {
        self.state.error = None;
    }

    /// Fetch the current page. A load still in flight is superseded.
    pub fn load(&mut self) {
        if let Some(previous) = self.latest_load.take() {
            debug!("load {previous} superseded");
            self.tasks.cancel(previous);
        }

        let page = self.page_request();
        let client = Arc::clone(&self.client);
        let endpoint = self.config.endpoint().to_owned();
        let updater = self.updater.clone();
        let task = self.tasks.spawn(&self.runtime, "load", move |task| async move {
            let result = client.list(&endpoint, page).await;
            updater.set(Completion::Loaded { task, result });
        });

        info!("loading {} ({task})", self.config.endpoint());
        self.latest_load = Some(task);
        self.state.loading = true;
    }

    /// Optimistically merge `patch` into the record `uid` and send it.
    pub fn update(&mut self, uid: Uid, patch: Patch) -> Result<(), CrudError> {
        let uid_field = self.config.uid_field();
        let Some(index) = self.state.position(uid_field, uid) else {
            return Err(self.missing(uid));
        };

        let current = &self.state.records[index];
        if !self.config.is_editable().allows(current) {
            warn!("update of {uid} rejected by permission predicate");
            return Err(CrudError::PermissionDenied {
                op: OpKind::Update,
                uid,
            });
        }
        if let Some(value) = patch.get(uid_field)
            && current.get(uid_field) != Some(value)
        {
            return Err(CrudError::Validation(format!(
                "`{uid_field}` of record {uid} cannot be changed"
            )));
        }

        let base = current.clone();
        self.state.records[index].merge(&patch);

        if let Some(pending) = self.state.pending_edits.get_mut(&uid) {
            debug!("update of {uid} queued behind {}", pending.task);
            pending.queued.push_back(patch);
            return Ok(());
        }

        let task = self.spawn_update(uid, patch.clone());
        self.state.pending_edits.insert(
            uid,
            PendingEdit {
                task,
                base,
                in_flight: patch,
                queued: VecDeque::new(),
            },
        );
        Ok(())
    }

    /// Optimistically drop the record `uid` and send the delete.
    pub fn remove(&mut self, uid: Uid) -> Result<(), CrudError> {
        let Some(index) = self.state.position(self.config.uid_field(), uid) else {
            return Err(self.missing(uid));
        };
        if self.state.pending_edits.contains_key(&uid)
            || self.state.pending_removals.contains_key(&uid)
        {
            return Err(CrudError::PendingWrite(uid));
        }
        if !self.config.is_deletable().allows(&self.state.records[index]) {
            warn!("removal of {uid} rejected by permission predicate");
            return Err(CrudError::PermissionDenied {
                op: OpKind::Remove,
                uid,
            });
        }

        let record = self.state.records.remove(index);
        let client = Arc::clone(&self.client);
        let endpoint = self.config.endpoint().to_owned();
        let updater = self.updater.clone();
        let task = self.tasks.spawn(&self.runtime, "delete", move |task| async move {
            let result = client.delete(&endpoint, uid).await;
            updater.set(Completion::Removed { task, uid, result });
        });

        self.state
            .pending_removals
            .insert(uid, PendingRemoval { task, record, index });
        Ok(())
    }

    /// Send a new record. Nothing changes locally until the server answers.
    pub fn create(&mut self, record: Record) {
        let client = Arc::clone(&self.client);
        let endpoint = self.config.endpoint().to_owned();
        let updater = self.updater.clone();
        self.tasks.spawn(&self.runtime, "create", move |task| async move {
            let result = client.create(&endpoint, &record).await;
            updater.set(Completion::Created { task, result });
        });
        self.state.creating += 1;
    }

    /// Apply every completion that has arrived, without waiting.
    pub fn sync(&mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        for completion in self.receiver.drain() {
            self.apply(completion, &mut outcomes);
        }
        outcomes
    }

    /// Wait for the next completion and apply it. Returns immediately when
    /// nothing is in flight. Superseded results yield no outcome.
    pub async fn next_outcomes(&mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        if self.tasks.is_empty() {
            return outcomes;
        }
        if let Some(completion) = self.receiver.read().await {
            self.apply(completion, &mut outcomes);
        }
        outcomes
    }

    /// Apply completions until nothing is in flight.
    pub async fn settle(&mut self) -> Vec<Outcome> {
        let mut outcomes = self.sync();
        while self.has_in_flight() {
            outcomes.extend(self.next_outcomes().await);
        }
        outcomes
    }

    /// Tear the table down. Outstanding calls are cancelled and anything they
    /// would still report is dropped.
    pub fn unmount(mut self) {
        if !self.tasks.is_empty() {
            info!(
                "unmounting {} with {} call(s) in flight",
                self.config.endpoint(),
                self.tasks.len()
            );
        }
        self.tasks.cancel_all();
    }

    fn page_request(&self) -> Option<PageRequest> {
        self.config.page_size().map(|size| PageRequest {
            page: self.state.page,
            per_page: size.get(),
        })
    }

    fn missing(&self, uid: Uid) -> CrudError {
        if self.state.pending_removals.contains_key(&uid) {
            CrudError::PendingWrite(uid)
        } else {
            CrudError::NotFound(format!(
                "no record with {} = {uid}",
                self.config.uid_field()
            ))
        }
    }

    fn spawn_update(&mut self, uid: Uid, patch: Patch) -> TaskId {
        let client = Arc::clone(&self.client);
        let endpoint = self.config.endpoint().to_owned();
        let updater = self.updater.clone();
        self.tasks.spawn(&self.runtime, "update", move |task| async move {
            let result = client.update(&endpoint, uid, &patch).await;
            updater.set(Completion::Updated { task, uid, result });
        })
    }

    fn apply(&mut self, completion: Completion, outcomes: &mut Vec<Outcome>) {
        match completion {
            Completion::Loaded { task, result } => self.apply_loaded(task, result, outcomes),
            Completion::Created { task, result } => self.apply_created(task, result, outcomes),
            Completion::Updated { task, uid, result } => {
                self.apply_updated(task, uid, result, outcomes);
            }
            Completion::Removed { task, uid, result } => {
                self.apply_removed(task, uid, result, outcomes);
            }
        }
    }

    fn fail(&mut self, outcome: Outcome, err: CrudError, outcomes: &mut Vec<Outcome>) {
        self.state.error = Some(err);
        outcomes.push(outcome);
    }

    fn apply_loaded(
        &mut self,
        task: TaskId,
        result: Result<Vec<Record>, CrudError>,
        outcomes: &mut Vec<Outcome>,
    ) {
        let tracked = self.tasks.finish(task);
        if !tracked || self.latest_load != Some(task) {
            debug!("discarding result of superseded {task}");
            return;
        }
        self.latest_load = None;
        self.state.loading = false;

        match result {
            Ok(fetched) => {
                let records = self.reconcile(fetched);
                info!("loaded {} record(s) from {}", records.len(), self.config.endpoint());
                self.state.records = records;
                self.state.error = None;
                self.state.last_loaded = Some(Utc::now());
                outcomes.push(Outcome::ok(OpKind::Load, None));
            }
            Err(err) => {
                error!("loading {} failed: {err}", self.config.endpoint());
                self.fail(Outcome::err(OpKind::Load, None, err.clone()), err, outcomes);
            }
        }
    }

    /// Turn a fetched slice into the new record list: one row per uid, rows
    /// with a pending removal left out, pending patches laid over fetched rows.
    fn reconcile(&mut self, fetched: Vec<Record>) -> Vec<Record> {
        let uid_field = self.config.uid_field();
        let mut seen = HashSet::with_capacity(fetched.len());
        let mut records = Vec::with_capacity(fetched.len());

        for record in fetched {
            let Some(uid) = record.uid(uid_field) else {
                warn!("skipping record without a usable `{uid_field}`");
                continue;
            };
            if !seen.insert(uid) {
                warn!("duplicate `{uid_field}` {uid} in response, keeping the first");
                continue;
            }
            if self.state.pending_removals.contains_key(&uid) {
                continue;
            }
            match self.state.pending_edits.get_mut(&uid) {
                Some(pending) => {
                    records.push(pending.overlay(&record));
                    pending.base = record;
                }
                None => records.push(record),
            }
        }
        records
    }

    /// A server copy whose uid already has a pending write is treated like a
    /// fetched row: it becomes the rollback base of a pending edit, and a
    /// pending removal keeps it hidden.
    fn apply_created(
        &mut self,
        task: TaskId,
        result: Result<Record, CrudError>,
        outcomes: &mut Vec<Outcome>,
    ) {
        if !self.tasks.finish(task) {
            return;
        }
        self.state.creating = self.state.creating.saturating_sub(1);

        let uid_field = self.config.uid_field();
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                error!("creating a record in {} failed: {err}", self.config.endpoint());
                self.fail(Outcome::err(OpKind::Create, None, err.clone()), err, outcomes);
                return;
            }
        };
        let Some(uid) = record.uid(uid_field) else {
            let err = CrudError::server(None, format!("created record has no usable `{uid_field}`"));
            self.fail(Outcome::err(OpKind::Create, None, err.clone()), err, outcomes);
            return;
        };

        if let Some(pending) = self.state.pending_removals.get_mut(&uid) {
            debug!("created record {uid} stays hidden behind its pending removal");
            pending.record = record;
        } else {
            let local = match self.state.pending_edits.get_mut(&uid) {
                Some(pending) => {
                    let local = pending.overlay(&record);
                    pending.base = record;
                    local
                }
                None => record,
            };
            match self.state.position(uid_field, uid) {
                Some(index) => self.state.records[index] = local,
                None => self.state.records.push(local),
            }
        }
        info!("created record {uid} in {}", self.config.endpoint());
        outcomes.push(Outcome::ok(OpKind::Create, Some(uid)));
    }

    fn apply_updated(
        &mut self,
        task: TaskId,
        uid: Uid,
        result: Result<Record, CrudError>,
        outcomes: &mut Vec<Outcome>,
    ) {
        let tracked = self.tasks.finish(task);
        let current = self
            .state
            .pending_edits
            .get(&uid)
            .is_some_and(|pending| pending.task == task);
        if !tracked || !current {
            debug!("discarding result of stale {task}");
            return;
        }
        let Some(mut pending) = self.state.pending_edits.remove(&uid) else {
            return;
        };
        let position = self.state.position(self.config.uid_field(), uid);

        match result {
            Ok(server) => {
                let committed = pending.base.merged(&server);
                let local = if let Some(next) = pending.queued.pop_front() {
                    let task = self.spawn_update(uid, next.clone());
                    let next_pending = PendingEdit {
                        task,
                        base: committed,
                        in_flight: next,
                        queued: pending.queued,
                    };
                    let local = next_pending.overlay(&next_pending.base);
                    self.state.pending_edits.insert(uid, next_pending);
                    local
                } else {
                    committed
                };
                match position {
                    Some(index) => self.state.records[index] = local,
                    None => debug!("updated record {uid} is no longer listed"),
                }
                outcomes.push(Outcome::ok(OpKind::Update, Some(uid)));
            }
            Err(err) => {
                error!("updating {uid} failed, rolling back: {err}");
                if let Some(index) = position {
                    self.state.records[index] = pending.base;
                }
                self.fail(
                    Outcome::err(OpKind::Update, Some(uid), err.clone()),
                    err,
                    outcomes,
                );
                for _ in pending.queued {
                    outcomes.push(Outcome::err(
                        OpKind::Update,
                        Some(uid),
                        CrudError::Conflict(format!(
                            "queued update of {uid} discarded after an earlier update failed"
                        )),
                    ));
                }
            }
        }
    }

    fn apply_removed(
        &mut self,
        task: TaskId,
        uid: Uid,
        result: Result<(), CrudError>,
        outcomes: &mut Vec<Outcome>,
    ) {
        let tracked = self.tasks.finish(task);
        let current = self
            .state
            .pending_removals
            .get(&uid)
            .is_some_and(|pending| pending.task == task);
        if !tracked || !current {
            debug!("discarding result of stale {task}");
            return;
        }
        let Some(pending) = self.state.pending_removals.remove(&uid) else {
            return;
        };

        match result {
            Ok(()) => {
                info!("removed record {uid} from {}", self.config.endpoint());
                outcomes.push(Outcome::ok(OpKind::Remove, Some(uid)));
            }
            Err(err) => {
                error!("removing {uid} failed, restoring it: {err}");
                if self.state.position(self.config.uid_field(), uid).is_none() {
                    let index = pending.index.min(self.state.records.len());
                    self.state.records.insert(index, pending.record);
                }
                self.fail(
                    Outcome::err(OpKind::Remove, Some(uid), err.clone()),
                    err,
                    outcomes,
                );
            }
        }
    }
}

impl<C: ResourceClient + ?Sized> std::fmt::Debug for CrudTable<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudTable")
            .field("endpoint", &self.config.endpoint())
            .field("records", &self.state.records.len())
            .field("loading", &self.state.loading)
            .field("error", &self.state.error)
            .field("in_flight", &self.tasks.len())
            .finish()
    }
}
