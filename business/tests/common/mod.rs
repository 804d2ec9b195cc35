//! In-memory resource client with scripted failures and hold points.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use admin_business::{
    Column, CrudError, CrudTable, OpKind, PageConfig, PageRequest, Patch, Record,
    ResourceClient, Uid,
};
use async_trait::async_trait;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn uid(n: u64) -> Uid {
    Uid::from(n)
}

pub fn row(value: Value) -> Record {
    Record::try_from(value).expect("test rows are JSON objects")
}

pub fn patch(value: Value) -> Patch {
    row(value)
}

pub fn users_config() -> PageConfig {
    PageConfig::builder()
        .title("Users")
        .endpoint("users")
        .columns(vec![Column::new("id", "ID"), Column::new("name", "Name")])
        .build()
        .expect("users config is valid")
}

pub fn table(config: PageConfig, client: &Arc<ScriptedClient>) -> CrudTable<ScriptedClient> {
    CrudTable::new(Arc::new(config), Arc::clone(client), Handle::current())
}

#[derive(Default)]
struct Inner {
    rows: Vec<Record>,
    next_id: u64,
    failures: HashMap<(OpKind, Option<Uid>), VecDeque<CrudError>>,
    holds: HashMap<OpKind, VecDeque<oneshot::Receiver<()>>>,
    calls: Vec<(OpKind, Option<Uid>)>,
    pages: Vec<Option<PageRequest>>,
}

/// Server stand-in keyed by `id`. Creating assigns the next numeric id.
#[derive(Default)]
pub struct ScriptedClient {
    inner: Mutex<Inner>,
}

impl ScriptedClient {
    pub fn with_rows(rows: Vec<Record>) -> Arc<Self> {
        let next_id = rows
            .iter()
            .filter_map(|row| row.get("id").and_then(Value::as_u64))
            .max()
            .unwrap_or(0)
            + 1;
        Arc::new(Self {
            inner: Mutex::new(Inner {
                rows,
                next_id,
                ..Inner::default()
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("scripted client lock poisoned")
    }

    /// Fail the next `op`, whichever record it targets.
    pub fn fail_next(&self, op: OpKind, err: CrudError) {
        self.lock()
            .failures
            .entry((op, None))
            .or_default()
            .push_back(err);
    }

    /// Fail the next `op` on `uid` only.
    pub fn fail_next_for(&self, op: OpKind, uid: Uid, err: CrudError) {
        self.lock()
            .failures
            .entry((op, Some(uid)))
            .or_default()
            .push_back(err);
    }

    /// Park the next `op` until the returned sender fires or is dropped.
    pub fn hold_next(&self, op: OpKind) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.lock().holds.entry(op).or_default().push_back(rx);
        tx
    }

    /// Id handed to the next created record.
    pub fn set_next_id(&self, id: u64) {
        self.lock().next_id = id;
    }

    pub fn rows(&self) -> Vec<Record> {
        self.lock().rows.clone()
    }

    pub fn set_rows(&self, rows: Vec<Record>) {
        self.lock().rows = rows;
    }

    pub fn calls(&self) -> Vec<(OpKind, Option<Uid>)> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, op: OpKind) -> usize {
        self.lock().calls.iter().filter(|(kind, _)| *kind == op).count()
    }

    pub fn pages(&self) -> Vec<Option<PageRequest>> {
        self.lock().pages.clone()
    }

    /// Yield to the runtime until `n` calls of `op` have reached the client.
    pub async fn wait_for_calls(&self, op: OpKind, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.call_count(op) < n {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("expected calls never reached the client");
    }

    /// Record the call, wait on any hold, then pop a scripted failure.
    async fn enter(&self, op: OpKind, uid: Option<Uid>) -> Result<(), CrudError> {
        let hold = {
            let mut inner = self.lock();
            inner.calls.push((op, uid));
            inner.holds.get_mut(&op).and_then(VecDeque::pop_front)
        };
        if let Some(hold) = hold {
            let _ = hold.await;
        }

        let mut inner = self.lock();
        let scripted = uid
            .and_then(|uid| inner.failures.get_mut(&(op, Some(uid))))
            .and_then(VecDeque::pop_front);
        let err = match scripted {
            Some(err) => Some(err),
            None => inner
                .failures
                .get_mut(&(op, None))
                .and_then(VecDeque::pop_front),
        };
        err.map_or(Ok(()), Err)
    }

    fn position(inner: &Inner, uid: Uid) -> Option<usize> {
        inner.rows.iter().position(|row| row.uid("id") == Some(uid))
    }
}

#[async_trait]
impl ResourceClient for ScriptedClient {
    async fn list(
        &self,
        _endpoint: &str,
        page: Option<PageRequest>,
    ) -> Result<Vec<Record>, CrudError> {
        self.lock().pages.push(page);
        self.enter(OpKind::Load, None).await?;

        let inner = self.lock();
        Ok(match page {
            Some(PageRequest { page, per_page }) => inner
                .rows
                .iter()
                .skip(page * per_page)
                .take(per_page)
                .cloned()
                .collect(),
            None => inner.rows.clone(),
        })
    }

    async fn create(&self, _endpoint: &str, record: &Record) -> Result<Record, CrudError> {
        self.enter(OpKind::Create, None).await?;

        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        let created = record.clone().with("id", id);
        inner.rows.push(created.clone());
        Ok(created)
    }

    async fn update(&self, _endpoint: &str, uid: Uid, patch: &Patch) -> Result<Record, CrudError> {
        self.enter(OpKind::Update, Some(uid)).await?;

        let mut inner = self.lock();
        let index = Self::position(&inner, uid)
            .ok_or_else(|| CrudError::NotFound(format!("record {uid}")))?;
        inner.rows[index].merge(patch);
        Ok(inner.rows[index].clone())
    }

    async fn delete(&self, _endpoint: &str, uid: Uid) -> Result<(), CrudError> {
        self.enter(OpKind::Remove, Some(uid)).await?;

        let mut inner = self.lock();
        let index = Self::position(&inner, uid)
            .ok_or_else(|| CrudError::NotFound(format!("record {uid}")))?;
        inner.rows.remove(index);
        Ok(())
    }
}
