//! Table state owned by a single [`crate::CrudTable`].

use std::collections::{HashMap, VecDeque};

use admin_states::TaskId;
use chrono::{DateTime, Utc};

use crate::{CrudError, Patch, Record, Uid};

/// An update that has been applied locally but not confirmed by the server.
#[derive(Debug, Clone)]
pub struct PendingEdit {
    pub(crate) task: TaskId,
    /// Last server-confirmed copy; restored if the in-flight write fails.
    pub(crate) base: Record,
    pub(crate) in_flight: Patch,
    /// Later updates to the same record, issued one at a time.
    pub(crate) queued: VecDeque<Patch>,
}

impl PendingEdit {
    pub fn in_flight(&self) -> &Patch {
        &self.in_flight
    }

    pub fn queued(&self) -> usize {
        self.queued.len()
    }

    /// `record` with every outstanding patch for it applied in order.
    pub(crate) fn overlay(&self, record: &Record) -> Record {
        let mut local = record.merged(&self.in_flight);
        for patch in &self.queued {
            local.merge(patch);
        }
        local
    }
}

/// A record removed locally whose remote delete has not resolved.
#[derive(Debug, Clone)]
pub struct PendingRemoval {
    pub(crate) task: TaskId,
    pub(crate) record: Record,
    /// Ordinal position at removal time, used to put it back on failure.
    pub(crate) index: usize,
}

#[derive(Debug, Default)]
pub struct TableState {
    pub(crate) records: Vec<Record>,
    pub(crate) loading: bool,
    pub(crate) error: Option<CrudError>,
    pub(crate) pending_edits: HashMap<Uid, PendingEdit>,
    pub(crate) pending_removals: HashMap<Uid, PendingRemoval>,
    pub(crate) creating: usize,
    pub(crate) last_loaded: Option<DateTime<Utc>>,
    pub(crate) page: usize,
}

impl TableState {
    /// Records in server order, with local optimistic changes applied.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&CrudError> {
        self.error.as_ref()
    }

    pub fn pending_edit(&self, uid: Uid) -> Option<&PendingEdit> {
        self.pending_edits.get(&uid)
    }

    /// Whether any write for `uid` is outstanding.
    pub fn is_pending(&self, uid: Uid) -> bool {
        self.pending_edits.contains_key(&uid) || self.pending_removals.contains_key(&uid)
    }

    pub fn pending_writes(&self) -> usize {
        self.pending_edits.len() + self.pending_removals.len() + self.creating
    }

    pub fn last_loaded(&self) -> Option<DateTime<Utc>> {
        self.last_loaded
    }

    /// Zero-based page requested by the next load.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn find(&self, uid_field: &str, uid: Uid) -> Option<&Record> {
        self.position(uid_field, uid).map(|index| &self.records[index])
    }

    pub(crate) fn position(&self, uid_field: &str, uid: Uid) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.uid(uid_field) == Some(uid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overlay_applies_in_flight_then_queued() {
        let pending = PendingEdit {
            task: TaskId::new("update", 1),
            base: Record::new().with("id", 1).with("name", "A"),
            in_flight: Record::new().with("name", "B").with("tag", "x"),
            queued: VecDeque::from([Record::new().with("name", "C")]),
        };

        let local = pending.overlay(&Record::new().with("id", 1).with("name", "server").with("age", 3));

        assert_eq!(local.get("name"), Some(&json!("C")));
        assert_eq!(local.get("tag"), Some(&json!("x")));
        assert_eq!(local.get("age"), Some(&json!(3)));
        assert_eq!(pending.queued(), 1);
    }

    #[test]
    fn find_by_uid() {
        let state = TableState {
            records: vec![
                Record::new().with("id", 1).with("name", "A"),
                Record::new().with("id", "2").with("name", "B"),
            ],
            ..TableState::default()
        };

        assert_eq!(state.position("id", Uid::from(2)), Some(1));
        assert_eq!(
            state.find("id", Uid::from(1)).and_then(|r| r.get("name")),
            Some(&json!("A"))
        );
        assert!(state.find("id", Uid::from(3)).is_none());
        assert!(!state.is_pending(Uid::from(1)));
    }
}
