//! Row-level permission predicates.

use std::sync::Arc;

use crate::Record;

/// Decides whether an action (edit or delete) is allowed on a record.
///
/// Predicates only ever see a shared borrow of the record. An unset permission
/// allows everything.
#[derive(Clone, Default)]
pub struct Permission(Option<Arc<dyn Fn(&Record) -> bool + Send + Sync>>);

impl Permission {
    pub fn always() -> Self {
        Self(None)
    }

    pub fn never() -> Self {
        Self::new(|_| false)
    }

    pub fn new(predicate: impl Fn(&Record) -> bool + Send + Sync + 'static) -> Self {
        Self(Some(Arc::new(predicate)))
    }

    pub fn allows(&self, record: &Record) -> bool {
        self.0.as_ref().is_none_or(|predicate| predicate(record))
    }

    /// Whether a predicate was supplied at all.
    pub fn is_restricted(&self) -> bool {
        self.0.is_some()
    }
}

impl std::fmt::Debug for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_restricted() {
            f.write_str("Permission(predicate)")
        } else {
            f.write_str("Permission(always)")
        }
    }
}
