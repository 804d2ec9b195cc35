//! Resource client boundary consumed by the CRUD table.
//!
//! The table never talks HTTP itself; it only sees [`ResourceClient`]. The
//! production implementation is [`HttpResourceClient`]. Tests plug in scripted
//! in-memory clients.

mod http;

use async_trait::async_trait;

use crate::{CrudError, Patch, Record, Uid};

pub use http::HttpResourceClient;

/// Which slice of a paginated collection to fetch. Pages are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

#[async_trait]
pub trait ResourceClient: Send + Sync + 'static {
    /// Records of `endpoint` in server order, or the requested page of them.
    async fn list(&self, endpoint: &str, page: Option<PageRequest>)
    -> Result<Vec<Record>, CrudError>;

    /// Create a record; returns the server's copy including any assigned uid.
    async fn create(&self, endpoint: &str, record: &Record) -> Result<Record, CrudError>;

    /// Apply `patch` to the record `uid`; returns the server's copy.
    async fn update(&self, endpoint: &str, uid: Uid, patch: &Patch) -> Result<Record, CrudError>;

    async fn delete(&self, endpoint: &str, uid: Uid) -> Result<(), CrudError>;
}
