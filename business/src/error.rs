//! Error taxonomy for CRUD operations and page configuration.

use thiserror::Error;

use crate::Uid;

/// The operation an outcome or error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Load,
    Create,
    Update,
    Remove,
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Update => "update",
            Self::Remove => "remove",
        })
    }
}

/// Coarse classification used by the UI to pick a banner and decide whether to
/// offer a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    PermissionDenied,
    NetworkFailure,
    ServerError,
    ValidationFailure,
    StaleStateConflict,
    Unauthorized,
    Forbidden,
    NotFound,
    PendingWrite,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrudError {
    /// A row predicate rejected the action. Never retried.
    #[error("{op} is not permitted for record {uid}")]
    PermissionDenied { op: OpKind, uid: Uid },

    /// Transport failure or timeout.
    #[error("network failure: {0}")]
    Network(String),

    #[error("not authenticated: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("server error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Server { status: Option<u16>, message: String },

    #[error("validation failed: {0}")]
    Validation(String),

    /// The server's copy diverged from the one the write was based on.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Another write for the same record has not resolved yet.
    #[error("a write for record {0} is still in flight")]
    PendingWrite(Uid),
}

impl CrudError {
    pub fn server(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::Network(_) => ErrorKind::NetworkFailure,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Server { .. } => ErrorKind::ServerError,
            Self::Validation(_) => ErrorKind::ValidationFailure,
            Self::Conflict(_) => ErrorKind::StaleStateConflict,
            Self::PendingWrite(_) => ErrorKind::PendingWrite,
        }
    }

    /// Failures that leave state intact and can be retried by reloading.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Server { .. })
    }

    /// Failures caused by missing rights; terminal for the operation.
    pub fn is_permission(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied { .. } | Self::Unauthorized(_) | Self::Forbidden(_)
        )
    }
}

/// Rejected page configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("page title must not be empty")]
    MissingTitle,
    #[error("page endpoint must not be empty")]
    MissingEndpoint,
    #[error("uid field must not be empty")]
    MissingUidField,
    #[error("page needs at least one column")]
    NoColumns,
    #[error("column `{0}` is declared more than once")]
    DuplicateColumn(String),
    #[error("page size must be greater than zero")]
    InvalidPageSize,
}
