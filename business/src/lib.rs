//! Domain layer of the admin panel: records, page configuration, the resource
//! client and the CRUD table engine that keeps them consistent.

mod auth_state;
mod column;
mod config;
mod crud_table;
mod error;
pub mod http;
mod page_config;
mod permission;
mod record;
mod resource;

pub use auth_state::{AuthState, AuthStatus};
pub use column::{Column, PLACEHOLDER, Renderer, default_render};
pub use config::AdminConfig;
pub use crud_table::{CrudTable, Outcome, PendingEdit, PendingRemoval, TableState};
pub use error::{ConfigError, CrudError, ErrorKind, OpKind};
pub use page_config::{DEFAULT_UID_FIELD, PageConfig};
pub use permission::Permission;
pub use record::{Patch, Record, Uid};
pub use resource::{HttpResourceClient, PageRequest, ResourceClient};
