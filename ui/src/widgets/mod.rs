mod auth_guard;
pub mod crud_table;
mod nav_drawer;

pub use auth_guard::{Gate, SignInForm, SignInRequest, auth_guard};
pub use crud_table::{CrudTableView, Notice, crud_table};
pub use nav_drawer::nav_drawer;
