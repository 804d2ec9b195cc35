//! Pages of the admin panel.

mod crud_page;

pub use crud_page::{CrudPage, crud_page};
