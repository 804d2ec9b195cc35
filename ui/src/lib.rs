#![warn(clippy::all, rust_2018_idioms)]

//! egui front end of the admin panel.

pub mod app;
pub mod context;
pub mod pages;
pub mod routes;
pub mod theme;
pub mod widgets;

pub use app::AdminApp;
pub use context::PageContext;
pub use theme::Theme;
