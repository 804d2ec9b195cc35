//! Configuration-driven list/edit/delete page.
//!
//! Composition only: navigation drawer on the left, then the auth guard around
//! one CRUD table. The engine is mounted the first time the guard opens, so the
//! resource client picks up the session token, and unmounted when the session
//! changes or the user navigates away.

use std::sync::Arc;

use admin_business::{CrudError, CrudTable, PageConfig, ResourceClient};
use egui::{CentralPanel, SidePanel, Ui};
use log::info;

use crate::context::PageContext;
use crate::widgets::{CrudTableView, Gate, SignInForm, auth_guard, crud_table, nav_drawer};

pub struct CrudPage {
    config: Arc<PageConfig>,
    table: Option<CrudTable<dyn ResourceClient>>,
    view: CrudTableView,
    /// Last mount failure; cleared by Retry or a new session.
    mount_error: Option<CrudError>,
    mounted_epoch: u64,
}

impl CrudPage {
    pub fn new(config: PageConfig) -> Self {
        Self {
            config: Arc::new(config),
            table: None,
            view: CrudTableView::new(),
            mount_error: None,
            mounted_epoch: 0,
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn title(&self) -> &str {
        self.config.title()
    }

    pub fn is_mounted(&self) -> bool {
        self.table.is_some()
    }

    pub fn mount_error(&self) -> Option<&CrudError> {
        self.mount_error.as_ref()
    }

    pub fn table(&self) -> Option<&CrudTable<dyn ResourceClient>> {
        self.table.as_ref()
    }

    pub fn table_mut(&mut self) -> Option<&mut CrudTable<dyn ResourceClient>> {
        self.table.as_mut()
    }

    pub fn view(&self) -> &CrudTableView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut CrudTableView {
        &mut self.view
    }

    /// Table and view together, for driving the widget from outside a frame.
    pub fn parts_mut(&mut self) -> Option<(&mut CrudTable<dyn ResourceClient>, &mut CrudTableView)> {
        let table = self.table.as_mut()?;
        Some((table, &mut self.view))
    }

    fn mount(&mut self, ctx: &PageContext) -> Result<(), CrudError> {
        self.mounted_epoch = ctx.auth.epoch();
        let client = ctx.resource_client()?;
        let mut table = CrudTable::new(Arc::clone(&self.config), client, ctx.runtime().clone());
        table.load();

        info!("Mounted page {}", self.config.title());
        self.table = Some(table);
        Ok(())
    }

    /// Drop the engine. Calls still in flight are cancelled and never applied.
    pub fn unmount(&mut self) {
        if let Some(table) = self.table.take() {
            info!("Unmounting page {}", self.config.title());
            table.unmount();
        }
        self.mount_error = None;
        self.view = CrudTableView::new();
    }

    fn render(&mut self, ui: &mut Ui, ctx: &PageContext) {
        if self.table.is_none()
            && self.mount_error.is_none()
            && let Err(err) = self.mount(ctx)
        {
            log::error!("Cannot mount page {}: {err}", self.config.title());
            self.mount_error = Some(err);
        }
        if let Some(err) = &self.mount_error {
            ui.colored_label(ctx.theme.error, format!("Cannot reach the API: {err}"));
            if ui.button("Retry").clicked() {
                self.mount_error = None;
                ui.ctx().request_repaint();
            }
            return;
        }
        let Some(table) = self.table.as_mut() else {
            return;
        };

        let outcomes = table.sync();
        self.view.observe(&outcomes);
        crud_table(ui, &ctx.theme, table, &mut self.view);
    }
}

impl std::fmt::Debug for CrudPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudPage")
            .field("title", &self.config.title())
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

/// Renders the page and returns the index of a page picked in the drawer.
pub fn crud_page(
    ui: &mut Ui,
    ctx: &mut PageContext,
    nav: &[&str],
    active: usize,
    page: &mut CrudPage,
    sign_in: &mut SignInForm,
) -> Option<usize> {
    let mut navigate = None;

    SidePanel::left("nav_drawer")
        .resizable(false)
        .exact_width(ctx.theme.drawer_width)
        .show_inside(ui, |ui| {
            navigate = nav_drawer(ui, &ctx.theme, nav, active);
        });

    let stale = page.is_mounted() || page.mount_error.is_some();
    if stale && page.mounted_epoch != ctx.auth.epoch() {
        page.unmount();
    }

    let request = CentralPanel::default()
        .show_inside(ui, |ui| {
            ui.heading(page.title());
            ui.add_space(ctx.theme.spacing);

            let shared: &PageContext = ctx;
            let gated = auth_guard(&shared.auth, sign_in, &shared.theme, |ui| {
                page.render(ui, shared);
            });
            match gated(ui) {
                Gate::Open(()) => None,
                Gate::Blocked { sign_in } => sign_in,
            }
        })
        .inner;

    if let Some(request) = request {
        request.apply(&mut ctx.auth);
    }

    navigate
}
