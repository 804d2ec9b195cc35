use admin_business::PageConfig;
use egui::{RichText, TopBottomPanel, Ui};
use log::info;

use crate::context::PageContext;
use crate::pages::{CrudPage, crud_page};
use crate::widgets::SignInForm;

/// Admin panel: one CRUD page per route, one of them active.
pub struct AdminApp {
    ctx: PageContext,
    pages: Vec<CrudPage>,
    active: usize,
    sign_in: SignInForm,
}

impl AdminApp {
    /// Called once before the first frame.
    pub fn new(ctx: PageContext, routes: Vec<PageConfig>) -> Self {
        Self {
            ctx,
            pages: routes.into_iter().map(CrudPage::new).collect(),
            active: 0,
            sign_in: SignInForm::default(),
        }
    }

    pub fn ctx(&self) -> &PageContext {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut PageContext {
        &mut self.ctx
    }

    pub fn sign_in_form_mut(&mut self) -> &mut SignInForm {
        &mut self.sign_in
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn pages(&self) -> &[CrudPage] {
        &self.pages
    }

    pub fn active_page(&self) -> Option<&CrudPage> {
        self.pages.get(self.active)
    }

    pub fn active_page_mut(&mut self) -> Option<&mut CrudPage> {
        self.pages.get_mut(self.active)
    }

    /// Switch pages. The page being left is unmounted.
    pub fn navigate(&mut self, index: usize) {
        if index == self.active || index >= self.pages.len() {
            return;
        }
        if let Some(page) = self.pages.get_mut(self.active) {
            page.unmount();
        }
        info!("Navigating to {}", self.pages[index].title());
        self.active = index;
    }

    pub fn sign_out(&mut self) {
        self.ctx.auth.logout();
        for page in &mut self.pages {
            page.unmount();
        }
    }

    /// One frame of the whole panel inside `ui`.
    pub fn ui(&mut self, ui: &mut Ui) {
        TopBottomPanel::top("top_panel").show_inside(ui, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Admin");
                if let Some(username) = self.ctx.auth.username() {
                    ui.separator();
                    ui.label(RichText::new(format!("Signed in as {username}")).color(self.ctx.theme.muted));
                    if ui.button("Sign out").clicked() {
                        self.sign_out();
                    }
                }
            });
        });

        let titles: Vec<String> = self.pages.iter().map(|p| p.title().to_owned()).collect();
        let titles: Vec<&str> = titles.iter().map(String::as_str).collect();
        let Some(page) = self.pages.get_mut(self.active) else {
            ui.label("No pages configured");
            return;
        };

        let navigate = crud_page(ui, &mut self.ctx, &titles, self.active, page, &mut self.sign_in);
        if let Some(index) = navigate {
            self.navigate(index);
        }
    }
}

impl eframe::App for AdminApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| self.ui(ui));
    }
}
