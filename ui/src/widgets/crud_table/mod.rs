//! CRUD table widget.
//!
//! Renders a [`CrudTable`] engine and turns clicks into engine calls:
//! - `columns`: column layout
//! - `header`: header row
//! - `row`: record rows and their action buttons
//! - `dialogs`: edit, create and delete confirmation windows
//!
//! The widget holds no records itself. [`CrudTableView`] only keeps the open
//! dialog and the last notice between frames.

pub mod columns;
pub mod dialogs;
pub mod header;
pub mod row;

use std::time::Duration;

use admin_business::{CrudError, CrudTable, OpKind, Outcome, Record, ResourceClient, Uid};
use egui::{Align, Button, Layout, Response, RichText, Ui};
use egui_extras::TableBuilder;

use self::columns::table_columns;
use self::dialogs::{DialogResult, Draft, create_dialog, delete_dialog, edit_dialog};
use self::header::render_table_header;
use self::row::{RowAction, prepare_row_data, render_record_row};
use crate::theme::Theme;

/// How often to poll for completions while calls are in flight.
const IN_FLIGHT_REPAINT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq)]
enum Dialog {
    Edit { uid: Uid, draft: Draft },
    Create(Draft),
    ConfirmDelete(Uid),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

/// UI-only state of one table widget.
#[derive(Debug, Default)]
pub struct CrudTableView {
    dialog: Option<Dialog>,
    notice: Option<Notice>,
}

impl CrudTableView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the edit dialog for `record`, as the row's Edit button does.
    pub fn request_edit<C: ResourceClient + ?Sized>(&mut self, table: &CrudTable<C>, uid: Uid) {
        if let Some(record) = table.record(uid) {
            self.dialog = Some(Dialog::Edit {
                uid,
                draft: Draft::for_edit(table.config(), record),
            });
        }
    }

    /// Ask for confirmation before deleting `uid`.
    pub fn request_delete(&mut self, uid: Uid) {
        self.dialog = Some(Dialog::ConfirmDelete(uid));
    }

    pub fn request_create<C: ResourceClient + ?Sized>(&mut self, table: &CrudTable<C>) {
        self.dialog = Some(Dialog::Create(Draft::for_create(table.config())));
    }

    /// Draft of the open edit or create dialog.
    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        match &mut self.dialog {
            Some(Dialog::Edit { draft, .. } | Dialog::Create(draft)) => Some(draft),
            Some(Dialog::ConfirmDelete(_)) | None => None,
        }
    }

    pub fn has_dialog(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Summarize applied writes for the status line. Loads report through
    /// the error banner instead.
    pub fn observe(&mut self, outcomes: &[Outcome]) {
        for outcome in outcomes {
            if outcome.op == OpKind::Load {
                continue;
            }
            let subject = match outcome.uid {
                Some(uid) => format!("record {uid}"),
                None => "a record".to_owned(),
            };
            self.notice = match (&outcome.result, outcome.op) {
                (Ok(()), op) => Some(Notice {
                    text: format!("{} {subject}", past_tense(op)),
                    is_error: false,
                }),
                (Err(err), op) => Some(Notice {
                    text: format!("Could not {op} {subject}: {err}"),
                    is_error: true,
                }),
            };
        }
    }

    fn reject(&mut self, err: &CrudError) {
        self.notice = Some(Notice {
            text: err.to_string(),
            is_error: true,
        });
    }
}

fn past_tense(op: OpKind) -> &'static str {
    match op {
        OpKind::Load => "Loaded",
        OpKind::Create => "Created",
        OpKind::Update => "Updated",
        OpKind::Remove => "Deleted",
    }
}

/// Renders toolbar, error banner, records and any open dialog.
pub fn crud_table<C: ResourceClient + ?Sized>(
    ui: &mut Ui,
    theme: &Theme,
    table: &mut CrudTable<C>,
    view: &mut CrudTableView,
) -> Response {
    let response = ui.vertical(|ui| {
        render_toolbar(ui, theme, table, view);
        render_error_banner(ui, theme, table);
        render_notice(ui, theme, view);
        ui.add_space(theme.spacing);

        if table.records().is_empty() && !table.state().is_loading() {
            ui.label(RichText::new("No records").color(theme.muted));
        } else if let Some(action) = render_records(ui, theme, table) {
            match action {
                RowAction::Edit(uid) => view.request_edit(table, uid),
                RowAction::Delete(uid) => view.request_delete(uid),
            }
        }
    });

    render_dialog(ui, theme, table, view);

    if table.has_in_flight() {
        ui.ctx().request_repaint_after(IN_FLIGHT_REPAINT);
    }

    response.response
}

fn render_toolbar<C: ResourceClient + ?Sized>(
    ui: &mut Ui,
    theme: &Theme,
    table: &mut CrudTable<C>,
    view: &mut CrudTableView,
) {
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!table.state().is_loading(), Button::new("Refresh"))
            .clicked()
        {
            table.load();
        }
        if ui.button("New record").clicked() {
            view.request_create(table);
        }

        if let Some(page_size) = table.config().page_size() {
            let page = table.state().page();
            if ui.add_enabled(page > 0, Button::new("Prev")).clicked() {
                table.set_page(page - 1);
                table.load();
            }
            ui.label(format!("Page {}", page + 1));
            let full_page = table.records().len() >= page_size.get();
            if ui.add_enabled(full_page, Button::new("Next")).clicked() {
                table.set_page(page + 1);
                table.load();
            }
        }

        if table.state().is_loading() {
            ui.spinner();
            ui.label("Loading...");
        }

        let pending = table.state().pending_writes();
        if pending > 0 {
            ui.label(RichText::new(format!("{pending} pending")).color(theme.pending));
        }

        if let Some(loaded) = table.state().last_loaded() {
            ui.label(
                RichText::new(format!("Updated {}", loaded.format("%H:%M:%S UTC")))
                    .small()
                    .color(theme.muted),
            );
        }
    });
}

/// Failed calls keep the last good records on screen; only a banner appears.
fn render_error_banner<C: ResourceClient + ?Sized>(
    ui: &mut Ui,
    theme: &Theme,
    table: &mut CrudTable<C>,
) {
    let Some(err) = table.state().error() else {
        return;
    };
    let text = format!("Error: {err}");
    let recoverable = err.is_recoverable();

    ui.horizontal(|ui| {
        ui.colored_label(theme.error, text);
        if recoverable && ui.button("Retry").clicked() {
            table.clear_error();
            table.load();
        }
        if ui.button("Dismiss").clicked() {
            table.clear_error();
        }
    });
}

fn render_notice(ui: &mut Ui, theme: &Theme, view: &CrudTableView) {
    if let Some(notice) = view.notice() {
        let color = if notice.is_error {
            theme.error
        } else {
            theme.success
        };
        ui.colored_label(color, &notice.text);
    }
}

fn render_records<C: ResourceClient + ?Sized>(
    ui: &mut Ui,
    theme: &Theme,
    table: &CrudTable<C>,
) -> Option<RowAction> {
    let rows: Vec<_> = table
        .records()
        .iter()
        .filter_map(|record: &Record| prepare_row_data(table, record))
        .collect();
    let columns = table.config().columns();
    let mut action = None;

    let mut builder = TableBuilder::new(ui)
        .striped(true)
        .cell_layout(Layout::left_to_right(Align::Center));
    for column in table_columns(columns.len()) {
        builder = builder.column(column);
    }

    builder
        .header(theme.header_height, |mut header| {
            render_table_header(&mut header, columns.iter().map(|c| c.label()));
        })
        .body(|mut body| {
            for data in &rows {
                body.row(theme.row_height, |mut row| {
                    if let Some(clicked) = render_record_row(&mut row, theme, data) {
                        action = Some(clicked);
                    }
                });
            }
        });

    action
}

fn render_dialog<C: ResourceClient + ?Sized>(
    ui: &mut Ui,
    theme: &Theme,
    table: &mut CrudTable<C>,
    view: &mut CrudTableView,
) {
    let Some(dialog) = &mut view.dialog else {
        return;
    };

    let result = match dialog {
        Dialog::Edit { uid, draft } => edit_dialog(ui, theme, *uid, draft),
        Dialog::Create(draft) => create_dialog(ui, theme, draft),
        Dialog::ConfirmDelete(uid) => delete_dialog(ui, theme, *uid),
    };

    match result {
        DialogResult::Open => {}
        DialogResult::Cancel => view.dialog = None,
        DialogResult::Submit => {
            let Some(dialog) = view.dialog.take() else {
                return;
            };
            let submitted = match dialog {
                Dialog::Edit { uid, draft } => {
                    let patch = draft.to_patch();
                    if patch.is_empty() {
                        Ok(())
                    } else {
                        table.update(uid, patch)
                    }
                }
                Dialog::Create(draft) => {
                    table.create(draft.to_record());
                    Ok(())
                }
                Dialog::ConfirmDelete(uid) => table.remove(uid),
            };
            if let Err(err) = submitted {
                log::warn!("{err}");
                view.reject(&err);
            }
        }
    }
}
