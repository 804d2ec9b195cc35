//! Header row of the CRUD table.

use egui::Ui;
use egui_extras::TableRow;

pub const ACTIONS_LABEL: &str = "Actions";

/// Renders one bold label per column, then the actions header.
#[inline]
pub fn render_table_header<'l>(header: &mut TableRow<'_, '_>, labels: impl Iterator<Item = &'l str>) {
    for label in labels {
        header.col(|ui| {
            render_header_cell(ui, label);
        });
    }
    header.col(|ui| {
        render_header_cell(ui, ACTIONS_LABEL);
    });
}

#[inline]
fn render_header_cell(ui: &mut Ui, label: &str) {
    ui.strong(label);
}
