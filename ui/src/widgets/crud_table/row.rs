//! Record rows of the CRUD table.

use admin_business::{CrudTable, Record, ResourceClient, Uid};
use egui::{Button, RichText, Ui};
use egui_extras::TableRow;

use crate::theme::Theme;

/// Everything a row needs, computed before the table borrows the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRowData {
    pub uid: Uid,
    pub cells: Vec<String>,
    pub can_edit: bool,
    pub can_delete: bool,
    pub is_pending: bool,
}

/// A row button that was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit(Uid),
    Delete(Uid),
}

/// `None` for records without a usable uid, which the table cannot address.
pub fn prepare_row_data<C: ResourceClient + ?Sized>(
    table: &CrudTable<C>,
    record: &Record,
) -> Option<RecordRowData> {
    let config = table.config();
    let uid = record.uid(config.uid_field())?;
    Some(RecordRowData {
        uid,
        cells: config
            .columns()
            .iter()
            .map(|column| column.render(record))
            .collect(),
        can_edit: table.can_edit(uid),
        can_delete: table.can_delete(uid),
        is_pending: table.state().is_pending(uid),
    })
}

#[inline]
pub fn render_record_row(
    row: &mut TableRow<'_, '_>,
    theme: &Theme,
    data: &RecordRowData,
) -> Option<RowAction> {
    let mut action = None;

    for cell in &data.cells {
        row.col(|ui| {
            if data.is_pending {
                ui.label(RichText::new(cell).italics().color(theme.pending));
            } else {
                ui.label(cell);
            }
        });
    }

    row.col(|ui| {
        action = render_action_buttons(ui, theme, data);
    });

    action
}

/// Buttons are only shown for actions the row's permissions allow.
fn render_action_buttons(ui: &mut Ui, theme: &Theme, data: &RecordRowData) -> Option<RowAction> {
    if data.is_pending {
        ui.spinner();
        ui.label(RichText::new("Saving...").color(theme.pending));
        return None;
    }

    let mut action = None;
    if data.can_edit && ui.button("Edit").on_hover_text("Edit record").clicked() {
        action = Some(RowAction::Edit(data.uid));
    }
    if data.can_delete
        && ui
            .add(Button::new(RichText::new("Delete").color(theme.error)))
            .on_hover_text("Delete record")
            .clicked()
    {
        action = Some(RowAction::Delete(data.uid));
    }
    if !data.can_edit && !data.can_delete {
        ui.label(RichText::new("Read only").color(theme.muted));
    }
    action
}
