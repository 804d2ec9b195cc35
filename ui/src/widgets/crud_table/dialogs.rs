//! Edit, create and delete dialogs of the CRUD table.

use admin_business::{PageConfig, Patch, Record, Uid};
use egui::{Color32, RichText, TextEdit, Ui, Window};
use serde_json::Value;

use crate::theme::Theme;

/// Text buffers for the configured columns, minus the uid field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    fields: Vec<(String, String)>,
    original: Record,
}

impl Draft {
    pub fn for_create(config: &PageConfig) -> Self {
        Self::from_record(config, Record::new())
    }

    pub fn for_edit(config: &PageConfig, record: &Record) -> Self {
        Self::from_record(config, record.clone())
    }

    fn from_record(config: &PageConfig, original: Record) -> Self {
        let fields = config
            .columns()
            .iter()
            .filter(|column| column.field() != config.uid_field())
            .map(|column| {
                let text = original.get(column.field()).map(edit_text).unwrap_or_default();
                (column.field().to_owned(), text)
            })
            .collect();
        Self { fields, original }
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, text)| text.as_str())
    }

    /// Replace the text of `field`. Unknown fields are ignored.
    pub fn set(&mut self, field: &str, text: impl Into<String>) {
        if let Some((_, value)) = self.fields.iter_mut().find(|(name, _)| name == field) {
            *value = text.into();
        }
    }

    /// Only the fields whose value differs from the record being edited.
    pub fn to_patch(&self) -> Patch {
        let mut patch = Patch::new();
        for (field, text) in &self.fields {
            let original = self.original.get(field);
            let value = parse_text(original, text);
            if original.unwrap_or(&Value::Null) != &value {
                patch.insert(field.clone(), value);
            }
        }
        patch
    }

    /// New record from every non-empty field.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        for (field, text) in &self.fields {
            if !text.trim().is_empty() {
                record.insert(field.clone(), parse_text(None, text));
            }
        }
        record
    }
}

/// Strings edit verbatim, null as empty text, anything else as JSON.
fn edit_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Inverse of `edit_text`, keeping string fields strings.
fn parse_text(original: Option<&Value>, text: &str) -> Value {
    if let Some(Value::String(_)) = original {
        return Value::String(text.to_owned());
    }
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text.trim()).unwrap_or_else(|_| Value::String(text.to_owned()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResult {
    Open,
    Submit,
    Cancel,
}

fn draft_fields(ui: &mut Ui, draft: &mut Draft) {
    egui::Grid::new("crud_draft_fields")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            for (field, text) in &mut draft.fields {
                ui.label(format!("{field}:"));
                ui.add(TextEdit::singleline(text).desired_width(220.0));
                ui.end_row();
            }
        });
}

fn form_window(
    ui: &mut Ui,
    theme: &Theme,
    title: String,
    submit_label: &str,
    draft: &mut Draft,
) -> DialogResult {
    let mut open = true;
    let mut result = DialogResult::Open;

    Window::new(title)
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ui.ctx(), |ui| {
            draft_fields(ui, draft);
            ui.add_space(theme.spacing);

            ui.horizontal(|ui| {
                if ui.button(submit_label).clicked() {
                    result = DialogResult::Submit;
                }
                if ui.button("Cancel").clicked() {
                    result = DialogResult::Cancel;
                }
            });
        });

    if open { result } else { DialogResult::Cancel }
}

pub fn edit_dialog(ui: &mut Ui, theme: &Theme, uid: Uid, draft: &mut Draft) -> DialogResult {
    form_window(ui, theme, format!("Edit record {uid}"), "Save", draft)
}

pub fn create_dialog(ui: &mut Ui, theme: &Theme, draft: &mut Draft) -> DialogResult {
    form_window(ui, theme, "New record".to_owned(), "Create", draft)
}

pub fn delete_dialog(ui: &mut Ui, theme: &Theme, uid: Uid) -> DialogResult {
    let mut open = true;
    let mut result = DialogResult::Open;

    Window::new(format!("Delete record {uid}"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ui.ctx(), |ui| {
            ui.colored_label(Color32::from_rgb(255, 165, 0), "Warning");
            ui.label(format!("Are you sure you want to delete record {uid}?"));
            ui.add_space(theme.spacing);

            ui.horizontal(|ui| {
                if ui
                    .button(RichText::new("Confirm delete").color(theme.error))
                    .clicked()
                {
                    result = DialogResult::Submit;
                }
                if ui.button("Cancel").clicked() {
                    result = DialogResult::Cancel;
                }
            });
        });

    if open { result } else { DialogResult::Cancel }
}
