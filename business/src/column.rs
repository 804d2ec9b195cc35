//! Column descriptors for the CRUD table.

use std::sync::Arc;

use serde_json::Value;

use crate::Record;

/// Text shown for a field a record does not have.
pub const PLACEHOLDER: &str = "";

/// Display transform applied to a field value.
pub type Renderer = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Describes one displayed field: which record key, its header label and an
/// optional display transform.
#[derive(Clone)]
pub struct Column {
    field: String,
    label: String,
    renderer: Option<Renderer>,
}

impl Column {
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            renderer: None,
        }
    }

    pub fn with_renderer(mut self, renderer: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Cell text for `record`. Missing fields and `null` render as [`PLACEHOLDER`].
    pub fn render(&self, record: &Record) -> String {
        match record.get(&self.field) {
            None | Some(Value::Null) => PLACEHOLDER.to_owned(),
            Some(value) => match &self.renderer {
                Some(renderer) => renderer(value),
                None => default_render(value),
            },
        }
    }
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("field", &self.field)
            .field("label", &self.label)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

/// Strings verbatim, everything else as compact JSON.
pub fn default_render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => PLACEHOLDER.to_owned(),
        other => other.to_string(),
    }
}
