//! Column layout for the CRUD table.

use egui_extras::Column;

pub const MIN_FIELD_WIDTH: f32 = 80.0;
pub const ACTIONS_WIDTH: f32 = 150.0;

/// One resizable column per configured field, then a fixed actions column.
#[inline]
pub fn table_columns(fields: usize) -> Vec<Column> {
    let mut columns = vec![
        Column::auto()
            .at_least(MIN_FIELD_WIDTH)
            .resizable(true)
            .clip(true);
        fields
    ];
    columns.push(Column::exact(ACTIONS_WIDTH));
    columns
}
