//! Embedded grid for lists of structured records

use egui_extras::{Column, TableBuilder};
use serde_json::{Map, Value};

use super::{FieldWidget, WidgetEnv, WidgetKind};
use crate::constants::widget::TABLE_ROW_HEIGHT;
use crate::fields::value::value_to_text;
use crate::fields::{ColumnKind, ColumnSpec, FieldDescriptor, FieldValue, UpdatePayload};

#[derive(Debug, Clone)]
pub struct TableWidget {
    name: String,
    columns: Vec<ColumnSpec>,
    rows: Vec<Map<String, Value>>,
}

impl TableWidget {
    pub fn new(descriptor: &FieldDescriptor, value: &FieldValue) -> Self {
        let rows = value.to_records();
        let columns = if descriptor.table_schema.is_empty() {
            infer_columns(&rows)
        } else {
            descriptor.table_schema.clone()
        };
        Self {
            name: descriptor.name.clone(),
            columns,
            rows,
        }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn add_row(&mut self) -> UpdatePayload {
        let row = self
            .columns
            .iter()
            .map(|column| (column.name.clone(), column.default_cell()))
            .collect();
        let mut next = self.rows.clone();
        next.push(row);
        self.replace(next)
    }

    pub fn remove_row(&mut self, index: usize) -> Option<UpdatePayload> {
        if index >= self.rows.len() {
            return None;
        }
        let mut next = self.rows.clone();
        next.remove(index);
        Some(self.replace(next))
    }

    pub fn set_cell(&mut self, row: usize, column: &str, value: Value) -> Option<UpdatePayload> {
        if row >= self.rows.len() || !self.columns.iter().any(|c| c.name == column) {
            return None;
        }
        let mut next = self.rows.clone();
        next[row].insert(column.to_string(), value);
        Some(self.replace(next))
    }

    fn replace(&mut self, next: Vec<Map<String, Value>>) -> UpdatePayload {
        self.rows = next;
        UpdatePayload::new(FieldValue::Records(self.rows.clone()))
    }
}

/// Columns from the keys of the first row, typed by its values
fn infer_columns(rows: &[Map<String, Value>]) -> Vec<ColumnSpec> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    first
        .iter()
        .map(|(name, value)| {
            let kind = match value {
                Value::Bool(_) => ColumnKind::Bool,
                Value::Number(n) if n.is_i64() || n.is_u64() => ColumnKind::Int,
                Value::Number(_) => ColumnKind::Float,
                _ => ColumnKind::Str,
            };
            ColumnSpec::new(name.clone(), kind)
        })
        .collect()
}

/// Draw one cell editor; returns the new cell value when edited
fn cell_editor(ui: &mut egui::Ui, kind: ColumnKind, current: Option<&Value>) -> Option<Value> {
    match kind {
        ColumnKind::Str => {
            let mut text = current.map(value_to_text).unwrap_or_default();
            ui.add(egui::TextEdit::singleline(&mut text).desired_width(f32::INFINITY))
                .changed()
                .then(|| Value::String(text))
        }
        ColumnKind::Int => {
            let mut number = current.and_then(Value::as_i64).unwrap_or(0);
            ui.add(egui::DragValue::new(&mut number))
                .changed()
                .then(|| Value::from(number))
        }
        ColumnKind::Float => {
            let mut number = current.and_then(Value::as_f64).unwrap_or(0.0);
            ui.add(egui::DragValue::new(&mut number).speed(0.1))
                .changed()
                .then(|| Value::from(number))
        }
        ColumnKind::Bool => {
            let mut flag = current.and_then(Value::as_bool).unwrap_or(false);
            ui.checkbox(&mut flag, "").changed().then(|| Value::Bool(flag))
        }
    }
}

enum TableEdit {
    Cell(usize, String, Value),
    Remove(usize),
    Add,
}

impl FieldWidget for TableWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Table
    }

    fn show(&mut self, ui: &mut egui::Ui, env: &mut WidgetEnv<'_>) -> Option<UpdatePayload> {
        if self.columns.is_empty() {
            ui.weak("No columns defined");
            return None;
        }

        let mut edit = None;
        ui.add_enabled_ui(!env.disabled, |ui| {
            ui.push_id(("table", self.name.as_str()), |ui| {
                let mut table = TableBuilder::new(ui).striped(true);
                for _ in &self.columns {
                    table = table.column(Column::auto().at_least(60.0).resizable(true));
                }
                table = table.column(Column::exact(24.0));

                table
                    .header(TABLE_ROW_HEIGHT, |mut header| {
                        for column in &self.columns {
                            header.col(|ui| {
                                ui.strong(column.label());
                            });
                        }
                        header.col(|_| {});
                    })
                    .body(|mut body| {
                        for (row_index, row) in self.rows.iter().enumerate() {
                            body.row(TABLE_ROW_HEIGHT, |mut table_row| {
                                for column in &self.columns {
                                    table_row.col(|ui| {
                                        if let Some(value) = cell_editor(ui, column.kind, row.get(&column.name)) {
                                            edit = Some(TableEdit::Cell(row_index, column.name.clone(), value));
                                        }
                                    });
                                }
                                table_row.col(|ui| {
                                    if ui.small_button("🗑").clicked() {
                                        edit = Some(TableEdit::Remove(row_index));
                                    }
                                });
                            });
                        }
                    });
            });

            if ui.small_button("➕ Add row").clicked() {
                edit = Some(TableEdit::Add);
            }
        });

        match edit? {
            TableEdit::Cell(row, column, value) => self.set_cell(row, &column, value),
            TableEdit::Remove(row) => self.remove_row(row),
            TableEdit::Add => Some(self.add_row()),
        }
    }

    fn reset(&mut self, empty: &FieldValue) {
        self.rows = empty.to_records();
    }

    fn value(&self) -> FieldValue {
        FieldValue::Records(self.rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::TypeTag;
    use serde_json::json;

    fn schema() -> FieldDescriptor {
        FieldDescriptor::new("tools", TypeTag::Table).with_columns(vec![
            ColumnSpec::new("name", ColumnKind::Str),
            ColumnSpec::new("enabled", ColumnKind::Bool),
        ])
    }

    #[test]
    fn test_add_row_uses_column_defaults() {
        let mut w = TableWidget::new(&schema(), &FieldValue::Null);
        let payload = w.add_row();
        assert_eq!(payload.value, FieldValue::from(json!([{"name": "", "enabled": false}])));
    }

    #[test]
    fn test_edit_and_remove_rows() {
        let mut w = TableWidget::new(
            &schema(),
            &FieldValue::from(json!([{"name": "a", "enabled": true}, {"name": "b", "enabled": false}])),
        );
        let payload = w.set_cell(1, "enabled", Value::Bool(true)).unwrap();
        assert_eq!(payload.value.to_records()[1]["enabled"], Value::Bool(true));

        assert!(w.set_cell(0, "missing", Value::Null).is_none());

        let payload = w.remove_row(0).unwrap();
        assert_eq!(payload.value, FieldValue::from(json!([{"name": "b", "enabled": true}])));
    }

    #[test]
    fn test_columns_inferred_without_schema() {
        let w = TableWidget::new(
            &FieldDescriptor::new("rows", TypeTag::Table),
            &FieldValue::from(json!([{"label": "x", "count": 2, "ratio": 0.5}])),
        );
        let kinds: Vec<ColumnKind> = w.columns().iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ColumnKind::Str, ColumnKind::Int, ColumnKind::Float]);
    }
}
