use crate::ast::{ColumnType, ROW_ID, Value};
use crate::dataset::Table;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

pub const MAX_CHART_POINTS: usize = 10;
pub const MAX_LABEL_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Bar chart points for the leading rows of `table`. Labels come from the
/// first string column (or `id`), values from the first numeric non-`id`
/// column.
pub fn chart_points(table: &Table) -> Vec<ChartPoint> {
    let label_column = table
        .columns()
        .iter()
        .find(|c| c.column_type == ColumnType::String)
        .map_or(ROW_ID, |c| c.name.as_str());
    let value_column = table
        .columns()
        .iter()
        .find(|c| c.column_type == ColumnType::Number && c.name != ROW_ID)
        .map(|c| c.name.as_str());

    table
        .rows()
        .iter()
        .take(MAX_CHART_POINTS)
        .map(|row| {
            let label = row
                .get(label_column)
                .map(Value::stringify)
                .unwrap_or_default()
                .chars()
                .take(MAX_LABEL_CHARS)
                .collect();
            let value = value_column
                .and_then(|c| row.get(c))
                .and_then(Value::as_number)
                .and_then(|n| n.to_f64())
                .unwrap_or(0.0);
            ChartPoint { label, value }
        })
        .collect()
}
