use crate::ast::{Row, Value};
use crate::dataset::{Column, Dataset, DatasetError, Result, Table};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
struct DatasetDocument {
    name: String,
    tables: Vec<TableDocument>,
}

#[derive(Debug, Deserialize)]
struct TableDocument {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    columns: Vec<Column>,
    #[serde(default)]
    rows: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Load a dataset from a JSON file.
pub fn load(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let dataset = from_json_str(&text)?;
    log::info!(
        "Loaded dataset '{}' with {} tables from {}",
        dataset.name(),
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

pub fn from_json_str(text: &str) -> Result<Dataset> {
    from_json(serde_json::from_str(text)?)
}

pub fn from_json(value: serde_json::Value) -> Result<Dataset> {
    let document: DatasetDocument = serde_json::from_value(value)?;
    let tables = document
        .tables
        .into_iter()
        .map(|t| {
            let rows = t.rows.iter().map(row_from_json).collect::<Result<Vec<_>>>()?;
            Table::new(t.id, t.name, t.description, t.columns, rows)
        })
        .collect::<Result<Vec<_>>>()?;
    Dataset::new(document.name, tables)
}

/// Convert a JSON object into a row. Nested objects and arrays are rejected.
pub fn row_from_json(object: &serde_json::Map<String, serde_json::Value>) -> Result<Row> {
    object
        .iter()
        .map(|(k, v)| {
            let value = value_from_json(v).map_err(|reason| DatasetError::InvalidValue {
                column: k.clone(),
                reason,
            })?;
            Ok((k.clone(), value))
        })
        .collect()
}

pub fn value_from_json(value: &serde_json::Value) -> std::result::Result<Value, String> {
    match value {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Value::Number(Decimal::from(i)));
            }
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map(Value::Number)
                .map_err(|e| format!("number {text} out of range: {e}"))
        }
        serde_json::Value::Array(_) => Err("arrays are not supported".to_string()),
        serde_json::Value::Object(_) => Err("objects are not supported".to_string()),
    }
}
