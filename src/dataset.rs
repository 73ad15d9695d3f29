pub mod loader;
pub mod seed;

use crate::ast::{ColumnType, ROW_ID, Row, Value};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    Json(serde_json::Error),
    DuplicateTableId(String),
    DuplicateTableName(String),
    DuplicateColumn { table: String, column: String },
    MissingColumnValue {
        table: String,
        row: usize,
        column: String,
    },
    InvalidRowId { table: String, row: usize },
    DuplicateRowId { table: String, id: String },
    InvalidValue { column: String, reason: String },
    UnknownTable(String),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Failed to read dataset: {e}"),
            Self::Json(e) => write!(f, "Invalid dataset document: {e}"),
            Self::DuplicateTableId(id) => write!(f, "Duplicate table id: {id}"),
            Self::DuplicateTableName(name) => write!(f, "Duplicate table name: {name}"),
            Self::DuplicateColumn { table, column } => {
                write!(f, "Duplicate column '{column}' in table '{table}'")
            }
            Self::MissingColumnValue { table, row, column } => {
                write!(f, "Row {row} of table '{table}' has no value for column '{column}'")
            }
            Self::InvalidRowId { table, row } => write!(
                f,
                "Row {row} of table '{table}' needs a number or string '{ROW_ID}'"
            ),
            Self::DuplicateRowId { table, id } => {
                write!(f, "Duplicate row id {id} in table '{table}'")
            }
            Self::InvalidValue { column, reason } => {
                write!(f, "Invalid value for column '{column}': {reason}")
            }
            Self::UnknownTable(id) => write!(f, "Unknown table id: {id}"),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(rename = "isPrimaryKey", default)]
    pub is_primary_key: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            is_primary_key: false,
        }
    }

    pub fn primary_key(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            is_primary_key: true,
            ..Self::new(name, column_type)
        }
    }
}

/// Schema of a table without its rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub name: String,
    pub description: Option<String>,
    pub columns: Vec<Column>,
}

impl TableSchema {
    /// Prose description of the table used in assistant prompts.
    pub fn describe(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("{} ({})", c.name, c.column_type))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Table: {} ({})\nColumns: {columns}",
            self.name,
            self.description.as_deref().unwrap_or_default()
        )
    }
}

/// A named table with typed columns. Rows always hold a value for every
/// declared column and a unique identity under `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    id: String,
    name: String,
    description: Option<String>,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
        columns: Vec<Column>,
        rows: Vec<Row>,
    ) -> Result<Self> {
        let name = name.into();

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(DatasetError::DuplicateColumn {
                    table: name,
                    column: column.name.clone(),
                });
            }
        }

        let mut table = Self {
            id: id.into(),
            name,
            description,
            columns,
            rows: Vec::with_capacity(rows.len()),
        };
        table.push_rows(rows)?;
        Ok(table)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn schema(&self) -> TableSchema {
        TableSchema {
            name: self.name.clone(),
            description: self.description.clone(),
            columns: self.columns.clone(),
        }
    }

    /// Copy of this table with `rows` appended. The original is untouched.
    pub fn with_appended_rows(&self, rows: Vec<Row>) -> Result<Self> {
        let mut table = self.clone();
        table.push_rows(rows)?;
        Ok(table)
    }

    /// Rows where any value contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<&Row> {
        let term = term.to_lowercase();
        self.rows
            .iter()
            .filter(|row| {
                row.values()
                    .any(|v| v.stringify().to_lowercase().contains(&term))
            })
            .collect()
    }

    fn push_rows(&mut self, rows: Vec<Row>) -> Result<()> {
        let mut ids: HashSet<Value> = self
            .rows
            .iter()
            .filter_map(|r| r.get(ROW_ID).cloned())
            .collect();

        for mut row in rows {
            let index = self.rows.len();
            for column in &self.columns {
                let Some(value) = row.get_mut(&column.name) else {
                    return Err(DatasetError::MissingColumnValue {
                        table: self.name.clone(),
                        row: index,
                        column: column.name.clone(),
                    });
                };
                if column.column_type == ColumnType::Date {
                    if let Value::String(s) = value {
                        *value = Value::Date(std::mem::take(s));
                    }
                }
            }

            let id = match row.get(ROW_ID) {
                Some(id) if id.is_identity() => id.clone(),
                _ => {
                    return Err(DatasetError::InvalidRowId {
                        table: self.name.clone(),
                        row: index,
                    });
                }
            };
            if !ids.insert(id.clone()) {
                return Err(DatasetError::DuplicateRowId {
                    table: self.name.clone(),
                    id: id.to_string(),
                });
            }

            self.rows.push(row);
        }
        Ok(())
    }
}

/// Collection of tables keyed by id. Cloning is cheap: tables are shared
/// between snapshots and only replaced wholesale.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    tables: Vec<Arc<Table>>,
    index: HashMap<String, usize>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, tables: Vec<Table>) -> Result<Self> {
        let mut index = HashMap::with_capacity(tables.len());
        let mut names = HashSet::with_capacity(tables.len());

        for (pos, table) in tables.iter().enumerate() {
            if index.insert(table.id.clone(), pos).is_some() {
                return Err(DatasetError::DuplicateTableId(table.id.clone()));
            }
            if !names.insert(table.name.to_lowercase()) {
                return Err(DatasetError::DuplicateTableName(table.name.clone()));
            }
        }

        Ok(Self {
            name: name.into(),
            tables: tables.into_iter().map(Arc::new).collect(),
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter().map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Look up a table by id.
    pub fn table(&self, id: &str) -> Option<&Table> {
        self.shared_table(id).map(AsRef::as_ref)
    }

    pub fn shared_table(&self, id: &str) -> Option<&Arc<Table>> {
        self.index.get(id).map(|&pos| &self.tables[pos])
    }

    /// Look up a table by name, ignoring case.
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables()
            .find(|t| t.name.to_lowercase() == name.to_lowercase())
    }

    /// Return a new snapshot where the table with the same id as `table` is
    /// swapped for it. Every other table is shared with `self`.
    pub fn replace_table(&self, table: Table) -> Result<Self> {
        let Some(&pos) = self.index.get(&table.id) else {
            return Err(DatasetError::UnknownTable(table.id));
        };

        let clash = self.tables.iter().enumerate().any(|(i, t)| {
            i != pos && t.name.to_lowercase() == table.name.to_lowercase()
        });
        if clash {
            return Err(DatasetError::DuplicateTableName(table.name));
        }

        let mut tables = self.tables.clone();
        tables[pos] = Arc::new(table);

        Ok(Self {
            name: self.name.clone(),
            tables,
            index: self.index.clone(),
        })
    }
}
