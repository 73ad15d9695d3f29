use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Reserved key carrying the identity of a row.
pub const ROW_ID: &str = "id";

/// A Row is a map of column names to scalar values.
pub type Row = BTreeMap<String, Value>;

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Boolean,
    Date,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Date => write!(f, "date"),
        }
    }
}

/// Typed scalar stored in a row cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Decimal),
    String(String),
    /// Calendar date kept in its textual form, e.g. `2023-10-15`.
    Date(String),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    pub fn number(n: impl Into<Decimal>) -> Self {
        Self::Number(n.into())
    }

    pub const fn is_identity(&self) -> bool {
        matches!(self, Self::Number(_) | Self::String(_))
    }

    pub const fn as_number(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Textual form used by string comparisons and substring matching.
    pub fn stringify(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{}", v.normalize()),
            Self::String(v) | Self::Date(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(Decimal::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(Decimal::from(n))
    }
}

impl From<Decimal> for Value {
    fn from(n: Decimal) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => {
                let n = n.normalize();
                match n.to_i64() {
                    Some(i) if n.scale() == 0 => serializer.serialize_i64(i),
                    _ => rust_decimal::serde::float::serialize(&n, serializer),
                }
            }
            Self::String(s) | Self::Date(s) => serializer.serialize_str(s),
        }
    }
}

/// Structured form of a single query statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub operation: Operation,
    pub table: String,
    pub projection: Projection,
    pub predicate: Option<Predicate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Select,
}

/// Requested output columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// `*`: every declared column of the table.
    All,
    Columns(Vec<String>),
}

/// The single optional filter condition of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: String,
    pub op: CompareOp,
    pub literal: Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equals,
    /// Case-insensitive containment; `%` markers are dropped at parse time.
    Like,
}

/// Right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub text: String,
    pub quoted: bool,
}

impl Literal {
    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: true,
        }
    }

    pub fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
        }
    }
}

impl std::fmt::Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "*"),
            Self::Columns(cols) => write!(f, "{}", cols.join(", ")),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.quoted {
            write!(f, "'{}'", self.text)
        } else {
            write!(f, "{}", self.text)
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.op {
            CompareOp::Equals => write!(f, "{} = {}", self.column, self.literal),
            CompareOp::Like => write!(f, "{} LIKE {}", self.column, self.literal),
        }
    }
}

impl std::fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} FROM {}", self.operation, self.projection, self.table)?;
        if let Some(predicate) = &self.predicate {
            write!(f, " WHERE {predicate}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_value_display_number_is_normalized() {
        let value = Value::Number(Decimal::from_str("150.00").unwrap());
        assert_eq!(format!("{value}"), "150");

        let value = Value::Number(Decimal::from_str("49.99").unwrap());
        assert_eq!(format!("{value}"), "49.99");

        let value = Value::from(-3);
        assert_eq!(format!("{value}"), "-3");
    }

    #[test]
    fn test_value_display_scalars() {
        assert_eq!(format!("{}", Value::Bool(true)), "true");
        assert_eq!(format!("{}", Value::Null), "null");
        assert_eq!(format!("{}", Value::string("Alice")), "Alice");
        assert_eq!(format!("{}", Value::Date("2023-10-15".into())), "2023-10-15");
    }

    #[test]
    fn test_value_identity() {
        assert!(Value::from(1).is_identity());
        assert!(Value::string("a").is_identity());
        assert!(!Value::Bool(true).is_identity());
        assert!(!Value::Null.is_identity());
    }

    #[test]
    fn test_value_serialize() {
        let json = serde_json::to_string(&Value::Number(Decimal::from_str("101.0").unwrap()))
            .unwrap();
        assert_eq!(json, "101");

        let json = serde_json::to_string(&Value::Number(Decimal::from_str("12.5").unwrap()))
            .unwrap();
        assert_eq!(json, "12.5");

        assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
        assert_eq!(
            serde_json::to_string(&Value::Date("2023-11-01".into())).unwrap(),
            "\"2023-11-01\""
        );
    }

    #[test]
    fn test_column_type_serde() {
        let ty: ColumnType = serde_json::from_str("\"date\"").unwrap();
        assert_eq!(ty, ColumnType::Date);
        assert_eq!(ColumnType::Boolean.to_string(), "boolean");
    }

    #[test]
    fn test_parsed_query_display() {
        let query = ParsedQuery {
            operation: Operation::Select,
            table: "users".into(),
            projection: Projection::Columns(vec!["id".into(), "email".into()]),
            predicate: Some(Predicate {
                column: "status".into(),
                op: CompareOp::Equals,
                literal: Literal::quoted("active"),
            }),
        };
        assert_eq!(
            query.to_string(),
            "SELECT id, email FROM users WHERE status = 'active'"
        );

        let query = ParsedQuery {
            operation: Operation::Select,
            table: "orders".into(),
            projection: Projection::All,
            predicate: Some(Predicate {
                column: "amount".into(),
                op: CompareOp::Like,
                literal: Literal::bare("12"),
            }),
        };
        assert_eq!(query.to_string(), "SELECT * FROM orders WHERE amount LIKE 12");
    }
}
