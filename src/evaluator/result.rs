use crate::ast::Row;
use crate::evaluator::error::{ErrorKind, EvalError};
use serde::Serialize;

/// Uniform outcome of a query. On success `data` and `columns` are set; on
/// failure only `message` and `error_kind` are.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Row>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl QueryResult {
    pub fn ok(columns: Vec<String>, data: Vec<Row>, execution_time_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            columns: Some(columns),
            message: None,
            execution_time_ms: Some(execution_time_ms.max(0.0)),
            error_kind: None,
        }
    }

    pub fn failure(error: &EvalError) -> Self {
        Self {
            success: false,
            data: None,
            columns: None,
            message: Some(error.to_string()),
            execution_time_ms: None,
            error_kind: Some(error.kind()),
        }
    }

    /// Returned rows, empty on failure.
    pub fn rows(&self) -> &[Row] {
        self.data.as_deref().unwrap_or_default()
    }

    pub fn column_names(&self) -> &[String] {
        self.columns.as_deref().unwrap_or_default()
    }
}

impl From<Result<super::EvalResult, EvalError>> for QueryResult {
    fn from(result: Result<super::EvalResult, EvalError>) -> Self {
        match result {
            Ok(r) => Self::ok(r.columns, r.rows, r.stats.duration_ms),
            Err(e) => Self::failure(&e),
        }
    }
}
