use crate::parser::ParseError;
use serde::Serialize;

/// Evaluation errors that can occur during query execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Query text could not be parsed
    Parse(ParseError),
    /// No table with the requested name, in any casing
    TableNotFound(String),
    /// Predicate references a column the table does not declare
    UnknownColumn { table: String, column: String },
}

/// Coarse error category reported to callers alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    UnsupportedOperation,
    SyntaxError,
    TableNotFound,
    EvaluationFailure,
}

impl EvalError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(e) if e.is_unsupported() => ErrorKind::UnsupportedOperation,
            Self::Parse(_) => ErrorKind::SyntaxError,
            Self::TableNotFound(_) => ErrorKind::TableNotFound,
            Self::UnknownColumn { .. } => ErrorKind::EvaluationFailure,
        }
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::TableNotFound(name) => write!(f, "Table '{name}' not found."),
            Self::UnknownColumn { table, column } => {
                write!(f, "Column '{column}' does not exist in table '{table}'.")
            }
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for EvalError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

/// Statistics collected during query evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvalStats {
    pub rows_processed: usize,
    pub rows_returned: usize,
    pub columns_dropped: usize,
    pub duration_ms: f64,
}

impl EvalStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record rows processed
    pub fn record_rows_processed(&mut self, count: usize) {
        self.rows_processed += count;
    }

    /// Record rows returned
    pub fn record_rows_returned(&mut self, count: usize) {
        self.rows_returned += count;
    }

    /// Record requested columns that the table does not have
    pub fn record_columns_dropped(&mut self, count: usize) {
        self.columns_dropped += count;
    }

    /// Record execution duration
    pub fn record_duration(&mut self, duration: std::time::Duration) {
        self.duration_ms = duration.as_secs_f64() * 1000.0;
    }
}
