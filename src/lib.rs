pub mod assist;
pub mod ast;
pub mod dataset;
pub mod evaluator;
pub mod parser;

// Re-export commonly used types
pub use assist::{
    Analysis, AssistError, Assistant, QueryTranslator, RowGenerator, TableSample,
    TableSummarizer, Translation,
};
pub use ast::{
    ColumnType, CompareOp, Literal, Operation, ParsedQuery, Predicate, Projection, Row, Value,
};
pub use dataset::{Column, Dataset, DatasetError, Table, TableSchema};
pub use evaluator::{
    ErrorKind, EvalError, EvalResult, EvalStats, Evaluator, QueryResult, evaluate, execute_query,
};
pub use parser::{ParseError, parse_query};
