use crate::ast::{CompareOp, Predicate, ROW_ID, Row, Value};
use crate::dataset::Table;
use crate::evaluator::error::EvalError;
use crate::evaluator::utils::{contains_ignore_case, loosely_equals};

/// A predicate checked against a table's schema, ready to test rows.
#[derive(Debug)]
pub struct BoundPredicate<'a> {
    column: &'a str,
    op: CompareOp,
    needle: &'a str,
}

impl<'a> BoundPredicate<'a> {
    /// Resolve `predicate` against `table`. The column must be declared on
    /// the table or be the row identity.
    pub fn bind(predicate: &'a Predicate, table: &Table) -> Result<Self, EvalError> {
        if predicate.column != ROW_ID && !table.has_column(&predicate.column) {
            return Err(EvalError::UnknownColumn {
                table: table.name().to_string(),
                column: predicate.column.clone(),
            });
        }

        Ok(Self {
            column: &predicate.column,
            op: predicate.op,
            needle: &predicate.literal.text,
        })
    }

    pub fn matches(&self, row: &Row) -> bool {
        let value = row.get(self.column).unwrap_or(&Value::Null);
        match self.op {
            CompareOp::Equals => loosely_equals(value, self.needle),
            CompareOp::Like => contains_ignore_case(value, self.needle),
        }
    }
}
