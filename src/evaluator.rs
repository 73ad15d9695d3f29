pub mod error;
pub mod predicate;
pub mod result;
pub mod utils;


pub use error::{ErrorKind, EvalError, EvalStats};
pub use result::QueryResult;

use crate::ast::{ParsedQuery, Projection, ROW_ID, Row};
use crate::dataset::{Dataset, Table};
use crate::evaluator::predicate::BoundPredicate;
use crate::parser::parse_query;
use std::time::Instant;

/// Columns and rows produced by a successful evaluation
#[derive(Debug, Clone)]
pub struct EvalResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub stats: EvalStats,
}

/// Runs parsed queries against a read-only dataset snapshot.
pub struct Evaluator<'a> {
    dataset: &'a Dataset,
}

impl<'a> Evaluator<'a> {
    pub const fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    pub fn eval(&self, query: &ParsedQuery) -> Result<EvalResult, EvalError> {
        let start = Instant::now();
        let mut stats = EvalStats::new();

        let table = self
            .dataset
            .find_table(&query.table)
            .ok_or_else(|| EvalError::TableNotFound(query.table.clone()))?;

        let rows = self.filter_rows(table, query, &mut stats)?;
        let (columns, rows) = project_rows(table, &query.projection, rows, &mut stats);

        stats.record_rows_returned(rows.len());
        stats.record_duration(start.elapsed());

        log::debug!(
            "Executed `{query}`: {} of {} rows in {:.3}ms",
            stats.rows_returned,
            stats.rows_processed,
            stats.duration_ms
        );

        Ok(EvalResult {
            columns,
            rows,
            stats,
        })
    }

    #[allow(clippy::unused_self)]
    fn filter_rows<'t>(
        &self,
        table: &'t Table,
        query: &ParsedQuery,
        stats: &mut EvalStats,
    ) -> Result<Vec<&'t Row>, EvalError> {
        stats.record_rows_processed(table.rows().len());

        let Some(predicate) = &query.predicate else {
            return Ok(table.rows().iter().collect());
        };

        let predicate = BoundPredicate::bind(predicate, table)?;
        Ok(table
            .rows()
            .iter()
            .filter(|row| predicate.matches(row))
            .collect())
    }
}

fn project_rows(
    table: &Table,
    projection: &Projection,
    rows: Vec<&Row>,
    stats: &mut EvalStats,
) -> (Vec<String>, Vec<Row>) {
    let requested = match projection {
        Projection::All => {
            return (
                table.column_names(),
                rows.into_iter().cloned().collect(),
            );
        }
        Projection::Columns(requested) => requested,
    };

    let mut columns: Vec<String> = Vec::with_capacity(requested.len());
    for name in requested {
        if !table.has_column(name) {
            log::debug!("Dropping unknown column '{name}' of table '{}'", table.name());
            stats.record_columns_dropped(1);
        } else if !columns.contains(name) {
            columns.push(name.clone());
        }
    }

    let rows = rows
        .into_iter()
        .map(|row| {
            let mut projected = Row::new();
            if let Some(id) = row.get(ROW_ID) {
                projected.insert(ROW_ID.to_string(), id.clone());
            }
            for column in &columns {
                if let Some(value) = row.get(column) {
                    projected.insert(column.clone(), value.clone());
                }
            }
            projected
        })
        .collect();

    (columns, rows)
}

/// Evaluate a parsed query. Errors are folded into a failed [`QueryResult`].
pub fn evaluate(query: &ParsedQuery, dataset: &Dataset) -> QueryResult {
    let result = Evaluator::new(dataset).eval(query);
    if let Err(e) = &result {
        log::debug!("Query `{query}` failed: {e}");
    }
    result.into()
}

/// Parse and run `text` against `dataset`. Never fails: every error becomes a
/// failed [`QueryResult`] carrying the diagnostic.
pub fn execute_query(text: &str, dataset: &Dataset) -> QueryResult {
    match parse_query(text) {
        Ok(query) => evaluate(&query, dataset),
        Err(e) => {
            log::debug!("Rejected query {text:?}: {e}");
            QueryResult::failure(&EvalError::from(e))
        }
    }
}
