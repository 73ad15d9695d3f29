pub mod chart;
pub mod identity;

pub use chart::{ChartPoint, chart_points};

use crate::ast::Row;
use crate::dataset::{Dataset, DatasetError, Table, TableSchema};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Upper bound on rows handed to the summarizer.
pub const MAX_SAMPLE_ROWS: usize = 20;

pub const FALLBACK_QUERY: &str = "-- Error generating SQL";
pub const FALLBACK_EXPLANATION: &str = "Failed to contact AI service.";
pub const FALLBACK_SUMMARY: &str = "Analysis unavailable.";
pub const FALLBACK_TREND: &str = "Could not fetch trends.";
pub const FALLBACK_INSIGHT: &str = "Check API key and try again.";

#[derive(Debug)]
pub enum AssistError {
    /// The backing service could not be reached or refused the request
    Unavailable(String),
    /// The service answered with something that does not fit the contract
    InvalidResponse(String),
    /// The service answered with nothing
    EmptyResponse,
}

impl std::fmt::Display for AssistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "Assistant unavailable: {msg}"),
            Self::InvalidResponse(msg) => write!(f, "Invalid assistant response: {msg}"),
            Self::EmptyResponse => write!(f, "Empty assistant response"),
        }
    }
}

impl std::error::Error for AssistError {}

impl From<serde_json::Error> for AssistError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}

/// Candidate query for a natural-language request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(alias = "sql")]
    pub query: String,
    pub explanation: String,
}

impl Translation {
    pub fn fallback() -> Self {
        Self {
            query: FALLBACK_QUERY.to_string(),
            explanation: FALLBACK_EXPLANATION.to_string(),
        }
    }
}

/// Prose analysis of a table sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: String,
    pub trends: Vec<String>,
    #[serde(alias = "keyInsights")]
    pub insights: Vec<String>,
}

impl Analysis {
    pub fn fallback() -> Self {
        Self {
            summary: FALLBACK_SUMMARY.to_string(),
            trends: vec![FALLBACK_TREND.to_string()],
            insights: vec![FALLBACK_INSIGHT.to_string()],
        }
    }
}

/// Schema plus the leading rows of a table, bounded by [`MAX_SAMPLE_ROWS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSample {
    pub schema: TableSchema,
    pub rows: Vec<Row>,
}

impl TableSample {
    pub fn of(table: &Table) -> Self {
        Self {
            schema: table.schema(),
            rows: table.rows().iter().take(MAX_SAMPLE_ROWS).cloned().collect(),
        }
    }
}

#[async_trait]
pub trait QueryTranslator: Send + Sync {
    async fn translate(
        &self,
        prompt: &str,
        schemas: &[TableSchema],
    ) -> Result<Translation, AssistError>;
}

#[async_trait]
pub trait TableSummarizer: Send + Sync {
    async fn summarize(&self, sample: &TableSample) -> Result<Analysis, AssistError>;
}

#[async_trait]
pub trait RowGenerator: Send + Sync {
    async fn generate(&self, schema: &TableSchema, count: usize)
    -> Result<Vec<Row>, AssistError>;
}

/// Call site for the assistant ports. Port failures never escape: each
/// operation degrades to a fixed fallback and logs the cause.
#[derive(Clone)]
pub struct Assistant {
    translator: Arc<dyn QueryTranslator>,
    summarizer: Arc<dyn TableSummarizer>,
    generator: Arc<dyn RowGenerator>,
}

impl Assistant {
    pub fn new(
        translator: Arc<dyn QueryTranslator>,
        summarizer: Arc<dyn TableSummarizer>,
        generator: Arc<dyn RowGenerator>,
    ) -> Self {
        Self {
            translator,
            summarizer,
            generator,
        }
    }

    /// Translate `prompt` into a query over the tables of `dataset`.
    pub async fn translate_query(&self, prompt: &str, dataset: &Dataset) -> Translation {
        let schemas: Vec<TableSchema> = dataset.tables().map(Table::schema).collect();
        match self.translator.translate(prompt, &schemas).await {
            Ok(translation) => translation,
            Err(e) => {
                log::warn!("Query translation failed: {e}");
                Translation::fallback()
            }
        }
    }

    pub async fn analyze_table(&self, table: &Table) -> Analysis {
        let sample = TableSample::of(table);
        match self.summarizer.summarize(&sample).await {
            Ok(analysis) => analysis,
            Err(e) => {
                log::warn!("Analysis of table '{}' failed: {e}", table.name());
                Analysis::fallback()
            }
        }
    }

    /// Ask the generator for `count` rows, give them fresh identities and
    /// append them to the table with id `table_id`. Returns the new snapshot;
    /// a failed generation returns an unchanged copy of `dataset`.
    pub async fn generate_rows(
        &self,
        dataset: &Dataset,
        table_id: &str,
        count: usize,
    ) -> Result<Dataset, DatasetError> {
        let table = dataset
            .table(table_id)
            .ok_or_else(|| DatasetError::UnknownTable(table_id.to_string()))?;

        let rows = match self.generator.generate(&table.schema(), count).await {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!("Row generation for table '{}' failed: {e}", table.name());
                Vec::new()
            }
        };
        if rows.is_empty() {
            return Ok(dataset.clone());
        }

        let rows = identity::assign(table, rows);
        log::info!("Appending {} generated rows to '{}'", rows.len(), table.name());
        dataset.replace_table(table.with_appended_rows(rows)?)
    }
}
