use async_trait::async_trait;
use datalens::assist::{
    Analysis, AssistError, QueryTranslator, RowGenerator, TableSample, TableSummarizer,
    Translation,
};
use datalens::dataset::{Dataset, TableSchema, seed};
use datalens::{QueryResult, Row, Value};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// The built-in sample dataset
#[allow(dead_code)]
pub fn seed_dataset() -> Dataset {
    seed::dataset().expect("seed dataset is valid")
}

/// Helper function to generate unique names with timestamp
#[allow(dead_code)]
pub fn generate_unique_name(prefix: &str) -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let random_suffix = fastrand::u32(1000..9999);
    format!("{prefix}_{timestamp}{random_suffix}")
}

/// Flip the case of every letter at random
#[allow(dead_code)]
pub fn random_casing(text: &str) -> String {
    text.chars()
        .map(|c| {
            if fastrand::bool() {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

/// Identities of the returned rows, in order
#[allow(dead_code)]
pub fn result_ids(result: &QueryResult) -> Vec<String> {
    assert!(result.success, "query failed: {:?}", result.message);
    result.rows().iter().map(|r| r["id"].to_string()).collect()
}

#[allow(dead_code)]
pub fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

/// Port that answers with a fixed translation and records the schemas it saw
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingTranslator {
    pub seen: Mutex<Vec<String>>,
}

#[async_trait]
impl QueryTranslator for RecordingTranslator {
    async fn translate(
        &self,
        prompt: &str,
        schemas: &[TableSchema],
    ) -> Result<Translation, AssistError> {
        let mut seen = self.seen.lock().unwrap();
        seen.extend(schemas.iter().map(TableSchema::describe));
        Ok(Translation {
            query: "SELECT * FROM users WHERE role = 'admin'".to_string(),
            explanation: format!("Answer to: {prompt}"),
        })
    }
}

/// Port that echoes the sample size back as its summary
#[allow(dead_code)]
pub struct CountingSummarizer;

#[async_trait]
impl TableSummarizer for CountingSummarizer {
    async fn summarize(&self, sample: &TableSample) -> Result<Analysis, AssistError> {
        Ok(Analysis {
            summary: format!("{} rows of {}", sample.rows.len(), sample.schema.name),
            trends: vec![],
            insights: vec![],
        })
    }
}

/// Port producing `count` rows that fill only the first non-id column
#[allow(dead_code)]
pub struct PartialRowGenerator;

#[async_trait]
impl RowGenerator for PartialRowGenerator {
    async fn generate(
        &self,
        schema: &TableSchema,
        count: usize,
    ) -> Result<Vec<Row>, AssistError> {
        let column = schema
            .columns
            .iter()
            .find(|c| c.name != "id")
            .ok_or(AssistError::EmptyResponse)?;
        Ok((0..count)
            .map(|i| row(&[(column.name.as_str(), Value::from(format!("generated {i}")))]))
            .collect())
    }
}

/// Port that is never reachable
#[allow(dead_code)]
pub struct OfflinePort;

#[async_trait]
impl QueryTranslator for OfflinePort {
    async fn translate(&self, _: &str, _: &[TableSchema]) -> Result<Translation, AssistError> {
        Err(AssistError::Unavailable("connection refused".to_string()))
    }
}

#[async_trait]
impl TableSummarizer for OfflinePort {
    async fn summarize(&self, _: &TableSample) -> Result<Analysis, AssistError> {
        Err(AssistError::Unavailable("connection refused".to_string()))
    }
}

#[async_trait]
impl RowGenerator for OfflinePort {
    async fn generate(&self, _: &TableSchema, _: usize) -> Result<Vec<Row>, AssistError> {
        Err(AssistError::InvalidResponse("not json".to_string()))
    }
}
