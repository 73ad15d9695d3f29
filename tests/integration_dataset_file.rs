mod common;

use common::*;
use datalens::dataset::{DatasetError, loader};
use datalens::{ErrorKind, Value, execute_query};
use std::io::Write;

fn write_dataset(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_query_dataset_loaded_from_file() {
    let table = generate_unique_name("sensors");
    let file = write_dataset(&format!(
        r#"{{
            "name": "lab",
            "tables": [{{
                "id": "s1",
                "name": "{table}",
                "columns": [
                    {{"name": "id", "type": "string", "isPrimaryKey": true}},
                    {{"name": "online", "type": "boolean"}},
                    {{"name": "reading", "type": "number"}},
                    {{"name": "installed", "type": "date"}}
                ],
                "rows": [
                    {{"id": "a-1", "online": true, "reading": 20.5, "installed": "2024-01-02"}},
                    {{"id": "a-2", "online": false, "reading": null, "installed": "2024-03-04"}},
                    {{"id": "b-1", "online": true, "reading": 18, "installed": "2024-03-09"}}
                ]
            }}]
        }}"#
    ));

    let dataset = loader::load(file.path()).unwrap();
    assert_eq!(dataset.name(), "lab");

    let upper = table.to_uppercase();
    let online = execute_query(&format!("SELECT reading FROM {upper} WHERE online = 1"), &dataset);
    assert_eq!(result_ids(&online), vec!["a-1", "b-1"]);

    let missing = execute_query(
        &format!("SELECT * FROM {table} WHERE reading = null"),
        &dataset,
    );
    assert_eq!(result_ids(&missing), vec!["a-2"]);
    assert_eq!(missing.rows()[0]["reading"], Value::Null);

    let march = execute_query(
        &format!("SELECT id FROM {table} WHERE installed LIKE '2024-03'"),
        &dataset,
    );
    assert_eq!(result_ids(&march), vec!["a-2", "b-1"]);

    let ghost = execute_query("SELECT * FROM users", &dataset);
    assert_eq!(ghost.error_kind, Some(ErrorKind::TableNotFound));
}

#[test]
fn test_invalid_dataset_file_is_rejected() {
    let file = write_dataset(
        r#"{
            "name": "broken",
            "tables": [{
                "id": "x",
                "name": "things",
                "columns": [{"name": "id", "type": "number"}, {"name": "label", "type": "string"}],
                "rows": [{"id": 1}]
            }]
        }"#,
    );

    let err = loader::load(file.path()).unwrap_err();
    assert!(matches!(err, DatasetError::MissingColumnValue { ref column, .. } if column == "label"));
}
