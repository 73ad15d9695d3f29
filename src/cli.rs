use clap::{Args, Parser, Subcommand, ValueEnum};
use datalens::{Dataset, QueryResult};
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    version,
    name = "datalens",
    about = r#"
An in-memory data explorer with a minimal query engine.

DataLens loads a dataset into memory and answers single-table SELECT queries
with an optional WHERE clause. Without a dataset file it serves a built-in
sample of users, orders and products."#
)]
pub struct Cli {
    #[command(flatten)]
    pub config: ExplorerConfig,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a single query and print the result
    Query(QueryCommand),
    /// List tables and their columns
    Schema,
    /// Find rows of a table containing a term
    Search(SearchCommand),
    /// Read queries from stdin, one per line
    Shell(ShellCommand),
}

/// Settings shared by every command.
#[derive(Debug, Clone, Args)]
pub struct ExplorerConfig {
    /// Path to a JSON dataset file. The built-in sample is used when omitted.
    #[arg(long, short, env = "DATALENS_DATASET", global = true)]
    pub dataset: Option<PathBuf>,
    /// Log level used when RUST_LOG is not set.
    #[arg(long, env = "DATALENS_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Debug, Clone, Args)]
pub struct QueryCommand {
    /// Query text, e.g. "SELECT * FROM users WHERE role = 'admin'"
    pub text: String,
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct SearchCommand {
    /// Table name, matched case-insensitively
    pub table: String,
    pub term: String,
}

#[derive(Debug, Clone, Args)]
pub struct ShellCommand {
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

/// Format `result` for the terminal.
pub fn format_result(result: &QueryResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Table => Ok(render(result)),
    }
}

/// Plain text table of a result's columns and rows, or its error message.
pub fn render(result: &QueryResult) -> String {
    if !result.success {
        let kind = result
            .error_kind
            .map(|k| format!(" ({k:?})"))
            .unwrap_or_default();
        return format!(
            "Error{kind}: {}",
            result.message.as_deref().unwrap_or_default()
        );
    }

    let columns = result.column_names();
    let cells: Vec<Vec<String>> = result
        .rows()
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.get(c).map(ToString::to_string).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    if !columns.is_empty() {
        push_line(&mut out, columns, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let _ = writeln!(out, "{}", rule.join("-+-"));
        for row in &cells {
            push_line(&mut out, row, &widths);
        }
    }

    let count = result.rows().len();
    let _ = write!(
        out,
        "{count} {} in {:.3}ms",
        if count == 1 { "row" } else { "rows" },
        result.execution_time_ms.unwrap_or_default()
    );
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

/// Tables with their row counts and column declarations.
pub fn describe_dataset(dataset: &Dataset) -> String {
    let mut out = format!("Dataset: {}\n", dataset.name());
    for table in dataset.tables() {
        let _ = writeln!(
            out,
            "\n{} [{}] {} rows",
            table.name(),
            table.id(),
            table.rows().len()
        );
        if let Some(description) = table.description() {
            let _ = writeln!(out, "  {description}");
        }
        for column in table.columns() {
            let key = if column.is_primary_key { " PK" } else { "" };
            let _ = writeln!(out, "  - {} {}{key}", column.name, column.column_type);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use datalens::dataset::seed;
    use datalens::execute_query;

    #[test]
    fn test_cli_parses_query_command() {
        let cli = Cli::try_parse_from([
            "datalens",
            "query",
            "SELECT * FROM users",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.config.log_level, "info");
        match cli.command {
            Commands::Query(cmd) => {
                assert_eq!(cmd.text, "SELECT * FROM users");
                assert_eq!(cmd.format, OutputFormat::Json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_global_dataset_after_subcommand() {
        let cli =
            Cli::try_parse_from(["datalens", "schema", "--dataset", "/tmp/data.json"]).unwrap();
        assert_eq!(cli.config.dataset, Some(PathBuf::from("/tmp/data.json")));
    }

    #[test]
    fn test_render_projection() {
        let dataset = seed::dataset().unwrap();
        let result = execute_query("SELECT id, email FROM users WHERE id = 1", &dataset);

        let text = render(&result);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id | email");
        assert_eq!(lines[1], "---+------------------");
        assert_eq!(lines[2], "1  | alice@example.com");
        assert!(lines[3].starts_with("1 row in "));
    }

    #[test]
    fn test_render_failure() {
        let dataset = seed::dataset().unwrap();
        let result = execute_query("SELECT * FROM ghosts", &dataset);
        assert_eq!(
            render(&result),
            "Error (TableNotFound): Table 'ghosts' not found."
        );
    }

    #[test]
    fn test_format_json_uses_camel_case() {
        let dataset = seed::dataset().unwrap();
        let result = execute_query("SELECT name FROM products", &dataset);
        let json = format_result(&result, OutputFormat::Json).unwrap();
        assert!(json.contains("\"executionTimeMs\""));
        assert!(!json.contains("errorKind"));
    }

    #[test]
    fn test_describe_dataset() {
        let dataset = seed::dataset().unwrap();
        let text = describe_dataset(&dataset);
        assert!(text.starts_with("Dataset: Production_Replica\n"));
        assert!(text.contains("users [t1] 8 rows"));
        assert!(text.contains("  - id number PK"));
        assert!(text.contains("  - created_at date\n"));
    }
}
