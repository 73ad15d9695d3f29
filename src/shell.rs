use crate::cli::{OutputFormat, describe_dataset, format_result};
use datalens::{Dataset, execute_query};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

const PROMPT: &[u8] = b"datalens> ";

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Print(String),
    Skip,
    Quit,
}

/// Interpret one shell line: a dot-command or a query.
pub fn handle_line(line: &str, dataset: &Dataset, format: OutputFormat) -> anyhow::Result<Action> {
    let line = line.trim();
    let action = match line {
        "" => Action::Skip,
        ".quit" | ".exit" => Action::Quit,
        ".tables" => Action::Print(
            dataset
                .tables()
                .map(|t| t.name().to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        ".schema" => Action::Print(describe_dataset(dataset).trim_end().to_string()),
        _ => Action::Print(format_result(&execute_query(line, dataset), format)?),
    };
    Ok(action)
}

pub async fn run_shell(dataset: &Dataset, format: OutputFormat) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    log::info!("Shell started on dataset '{}'", dataset.name());

    prompt(&mut stdout).await?;
    while let Some(line) = lines.next_line().await? {
        match handle_line(&line, dataset, format)? {
            Action::Quit => break,
            Action::Skip => {}
            Action::Print(text) => {
                stdout.write_all(text.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
        }
        prompt(&mut stdout).await?;
    }

    stdout.flush().await?;
    Ok(())
}

async fn prompt<W: AsyncWrite + Unpin>(out: &mut W) -> anyhow::Result<()> {
    out.write_all(PROMPT).await?;
    out.flush().await?;
    Ok(())
}
