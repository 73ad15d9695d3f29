#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![warn(clippy::nursery)]
#![allow(clippy::multiple_crate_versions)]
mod cli;
mod shell;

use crate::cli::{Cli, Commands, OutputFormat, describe_dataset, format_result};
use clap::Parser;
use datalens::dataset::{Dataset, loader, seed};
use datalens::{QueryResult, execute_query};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.config.log_level.as_str()),
    )
    .init();

    let dataset = match &cli.config.dataset {
        Some(path) => loader::load(path)?,
        None => seed::dataset()?,
    };

    match cli.command {
        Commands::Query(cmd) => {
            let result = execute_query(&cmd.text, &dataset);
            println!("{}", format_result(&result, cmd.format)?);
        }
        Commands::Schema => print!("{}", describe_dataset(&dataset)),
        Commands::Search(cmd) => search(&dataset, &cmd.table, &cmd.term)?,
        Commands::Shell(cmd) => shell::run_shell(&dataset, cmd.format).await?,
    }

    Ok(())
}

fn search(dataset: &Dataset, table: &str, term: &str) -> anyhow::Result<()> {
    let Some(table) = dataset.find_table(table) else {
        anyhow::bail!("Table '{table}' not found.");
    };

    let rows = table.search(term).into_iter().cloned().collect();
    let result = QueryResult::ok(table.column_names(), rows, 0.0);
    println!("{}", format_result(&result, OutputFormat::Table)?);
    Ok(())
}
