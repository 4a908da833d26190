use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use distrowatch::{commands, services::DistroWatchProvider};
use env_logger::Env;

#[derive(Parser)]
#[command(
    name = "distrowatch",
    version,
    about = "Fetch page hit rankings from distrowatch.com"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the data spans you can choose from
    #[command(visible_aliases = ["list-types", "list-spans"])]
    List {
        /// Print the data spans as JSON
        #[arg(short, long)]
        json: bool,
        /// Also write the JSON output to this path
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Fetch the ranking for the given data span(s)
    #[command(visible_aliases = ["get-ranking", "fetch-ranking"])]
    Ranking {
        /// The data span(s) to fetch, or "all" for every known span
        #[arg(default_value = "all")]
        data_spans: Vec<String>,
        /// Print the rankings as JSON
        #[arg(short, long)]
        json: bool,
        /// Also write the JSON output to this path
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let provider = DistroWatchProvider::new();

    match cli.command {
        Command::List { json, file } => {
            commands::list_data_spans(&provider, json, file.as_deref()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Ranking {
            data_spans,
            json,
            file,
        } => {
            let all_valid =
                commands::query_ranking(&provider, &data_spans, json, file.as_deref()).await?;
            Ok(if all_valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
