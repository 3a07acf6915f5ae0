//! stockpile CLI - Quota-governed equity data cacher.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use stockpile_cacher::Config;

mod commands;

#[derive(Parser)]
#[command(name = "stockpile")]
#[command(about = "Quota-governed equity data cacher", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the retrieval loop
    Run {
        /// Run a single pass and exit instead of looping
        #[arg(long)]
        once: bool,
    },

    /// Show quota and completion status
    Status,

    /// Show which components each ticker still needs
    Plan {
        /// Restrict the report to one ticker
        ticker: Option<String>,

        /// Include fully cached tickers in the report
        #[arg(long)]
        all: bool,
    },

    /// Verify durable quota and completion state
    Verify,

    /// Inspect a cached monthly time series
    Series {
        /// Ticker symbol
        ticker: String,

        /// Show the bar nearest to this date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// Compute the return between two dates (YYYY-MM-DD..YYYY-MM-DD)
        #[arg(short, long)]
        range: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?;

    match command {
        Commands::Run { once } => commands::run::run(&config, once).await,
        Commands::Status => commands::status::status(&config),
        Commands::Plan { ticker, all } => commands::plan::plan(&config, ticker.as_deref(), all),
        Commands::Verify => commands::verify::verify(&config),
        Commands::Series {
            ticker,
            date,
            range,
        } => commands::series::series(&config, &ticker, date.as_deref(), range.as_deref()),
    }
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stockpile={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
