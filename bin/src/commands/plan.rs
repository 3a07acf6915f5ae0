//! Missing-component report command.

use anyhow::{Context, Result};

use stockpile_cacher::{Config, RetrievalPlanner};
use stockpile_store::CompletionSet;
use stockpile_universe::Universe;

/// Execute the plan command.
pub(crate) fn plan(config: &Config, ticker: Option<&str>, show_all: bool) -> Result<()> {
    config
        .ensure_directories()
        .context("Failed to create cache directories")?;

    let universe = match &config.universe_file {
        Some(path) => Universe::from_file(path).context("Failed to load universe file")?,
        None => Universe::builtin().clone(),
    };

    let completions = CompletionSet::open(&config.completion_file, &config.backup_dir)
        .context("Failed to open completion record")?;
    let planner = RetrievalPlanner::new(&config.data_dir);

    let symbols: Vec<&str> = match ticker {
        Some(symbol) => vec![symbol],
        None => universe.symbols().iter().map(String::as_str).collect(),
    };

    let mut pending = 0usize;
    let mut calls_needed = 0usize;

    for symbol in symbols {
        let missing = planner
            .missing_components(symbol, &completions)
            .with_context(|| format!("Failed to plan retrieval for {symbol}"))?;

        if missing.is_empty() {
            if show_all {
                println!("{symbol:<8} complete");
            }
            continue;
        }

        pending += 1;
        calls_needed += missing.len();

        let names: Vec<&str> = missing.iter().map(|kind| kind.as_str()).collect();
        println!("{symbol:<8} missing {}: {}", missing.len(), names.join(", "));
    }

    println!("\n{pending} tickers pending, {calls_needed} provider calls needed");

    Ok(())
}
