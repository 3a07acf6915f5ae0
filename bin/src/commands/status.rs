//! Quota and completion status command.

use anyhow::{Context, Result};

use stockpile_cacher::Config;
use stockpile_store::{CompletionSet, QuotaLedger};
use stockpile_universe::Universe;

/// Execute the status command.
pub(crate) fn status(config: &Config) -> Result<()> {
    let ledger = QuotaLedger::load(&config.ledger_file).context("Failed to load quota ledger")?;

    let universe = match &config.universe_file {
        Some(path) => Universe::from_file(path).context("Failed to load universe file")?,
        None => Universe::builtin().clone(),
    };

    let remaining = config.daily_call_cap.saturating_sub(ledger.count());

    println!("Quota");
    println!("  Calls today:  {} / {}", ledger.count(), config.daily_call_cap);
    println!("  Remaining:    {remaining}");
    println!(
        "  Last reset:   {}",
        ledger.last_reset().format("%Y-%m-%d %H:%M:%S UTC")
    );

    // The completion file may not exist yet if the loop has never run.
    let completed = if config.completion_file.exists() {
        let completions = CompletionSet::open(&config.completion_file, &config.backup_dir)
            .context("Failed to open completion record")?;
        completions.len().context("Failed to read completion record")?
    } else {
        0
    };

    println!("\nUniverse");
    println!("  Symbols:      {}", universe.len());
    println!("  Completed:    {completed}");
    println!("  Ledger file:  {}", config.ledger_file.display());
    println!("  Data dir:     {}", config.data_dir.display());

    Ok(())
}
