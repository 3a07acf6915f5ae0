//! Durable state verification command.

use anyhow::{Context, Result, bail};

use stockpile_cacher::Config;
use stockpile_store::{CompletionSet, QuotaLedger};

/// Execute the verify command.
pub(crate) fn verify(config: &Config) -> Result<()> {
    let mut healthy = true;

    match QuotaLedger::load(&config.ledger_file) {
        Ok(ledger) => {
            if ledger.verify() {
                println!(
                    "ledger      ok ({} calls, reset {})",
                    ledger.count(),
                    ledger.last_reset().format("%Y-%m-%d")
                );
            } else {
                println!("ledger      FAILED write-back check");
                healthy = false;
            }
        }
        Err(e) => {
            println!("ledger      UNREADABLE: {e}");
            healthy = false;
        }
    }

    if config.completion_file.exists() {
        let completions = CompletionSet::open(&config.completion_file, &config.backup_dir)
            .context("Failed to open completion record")?;
        match completions.len() {
            Ok(count) => println!("completions ok ({count} tickers)"),
            Err(e) => {
                println!("completions UNREADABLE: {e}");
                healthy = false;
            }
        }
    } else {
        println!("completions not yet created");
    }

    if config.data_dir.exists() {
        println!("data dir    ok ({})", config.data_dir.display());
    } else {
        println!("data dir    missing ({})", config.data_dir.display());
    }

    if !healthy {
        bail!("Durable state verification failed");
    }

    Ok(())
}
