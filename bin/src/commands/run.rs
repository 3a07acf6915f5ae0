//! Retrieval loop command.

use anyhow::{Context, Result};

use stockpile_cacher::{Cacher, Config};
use stockpile_fetch::AlphaVantageClient;

/// Execute the run command.
pub(crate) async fn run(config: &Config, once: bool) -> Result<()> {
    let provider = AlphaVantageClient::with_defaults(config.api_key.clone())
        .context("Failed to build HTTP client")?;

    let mut cacher = Cacher::new(config, provider).context("Failed to initialize cacher")?;

    if once {
        let summary = cacher.run_pass().await.context("Pass failed")?;

        println!(
            "Pass complete: {} fetched, {} completed, {} skipped, {} failed",
            summary.fetched, summary.completed, summary.skipped, summary.failed
        );
        if summary.capped {
            println!("Daily call cap reached; pass halted early.");
        }
        if let Some(backup) = summary.checkpoint {
            println!("Universe complete; checkpoint written to {}", backup.display());
        }
        return Ok(());
    }

    cacher.run().await.context("Retrieval loop failed")
}
