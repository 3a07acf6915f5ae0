//! The retrieval loop: passes, pacing, completion, checkpointing.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, warn};

use stockpile_fetch::{ComponentProvider, store_component};
use stockpile_store::{CompletionSet, QuotaLedger};
use stockpile_universe::Universe;

use crate::config::Config;
use crate::error::CacherError;
use crate::planner::RetrievalPlanner;

/// What happened during one pass over the symbol universe.
///
/// Returned by [`Cacher::run_pass`] so pass completion is an observable
/// event.
#[derive(Debug, Clone, Default)]
pub struct PassSummary {
    /// Component documents fetched and stored.
    pub fetched: u32,
    /// Tickers newly recorded as complete.
    pub completed: usize,
    /// Tickers skipped because the completion record already held them.
    pub skipped: usize,
    /// Tickers left incomplete by a contained fetch failure.
    pub failed: usize,
    /// True if the daily call cap halted the pass early.
    pub capped: bool,
    /// Backup path written by a full-universe checkpoint, if one fired.
    pub checkpoint: Option<PathBuf>,
}

/// Outcome of retrieving a single ticker's missing components.
enum TickerOutcome {
    /// Every required component is now present in the cache.
    Completed,
    /// The daily call cap was reached mid-ticker.
    Capped,
}

/// The quota-governed retrieval loop.
///
/// Strictly sequential: one ticker, one component at a time. The only
/// suspension points are the pacing pause returned by the ledger and the
/// delay between passes; both are plain `tokio::time::sleep` calls, so
/// tests drive them with a paused clock.
#[derive(Debug)]
pub struct Cacher<P> {
    universe: Universe,
    planner: RetrievalPlanner,
    ledger: QuotaLedger,
    completions: CompletionSet,
    provider: P,
    data_dir: PathBuf,
    daily_call_cap: u32,
    pass_interval: std::time::Duration,
}

impl<P: ComponentProvider> Cacher<P> {
    /// Builds a cacher from resolved configuration and a provider.
    ///
    /// Creates the cache directories, loads the quota ledger, opens the
    /// completion record, and resolves the symbol universe (configured
    /// file, or the built-in list).
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created, the universe
    /// cannot be loaded, or durable state is unreadable or corrupt.
    pub fn new(config: &Config, provider: P) -> Result<Self, CacherError> {
        config.ensure_directories()?;

        let universe = match &config.universe_file {
            Some(path) => Universe::from_file(path)?,
            None => Universe::builtin().clone(),
        };

        let ledger = QuotaLedger::load(&config.ledger_file)?.with_pace_wait(config.pace_wait);
        let completions = CompletionSet::open(&config.completion_file, &config.backup_dir)?;

        Ok(Self {
            universe,
            planner: RetrievalPlanner::new(&config.data_dir),
            ledger,
            completions,
            provider,
            data_dir: config.data_dir.clone(),
            daily_call_cap: config.daily_call_cap,
            pass_interval: config.pass_interval,
        })
    }

    /// Returns the symbol universe driving the loop.
    #[must_use]
    pub const fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Returns the quota ledger.
    #[must_use]
    pub const fn ledger(&self) -> &QuotaLedger {
        &self.ledger
    }

    /// Returns the completion record.
    #[must_use]
    pub const fn completions(&self) -> &CompletionSet {
        &self.completions
    }

    /// Runs passes indefinitely, sleeping between them.
    ///
    /// Fetch failures are contained inside each pass; this only returns
    /// on durable-state errors, which are fatal by design.
    ///
    /// # Errors
    ///
    /// Returns an error if durable state cannot be read or written.
    pub async fn run(&mut self) -> Result<(), CacherError> {
        loop {
            let summary = self.run_pass().await?;
            info!(
                fetched = summary.fetched,
                completed = summary.completed,
                skipped = summary.skipped,
                failed = summary.failed,
                capped = summary.capped,
                "pass complete"
            );
            tokio::time::sleep(self.pass_interval).await;
        }
    }

    /// Runs one pass over the symbol universe.
    ///
    /// Applies the pass-boundary day-rollover reset, retrieves missing
    /// components ticker by ticker under the quota cap, records newly
    /// complete tickers, and checkpoints the completion record when it
    /// covers the whole universe.
    ///
    /// # Errors
    ///
    /// Returns an error if durable state cannot be read or written; fetch
    /// failures are contained and reported via [`PassSummary::failed`].
    pub async fn run_pass(&mut self) -> Result<PassSummary, CacherError> {
        // Mirrors the ledger's own rollover check; both are idempotent,
        // and this one also covers passes that issue no fetches at all.
        let now = Utc::now();
        if now.date_naive() > self.ledger.last_reset().date_naive() {
            self.ledger.reset_at(now)?;
            info!("quota ledger reset at pass boundary");
        }

        let mut summary = PassSummary::default();

        for ticker in self.universe.symbols().to_vec() {
            if self.ledger.count() >= self.daily_call_cap {
                warn!(
                    count = self.ledger.count(),
                    cap = self.daily_call_cap,
                    "daily call cap reached; halting pass"
                );
                summary.capped = true;
                break;
            }

            if self.completions.contains(&ticker)? {
                summary.skipped += 1;
                continue;
            }

            match self.retrieve_ticker(&ticker, &mut summary).await {
                Ok(TickerOutcome::Completed) => {
                    self.completions.append(&ticker)?;
                    summary.completed += 1;
                    info!(
                        %ticker,
                        count = self.ledger.count(),
                        "ticker fully retrieved"
                    );
                }
                Ok(TickerOutcome::Capped) => {
                    summary.capped = true;
                    break;
                }
                Err(CacherError::Fetch {
                    ticker,
                    component,
                    source,
                }) => {
                    // Contained: the ticker stays incomplete and the next
                    // pass re-derives the remaining work.
                    warn!(%ticker, %component, error = %source, "component fetch failed");
                    summary.failed += 1;
                }
                Err(other) => return Err(other),
            }
        }

        if self.completions.len()? == self.universe.len() {
            summary.checkpoint = Some(self.completions.checkpoint()?);
        }

        Ok(summary)
    }

    /// Fetches every missing component for one ticker.
    async fn retrieve_ticker(
        &mut self,
        ticker: &str,
        summary: &mut PassSummary,
    ) -> Result<TickerOutcome, CacherError> {
        for kind in self.planner.missing_components(ticker, &self.completions)? {
            if self.ledger.count() >= self.daily_call_cap {
                return Ok(TickerOutcome::Capped);
            }

            let document = self
                .provider
                .fetch_component(ticker, kind)
                .await
                .map_err(|source| CacherError::Fetch {
                    ticker: ticker.to_string(),
                    component: kind,
                    source,
                })?;

            store_component(&self.data_dir, ticker, kind, &document)?;
            summary.fetched += 1;

            if let Some(pause) = self.ledger.record_call(1)? {
                tokio::time::sleep(pause).await;
            }
        }

        Ok(TickerOutcome::Completed)
    }
}
