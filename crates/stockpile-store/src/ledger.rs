//! Durable API call ledger with daily reset and rate-limit pacing.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{Result, StoreError};

/// Pacing triggers after every this many recorded calls.
pub const DEFAULT_PACE_EVERY: u32 = 5;

/// Default pacing pause, slightly over one minute.
pub const DEFAULT_PACE_WAIT: Duration = Duration::from_secs(61);

/// Durable counter of API calls made and the calendar day they apply to.
///
/// Every mutation is written through to disk before control returns, so an
/// interrupted process loses at most the in-flight call and never silently
/// under- or over-counts against the provider's daily cap.
///
/// The file format is two lines: a non-negative call count, then an RFC
/// 3339 timestamp of the last reset. An absent or empty file is a valid
/// zero state.
#[derive(Debug)]
pub struct QuotaLedger {
    path: PathBuf,
    count: u32,
    last_reset: DateTime<Utc>,
    pace_wait: Duration,
}

impl QuotaLedger {
    /// Loads the ledger from its durable file.
    ///
    /// An absent or empty file yields `count = 0`, `last_reset = now`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CorruptLedger`] if the file exists but cannot
    /// be parsed; the caller may recover by deleting or emptying the file,
    /// but no automatic repair is attempted.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let (count, last_reset) = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => (0, Utc::now()),
            Ok(content) => Self::parse(&path, &content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (0, Utc::now()),
            Err(e) => return Err(StoreError::ReadFile { path, source: e }),
        };

        debug!(count, %last_reset, path = %path.display(), "loaded quota ledger");

        Ok(Self {
            path,
            count,
            last_reset,
            pace_wait: DEFAULT_PACE_WAIT,
        })
    }

    /// Sets the pacing pause returned when the rate-limit threshold trips.
    #[must_use]
    pub const fn with_pace_wait(mut self, pace_wait: Duration) -> Self {
        self.pace_wait = pace_wait;
        self
    }

    fn parse(path: &Path, content: &str) -> Result<(u32, DateTime<Utc>)> {
        let mut lines = content.lines();

        let count_line = lines.next().unwrap_or_default().trim();
        let count = count_line
            .parse::<u32>()
            .map_err(|e| StoreError::CorruptLedger {
                path: path.to_path_buf(),
                detail: format!("invalid call count '{count_line}': {e}"),
            })?;

        let reset_line = lines.next().unwrap_or_default().trim();
        let last_reset = DateTime::parse_from_rfc3339(reset_line)
            .map_err(|e| StoreError::CorruptLedger {
                path: path.to_path_buf(),
                detail: format!("invalid reset timestamp '{reset_line}': {e}"),
            })?
            .with_timezone(&Utc);

        Ok((count, last_reset))
    }

    /// Returns the number of calls recorded since the last reset.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Returns the timestamp of the last reset.
    #[must_use]
    pub const fn last_reset(&self) -> DateTime<Utc> {
        self.last_reset
    }

    /// Returns the path of the durable ledger file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records `n` successful calls against the quota.
    ///
    /// The new count is persisted first, then the day-rollover reset is
    /// applied if the calendar date has advanced past the last reset, and
    /// finally the pacing rule is evaluated. A returned `Some(duration)`
    /// tells the caller to suspend for that long before issuing further
    /// calls; the ledger itself never sleeps.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable file cannot be written. This is
    /// fatal to the caller: continuing without a durable count risks
    /// double-counting on restart.
    pub fn record_call(&mut self, n: u32) -> Result<Option<Duration>> {
        self.record_call_at(n, Utc::now())
    }

    /// Deterministic variant of [`record_call`](Self::record_call) taking
    /// an explicit current time.
    pub fn record_call_at(&mut self, n: u32, now: DateTime<Utc>) -> Result<Option<Duration>> {
        self.count += n;
        self.persist()?;

        if now.date_naive() > self.last_reset.date_naive() {
            self.reset_at(now)?;
            info!("quota ledger reset: crossed a day boundary");
        }

        if self.count > 0 && self.count.is_multiple_of(DEFAULT_PACE_EVERY) {
            info!(count = self.count, "pacing: suspending to respect rate limit");
            return Ok(Some(self.pace_wait));
        }

        Ok(None)
    }

    /// Resets the ledger to zero calls as of now, persisting both fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable file cannot be written.
    pub fn reset(&mut self) -> Result<()> {
        self.reset_at(Utc::now())
    }

    /// Deterministic variant of [`reset`](Self::reset) taking an explicit
    /// current time.
    pub fn reset_at(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.count = 0;
        self.last_reset = now;
        self.persist()
    }

    /// Re-reads the durable file and compares it to the in-memory count.
    ///
    /// An absent or empty file is the valid zero state, matching
    /// [`load`](Self::load). Diagnostic only: returns false on any other
    /// read failure or on a parse failure rather than erroring.
    #[must_use]
    pub fn verify(&self) -> bool {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => self.count == 0,
            Ok(content) => {
                Self::parse(&self.path, &content).is_ok_and(|(count, _)| count == self.count)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => self.count == 0,
            Err(_) => false,
        }
    }

    fn persist(&self) -> Result<()> {
        let content = format!("{}\n{}\n", self.count, self.last_reset.to_rfc3339());
        fs::write(&self.path, content).map_err(|e| StoreError::WriteFile {
            path: self.path.clone(),
            source: e,
        })
    }
}
