//! Durable record of fully retrieved tickers.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{Result, StoreError};

/// Append-only, durable record of which tickers have been fully retrieved
/// since the last checkpoint.
///
/// The format is one ticker per line. Membership tests re-read the file on
/// every call so external mutation (manual edits, a restarted process) is
/// tolerated. When the set covers the whole universe it is checkpointed:
/// copied to a timestamped backup, then cleared.
#[derive(Debug, Clone)]
pub struct CompletionSet {
    path: PathBuf,
    backup_dir: PathBuf,
}

impl CompletionSet {
    /// Opens the completion set, creating the live file and backup
    /// directory if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or backup directory cannot be created.
    pub fn open(path: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let backup_dir = backup_dir.into();

        if !backup_dir.exists() {
            fs::create_dir_all(&backup_dir).map_err(|e| StoreError::CreateDir {
                path: backup_dir.clone(),
                source: e,
            })?;
        }

        if !path.exists() {
            fs::write(&path, "").map_err(|e| StoreError::WriteFile {
                path: path.clone(),
                source: e,
            })?;
        }

        Ok(Self { path, backup_dir })
    }

    /// Returns the path of the live completion file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the tickers recorded since the last checkpoint, in append
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the live file cannot be read.
    pub fn tickers(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.path).map_err(|e| StoreError::ReadFile {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    /// Returns true if the given ticker has been recorded as complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the live file cannot be read.
    pub fn contains(&self, ticker: &str) -> Result<bool> {
        Ok(self.tickers()?.iter().any(|t| t == ticker))
    }

    /// Returns the number of tickers recorded since the last checkpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the live file cannot be read.
    pub fn len(&self) -> Result<usize> {
        Ok(self.tickers()?.len())
    }

    /// Returns true if no tickers have been recorded since the last
    /// checkpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the live file cannot be read.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Appends a ticker to the durable record.
    ///
    /// A write failure is fatal to the caller: it likely indicates a
    /// broader storage problem, and further progress could not be durably
    /// recorded anyway.
    ///
    /// # Errors
    ///
    /// Returns an error if the live file cannot be appended to.
    pub fn append(&self, ticker: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::WriteFile {
                path: self.path.clone(),
                source: e,
            })?;

        writeln!(file, "{ticker}").map_err(|e| StoreError::WriteFile {
            path: self.path.clone(),
            source: e,
        })?;

        debug!(ticker, "recorded completed ticker");
        Ok(())
    }

    /// Clears the live record.
    ///
    /// # Errors
    ///
    /// Returns an error if the live file cannot be truncated.
    pub fn clear(&self) -> Result<()> {
        fs::write(&self.path, "").map_err(|e| StoreError::WriteFile {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Archives the live record to a timestamped backup, then clears it.
    ///
    /// The copy and the clear are not atomic as a pair; a crash in between
    /// leaves both the backup and the live file intact, and the next pass
    /// re-derives completion from the cache artifacts regardless.
    ///
    /// # Errors
    ///
    /// Returns an error if the backup copy or the clear fails.
    pub fn checkpoint(&self) -> Result<PathBuf> {
        self.checkpoint_at(Utc::now())
    }

    /// Deterministic variant of [`checkpoint`](Self::checkpoint) taking an
    /// explicit current time for the backup name.
    pub fn checkpoint_at(&self, now: DateTime<Utc>) -> Result<PathBuf> {
        let backup = self.backup_dir.join(format!(
            "completed_backup_{}.txt",
            now.format("%Y%m%d_%H%M%S")
        ));

        fs::copy(&self.path, &backup).map_err(|e| StoreError::Backup {
            path: self.path.clone(),
            backup: backup.clone(),
            source: e,
        })?;

        self.clear()?;
        info!(backup = %backup.display(), "checkpointed completion set");
        Ok(backup)
    }
}
