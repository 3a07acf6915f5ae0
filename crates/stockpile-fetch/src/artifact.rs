//! Cache artifact layout: one JSON document per (ticker, component) pair.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use stockpile_types::ComponentKind;

/// Errors that can occur while writing a cache artifact.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Failed to write the artifact file.
    #[error("Failed to write artifact '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Returns the artifact path for a (ticker, component) pair under the
/// given data directory.
#[must_use]
pub fn component_path(data_dir: &Path, ticker: &str, kind: ComponentKind) -> PathBuf {
    kind.artifact_path(data_dir, ticker)
}

/// Returns true if the artifact for a (ticker, component) pair exists.
///
/// Existence of the artifact is the authoritative "already fetched"
/// signal; the completion record is bookkeeping on top of it.
#[must_use]
pub fn component_exists(data_dir: &Path, ticker: &str, kind: ComponentKind) -> bool {
    component_path(data_dir, ticker, kind).exists()
}

/// Writes a fetched document to its artifact path, returning the path.
///
/// # Errors
///
/// Returns an error if the file cannot be written. The caller treats this
/// as fatal: an artifact that is not durably stored must not be counted
/// against the quota as completed work.
pub fn store_component(
    data_dir: &Path,
    ticker: &str,
    kind: ComponentKind,
    document: &[u8],
) -> Result<PathBuf, ArtifactError> {
    let path = component_path(data_dir, ticker, kind);
    fs::write(&path, document).map_err(|e| ArtifactError::WriteFile {
        path: path.clone(),
        source: e,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_component_path_layout() {
        let path = component_path(Path::new("/cache/data"), "aapl", ComponentKind::Earnings);
        assert_eq!(path, PathBuf::from("/cache/data/AAPL.earnings.json"));
    }

    #[test]
    fn test_store_then_exists() {
        let dir = TempDir::new().unwrap();

        assert!(!component_exists(dir.path(), "IBM", ComponentKind::CashFlow));

        let path = store_component(dir.path(), "IBM", ComponentKind::CashFlow, b"{}").unwrap();
        assert!(path.exists());
        assert!(component_exists(dir.path(), "IBM", ComponentKind::CashFlow));
        assert!(!component_exists(dir.path(), "IBM", ComponentKind::Earnings));
    }

    #[test]
    fn test_store_to_missing_dir_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        assert!(matches!(
            store_component(&missing, "IBM", ComponentKind::CashFlow, b"{}"),
            Err(ArtifactError::WriteFile { .. })
        ));
    }
}
