//! Missing-component planning from cache inspection.

use std::path::PathBuf;

use stockpile_fetch::component_exists;
use stockpile_store::{CompletionSet, StoreError};
use stockpile_types::ComponentKind;

/// Determines which data components are still missing for a ticker.
///
/// The planner only inspects durable state and never mutates it, so it is
/// safe to call repeatedly; two calls without an intervening fetch return
/// identical results.
#[derive(Debug, Clone)]
pub struct RetrievalPlanner {
    data_dir: PathBuf,
}

impl RetrievalPlanner {
    /// Creates a planner over the given artifact directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Returns the components that must still be fetched for a ticker, in
    /// canonical order.
    ///
    /// Tickers already recorded in the completion set return an empty
    /// plan without touching the artifact directory; for the rest, a
    /// component is missing when its cache artifact does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion record cannot be read.
    pub fn missing_components(
        &self,
        ticker: &str,
        completions: &CompletionSet,
    ) -> Result<Vec<ComponentKind>, StoreError> {
        if completions.contains(ticker)? {
            return Ok(Vec::new());
        }

        Ok(ComponentKind::ALL
            .into_iter()
            .filter(|kind| !component_exists(&self.data_dir, ticker, *kind))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockpile_fetch::store_component;
    use tempfile::TempDir;

    fn planner_and_set(dir: &TempDir) -> (RetrievalPlanner, CompletionSet) {
        let data_dir = dir.path().join("data");
        std::fs::create_dir(&data_dir).unwrap();
        let completions =
            CompletionSet::open(dir.path().join("completed.txt"), dir.path().join("backups"))
                .unwrap();
        (RetrievalPlanner::new(data_dir), completions)
    }

    #[test]
    fn test_all_components_missing_for_unseen_ticker() {
        let dir = TempDir::new().unwrap();
        let (planner, completions) = planner_and_set(&dir);

        let missing = planner.missing_components("AAPL", &completions).unwrap();
        assert_eq!(missing, ComponentKind::ALL.to_vec());
    }

    #[test]
    fn test_cached_components_are_not_missing() {
        let dir = TempDir::new().unwrap();
        let (planner, completions) = planner_and_set(&dir);
        let data_dir = dir.path().join("data");

        store_component(&data_dir, "AAPL", ComponentKind::BalanceSheet, b"{}").unwrap();
        store_component(&data_dir, "AAPL", ComponentKind::Earnings, b"{}").unwrap();

        let missing = planner.missing_components("AAPL", &completions).unwrap();
        assert!(!missing.contains(&ComponentKind::BalanceSheet));
        assert!(!missing.contains(&ComponentKind::Earnings));
        assert_eq!(missing.len(), 4);
    }

    #[test]
    fn test_completed_ticker_has_empty_plan() {
        let dir = TempDir::new().unwrap();
        let (planner, completions) = planner_and_set(&dir);

        completions.append("AAPL").unwrap();

        // No artifacts exist, but the completion record wins.
        let missing = planner.missing_components("AAPL", &completions).unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn test_plan_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let (planner, completions) = planner_and_set(&dir);
        let data_dir = dir.path().join("data");

        store_component(&data_dir, "IBM", ComponentKind::CashFlow, b"{}").unwrap();

        let first = planner.missing_components("IBM", &completions).unwrap();
        let second = planner.missing_components("IBM", &completions).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_cleared_completion_defers_to_artifacts() {
        let dir = TempDir::new().unwrap();
        let (planner, completions) = planner_and_set(&dir);
        let data_dir = dir.path().join("data");

        for kind in ComponentKind::ALL {
            store_component(&data_dir, "GE", kind, b"{}").unwrap();
        }
        completions.append("GE").unwrap();
        completions.checkpoint().unwrap();

        // After the checkpoint the completion record is empty, but every
        // artifact still exists, so nothing needs re-fetching.
        assert!(!completions.contains("GE").unwrap());
        let missing = planner.missing_components("GE", &completions).unwrap();
        assert!(missing.is_empty());
    }
}
