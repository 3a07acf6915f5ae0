//! Error types for the retrieval loop.

use thiserror::Error;

use stockpile_fetch::{ArtifactError, FetchError};
use stockpile_store::StoreError;
use stockpile_types::ComponentKind;
use stockpile_universe::UniverseError;

use crate::config::ConfigError;

/// Errors that can occur while running the retrieval loop.
///
/// Only durable-state failures are fatal to a pass. A [`Fetch`] variant
/// is contained at the (ticker, component) granularity: the ticker stays
/// incomplete and is retried implicitly on a later pass.
///
/// [`Fetch`]: CacherError::Fetch
#[derive(Error, Debug)]
pub enum CacherError {
    /// Configuration could not be loaded or applied.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The symbol universe could not be loaded.
    #[error(transparent)]
    Universe(#[from] UniverseError),

    /// Durable quota or completion state failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A fetched document could not be written to the cache.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// A single component fetch from the provider failed.
    #[error("Fetch failed for {ticker} {component}: {source}")]
    Fetch {
        /// The ticker being retrieved.
        ticker: String,
        /// The component that failed.
        component: ComponentKind,
        /// The underlying fetch error.
        source: FetchError,
    },
}
