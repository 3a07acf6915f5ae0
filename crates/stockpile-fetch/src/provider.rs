//! The capability interface the retrieval loop fetches through.

use async_trait::async_trait;
use bytes::Bytes;

use stockpile_types::ComponentKind;

use crate::client::FetchError;

/// A remote source of per-ticker financial documents.
///
/// The retrieval loop depends on nothing else about the provider: one
/// call fetches one component document for one ticker, and any failure is
/// contained at that granularity.
#[async_trait]
pub trait ComponentProvider: Send + Sync {
    /// Fetches the raw document for a (ticker, component) pair.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the document cannot be retrieved; the
    /// caller leaves the ticker incomplete and retries on a later pass.
    async fn fetch_component(&self, ticker: &str, kind: ComponentKind)
    -> Result<Bytes, FetchError>;
}
