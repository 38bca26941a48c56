//! Abstraction over where commitment rollups come from.

use async_trait::async_trait;

use super::error::LedgerFetchError;
use super::wire::{LedgerQuery, LedgerResponse};

/// A backend able to answer rollup lookups.
///
/// The HTTP client lives in `metas-gateway`; tests use in-memory fakes.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// Fetches the current ceiling and committed sum for the query's area and year.
    async fn fetch(&self, query: &LedgerQuery) -> Result<LedgerResponse, LedgerFetchError>;
}

#[async_trait]
impl<T: LedgerSource + ?Sized> LedgerSource for std::sync::Arc<T> {
    async fn fetch(&self, query: &LedgerQuery) -> Result<LedgerResponse, LedgerFetchError> {
        (**self).fetch(query).await
    }
}
