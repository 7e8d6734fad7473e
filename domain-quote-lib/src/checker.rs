//! Main domain quoter implementation.
//!
//! This module provides the `DomainQuoter` struct that ties the registrar
//! client, the batch dispatcher and the sorter together.

use crate::aggregator::QuoteSink;
use crate::candidates::CandidateSet;
use crate::catalog::TldCatalog;
use crate::dispatcher::{BatchDispatcher, CancellationFlag};
use crate::error::DomainQuoteError;
use crate::protocols::{OvhClient, RegistrarApi};
use crate::sort::sort_quotes;
use crate::types::{BatchReport, CheckConfig, SortDirection, SortKey};
use std::sync::Arc;

/// Entry point for quoting batches of domains.
///
/// The quoter owns one session for its lifetime, so consecutive batches
/// share a cart until it expires.
///
/// # Example
///
/// ```rust,no_run
/// use domain_quote_lib::{CancellationFlag, CandidateSet, CheckConfig, DomainQuoter};
/// use domain_quote_lib::{NullSink, SortDirection, SortKey};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let quoter = DomainQuoter::with_config(CheckConfig::default())?;
///     let candidates: CandidateSet = ["example.es", "example.com"].into_iter().collect();
///
///     let report = quoter
///         .check(
///             &candidates,
///             SortKey::Price,
///             SortDirection::Ascending,
///             &CancellationFlag::new(),
///             Arc::new(NullSink),
///         )
///         .await?;
///
///     for quote in &report.quotes {
///         println!("{} {} {}", quote.name(), quote.renew_price(), quote.order_price());
///     }
///     Ok(())
/// }
/// ```
pub struct DomainQuoter {
    config: CheckConfig,
    api: Arc<dyn RegistrarApi>,
    dispatcher: BatchDispatcher,
}

impl DomainQuoter {
    /// Create a quoter talking to OVH with the given configuration.
    pub fn with_config(config: CheckConfig) -> Result<Self, DomainQuoteError> {
        let api: Arc<dyn RegistrarApi> = Arc::new(OvhClient::with_config(&config)?);
        Ok(Self::with_api(api, config))
    }

    /// Create a quoter over any registrar implementation.
    pub fn with_api(api: Arc<dyn RegistrarApi>, config: CheckConfig) -> Self {
        let dispatcher = BatchDispatcher::new(Arc::clone(&api), &config);
        Self {
            config,
            api,
            dispatcher,
        }
    }

    /// Quote every candidate and return the report, sorted by `key`.
    ///
    /// `SortKey::None` streams quotes to `sink` as they arrive and leaves
    /// the report in completion order. Any other key buffers the batch,
    /// reporting progress to `sink`, and sorts once it has drained.
    ///
    /// # Errors
    ///
    /// Only fails when no session could be created before the batch
    /// started; per-domain problems are counted in `BatchReport::failed`.
    pub async fn check(
        &self,
        candidates: &CandidateSet,
        key: SortKey,
        direction: SortDirection,
        cancel: &CancellationFlag,
        sink: Arc<dyn QuoteSink>,
    ) -> Result<BatchReport, DomainQuoteError> {
        let mut report = self
            .dispatcher
            .run(candidates, key.output_mode(), cancel, sink)
            .await?;

        sort_quotes(&mut report.quotes, key, direction);
        Ok(report)
    }

    /// Fetch the registrar's TLD catalog.
    pub async fn tld_catalog(&self) -> Result<TldCatalog, DomainQuoteError> {
        TldCatalog::fetch(self.api.as_ref()).await
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }
}

impl std::fmt::Debug for DomainQuoter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainQuoter")
            .field("config", &self.config)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
