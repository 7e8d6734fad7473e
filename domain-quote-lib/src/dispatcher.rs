//! Bounded-parallel batch dispatch.
//!
//! A batch spawns one task per candidate. Tasks queue on a semaphore as wide
//! as the configured concurrency, so at most that many lookups are in flight.
//! Cancellation is cooperative: a task checks the flag once it gets a slot
//! and bails out before touching the network or the shared state, while
//! lookups already underway run to completion. The batch always waits for
//! every spawned task before returning.

use crate::aggregator::{QuoteSink, ResultAggregator};
use crate::candidates::CandidateSet;
use crate::error::DomainQuoteError;
use crate::protocols::RegistrarApi;
use crate::quote::{QuoteClient, QuoteFailure};
use crate::session::SessionManager;
use crate::types::{BatchReport, CheckConfig, OutputMode};
use futures::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Shared flag used to stop a running batch.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    flag: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the batch to stop dispatching new lookups.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Clear the flag so it can be reused for the next batch.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Everything one task needs, cloned out of the dispatcher.
struct DomainTask {
    domain: String,
    sessions: Arc<SessionManager>,
    client: QuoteClient,
    aggregator: Arc<ResultAggregator>,
    cancel: CancellationFlag,
    slots: Arc<Semaphore>,
}

impl DomainTask {
    async fn run(self) {
        let _permit = match self.slots.acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                self.aggregator.skip();
                return;
            }
        };

        if self.cancel.is_cancelled() {
            self.aggregator.skip();
            return;
        }

        self.aggregator.progress(&self.domain);

        let outcome = match self.sessions.valid_session().await {
            Ok(session) => self.client.quote(&session, &self.domain).await,
            Err(e) => Err(QuoteFailure::Error(e)),
        };

        match outcome {
            Ok(quote) => {
                debug!(
                    domain = %self.domain,
                    order = %quote.order_price(),
                    renew = %quote.renew_price(),
                    "Domain quoted"
                );
                self.aggregator.record(Some(quote));
            }
            Err(QuoteFailure::NotOrderable(reason)) => {
                debug!(domain = %self.domain, reason = %reason, "Domain not orderable");
                self.aggregator.record(None);
            }
            Err(QuoteFailure::Error(e)) => {
                warn!(domain = %self.domain, error = %e, "Domain lookup failed");
                self.aggregator.record(None);
            }
        }
    }
}

/// Runs batches of lookups over a shared session.
pub struct BatchDispatcher {
    sessions: Arc<SessionManager>,
    client: QuoteClient,
    concurrency: usize,
}

impl BatchDispatcher {
    /// Build a dispatcher over `api` using the concurrency, session TTL and
    /// offer strictness from `config`.
    pub fn new(api: Arc<dyn RegistrarApi>, config: &CheckConfig) -> Self {
        let sessions = Arc::new(SessionManager::new(Arc::clone(&api), config.session_ttl));
        let client = QuoteClient::new(api, config.require_new_registration);

        Self {
            sessions,
            client,
            concurrency: config.concurrency.clamp(1, 100),
        }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Check every candidate and return the terminal state of the batch.
    ///
    /// In `Streaming` mode every quote is handed to `sink` as soon as it is
    /// recorded; in `Collected` mode `sink` only receives progress and the
    /// quotes come back in the report, in completion order.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if no session can be obtained before dispatch;
    /// nothing is looked up in that case. Every later failure is per-domain
    /// and only shows up in `BatchReport::failed`.
    pub async fn run(
        &self,
        candidates: &CandidateSet,
        mode: OutputMode,
        cancel: &CancellationFlag,
        sink: Arc<dyn QuoteSink>,
    ) -> Result<BatchReport, DomainQuoteError> {
        let started = Instant::now();

        // A batch without a session is dead on arrival; fail once, upstream
        self.sessions.valid_session().await?;

        let aggregator = Arc::new(ResultAggregator::new(mode, sink));
        let slots = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(candidates.len());

        for domain in candidates {
            if cancel.is_cancelled() {
                debug!(submitted = handles.len(), "Batch cancelled during submission");
                break;
            }

            let task = DomainTask {
                domain: domain.clone(),
                sessions: Arc::clone(&self.sessions),
                client: self.client.clone(),
                aggregator: Arc::clone(&aggregator),
                cancel: cancel.clone(),
                slots: Arc::clone(&slots),
            };
            handles.push(tokio::spawn(task.run()));
        }

        let never_submitted = candidates.len() - handles.len();

        for joined in join_all(handles).await {
            if let Err(e) = joined {
                warn!(error = %e, "Domain task panicked");
                aggregator.record(None);
            }
        }

        let results = aggregator.finish();
        let report = BatchReport {
            quotes: results.quotes,
            failed: results.failed,
            skipped: results.skipped + never_submitted,
            aborted: cancel.is_cancelled(),
            duration: started.elapsed(),
        };

        info!(
            candidates = candidates.len(),
            quoted = report.quotes.len(),
            failed = report.failed,
            skipped = report.skipped,
            aborted = report.aborted,
            duration_ms = report.duration.as_millis() as u64,
            "Batch finished"
        );

        Ok(report)
    }
}

impl std::fmt::Debug for BatchDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchDispatcher")
            .field("sessions", &self.sessions)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_flag_is_shared() {
        let flag = CancellationFlag::new();
        let clone = flag.clone();
        assert!(!clone.is_cancelled());

        flag.cancel();
        assert!(clone.is_cancelled());

        clone.reset();
        assert!(!flag.is_cancelled());
    }
}
