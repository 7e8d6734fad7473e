//! Thread-safe accumulation of batch results.
//!
//! Workers finish in any order and all write here. Quotes and the failure
//! count live behind one lock; anything handed to the output sink goes
//! through a second, independent lock so that concurrent completions never
//! interleave partial lines. The state lock is always taken before the
//! output lock.

use crate::types::{DomainQuote, OutputMode, Progress};
use parking_lot::Mutex;
use std::sync::Arc;

/// Receives results (streaming mode) and progress (collected mode).
///
/// Calls are serialized by the aggregator, so implementations can write to
/// a terminal without their own locking.
pub trait QuoteSink: Send + Sync {
    /// A quote was just recorded. Only called in streaming mode.
    fn quote(&self, quote: &DomainQuote);

    /// A task is about to look up `domain`. Only called in collected mode.
    fn progress(&self, _progress: Progress, _domain: &str) {}
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl QuoteSink for NullSink {
    fn quote(&self, _quote: &DomainQuote) {}
}

#[derive(Debug, Default)]
struct BatchState {
    results: Vec<DomainQuote>,
    failed: usize,
    skipped: usize,
}

/// Snapshot of an aggregator taken once the batch has drained.
#[derive(Debug, Default)]
pub struct AggregatedResults {
    pub quotes: Vec<DomainQuote>,
    pub failed: usize,
    pub skipped: usize,
}

/// Accumulator shared by every task of one batch.
pub struct ResultAggregator {
    mode: OutputMode,
    state: Mutex<BatchState>,
    output: Mutex<()>,
    sink: Arc<dyn QuoteSink>,
}

impl ResultAggregator {
    pub fn new(mode: OutputMode, sink: Arc<dyn QuoteSink>) -> Self {
        Self {
            mode,
            state: Mutex::new(BatchState::default()),
            output: Mutex::new(()),
            sink,
        }
    }

    /// Record the outcome of one task: a quote, or `None` for a failure.
    pub fn record(&self, outcome: Option<DomainQuote>) {
        let mut state = self.state.lock();
        match outcome {
            Some(quote) => {
                if self.mode == OutputMode::Streaming {
                    let _out = self.output.lock();
                    self.sink.quote(&quote);
                }
                state.results.push(quote);
            }
            None => state.failed += 1,
        }
    }

    /// Note a task that exited without running because the batch was cancelled.
    pub fn skip(&self) {
        self.state.lock().skipped += 1;
    }

    /// Report that a task is starting on `domain`.
    pub fn progress(&self, domain: &str) {
        if self.mode != OutputMode::Collected {
            return;
        }

        let progress = self.snapshot();
        let _out = self.output.lock();
        self.sink.progress(progress, domain);
    }

    /// Current success/failure totals.
    pub fn snapshot(&self) -> Progress {
        let state = self.state.lock();
        Progress {
            succeeded: state.results.len(),
            failed: state.failed,
        }
    }

    /// Take everything recorded so far, leaving the aggregator empty.
    pub fn finish(&self) -> AggregatedResults {
        let state = std::mem::take(&mut *self.state.lock());
        AggregatedResults {
            quotes: state.results,
            failed: state.failed,
            skipped: state.skipped,
        }
    }
}

impl std::fmt::Debug for ResultAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultAggregator")
            .field("mode", &self.mode)
            .field("state", &*self.state.lock())
            .finish()
    }
}
