//! # Domain Quote Library
//!
//! A concurrent batch checker for domain availability and registration
//! pricing, built on the OVH order-cart API.
//!
//! Every candidate is looked up through one shared cart session that is
//! refreshed when it expires, at most `concurrency` lookups run at once, and
//! results are either streamed as they arrive or collected and sorted.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_quote_lib::{expand_domain_inputs, CancellationFlag, CheckConfig, DomainQuoter};
//! use domain_quote_lib::{NullSink, SortDirection, SortKey};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let quoter = DomainQuoter::with_config(CheckConfig::default())?;
//!     let tlds = vec!["es".to_string(), "com".to_string()];
//!     let candidates = expand_domain_inputs(&["example".to_string()], Some(&tlds))?;
//!
//!     let report = quoter
//!         .check(&candidates, SortKey::Price, SortDirection::Ascending,
//!                &CancellationFlag::new(), Arc::new(NullSink))
//!         .await?;
//!
//!     println!("{} quoted, {} failed", report.quotes.len(), report.failed);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Shared session**: one cart per TTL window, refreshed once under contention
//! - **Bounded parallelism**: semaphore-gated tasks, 10 wide by default
//! - **Streaming or sorted output**: sink callbacks or a sorted report
//! - **Cooperative cancellation**: in-flight lookups finish, queued ones are skipped
//! - **TLD catalog filtering**: expand bare names over the registrar's TLDs

pub use aggregator::{NullSink, QuoteSink, ResultAggregator};
pub use candidates::{
    domain_hacks, expand_domain_inputs, needs_tld_expansion, validate_domain, CandidateSet,
};
pub use catalog::{TldCatalog, TldFilter, TldRule};
pub use checker::DomainQuoter;
pub use config::{
    load_env_config, parse_bool, parse_timeout_string, ConfigManager, DefaultsConfig, EnvConfig,
    FileConfig, FilterConfig, OutputConfig, SortingConfig, MAX_PRECISION,
};
pub use dispatcher::{BatchDispatcher, CancellationFlag};
pub use error::DomainQuoteError;
pub use protocols::{Offer, OfferPrice, OvhClient, PriceValue, RegistrarApi};
pub use quote::{extract_quote, NotOrderableReason, QuoteClient, QuoteFailure};
pub use session::{Session, SessionManager};
pub use sort::sort_quotes;
pub use types::{
    BatchReport, CheckConfig, DomainQuote, OutputMode, Progress, SortDirection, SortKey,
    DEFAULT_API_BASE, DEFAULT_SESSION_TTL, DEFAULT_SUBSIDIARY,
};

/// Registrar protocol implementations and wire types.
pub mod protocols;

mod aggregator;
mod candidates;
mod catalog;
mod checker;
mod config;
mod dispatcher;
mod error;
mod quote;
mod session;
mod sort;
mod types;

pub type Result<T> = std::result::Result<T, DomainQuoteError>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Get library information for debugging or display purposes.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        author: AUTHOR,
        registrar: "ovh",
    }
}

/// Information about the library build.
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub author: &'static str,
    pub registrar: &'static str,
}
