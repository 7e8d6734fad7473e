//! Core data types for domain quoting.
//!
//! This module defines the quote produced for every orderable domain, the
//! per-batch report handed back to callers, sort configuration, and the
//! tunables for a checking run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::DomainQuoteError;

/// Default registrar API root.
pub const DEFAULT_API_BASE: &str = "https://www.ovh.es/engine/apiv6";

/// Default OVH subsidiary used for carts and the TLD catalog.
pub const DEFAULT_SUBSIDIARY: &str = "ES";

/// How long a cart stays usable before we ask for a new one.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(5 * 60);

/// Price quote for a domain that can be registered right now.
///
/// Both prices are always present; a registrar answer missing either one
/// never becomes a `DomainQuote`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainQuote {
    name: String,
    order_price: Decimal,
    renew_price: Decimal,
}

impl DomainQuote {
    pub fn new<N: Into<String>>(name: N, order_price: Decimal, renew_price: Decimal) -> Self {
        Self {
            name: name.into(),
            order_price,
            renew_price,
        }
    }

    /// Fully qualified domain name (e.g. "example.com")
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price of the first registration period
    pub fn order_price(&self) -> Decimal {
        self.order_price
    }

    /// Price of each renewal
    pub fn renew_price(&self) -> Decimal {
        self.renew_price
    }

    /// The larger of the two prices; what you end up paying in the worst year.
    pub fn max_price(&self) -> Decimal {
        self.order_price.max(self.renew_price)
    }

    /// Whether both prices are within the given ceilings (`None` = no limit).
    pub fn within(&self, max_order: Option<Decimal>, max_renew: Option<Decimal>) -> bool {
        max_order.map_or(true, |max| self.order_price <= max)
            && max_renew.map_or(true, |max| self.renew_price <= max)
    }
}

/// Key used to order buffered results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Keep completion order and stream results as they arrive
    None,
    /// Lexicographic by domain name
    #[default]
    Alphabetic,
    /// By `max(order, renew)`
    Price,
    /// By renewal price
    Renew,
    /// By first-period price
    Order,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::None,
        SortKey::Alphabetic,
        SortKey::Price,
        SortKey::Renew,
        SortKey::Order,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::None => "none",
            SortKey::Alphabetic => "alphabetic",
            SortKey::Price => "price",
            SortKey::Renew => "renew",
            SortKey::Order => "order",
        }
    }

    /// Output mode implied by this key: only `None` can stream.
    pub fn output_mode(&self) -> OutputMode {
        match self {
            SortKey::None => OutputMode::Streaming,
            _ => OutputMode::Collected,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = DomainQuoteError;

    /// Accepts any unambiguous, case-insensitive prefix ("p" → price).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        if wanted.is_empty() {
            return Err(DomainQuoteError::config("Sort key cannot be empty"));
        }

        let matches: Vec<SortKey> = SortKey::ALL
            .iter()
            .copied()
            .filter(|key| key.as_str().starts_with(&wanted))
            .collect();

        match matches.as_slice() {
            [key] => Ok(*key),
            [] => Err(DomainQuoteError::config(format!(
                "Unknown sort key '{}', expected one of: none, alphabetic, price, renew, order",
                s
            ))),
            _ => Err(DomainQuoteError::config(format!(
                "Sort key '{}' is ambiguous",
                s
            ))),
        }
    }
}

/// Direction applied after sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, SortDirection::Ascending)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

/// Output mode for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Hand every quote to the sink as soon as it is recorded
    Streaming,

    /// Emit nothing until the whole batch has drained
    Collected,
}

/// Running totals for a batch, as seen when a task starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub succeeded: usize,
    pub failed: usize,
}

/// Terminal state of one batch check.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Quotes in insertion (completion) order, or sorted once `sort` ran
    pub quotes: Vec<DomainQuote>,

    /// Domains whose task ran but produced no quote
    pub failed: usize,

    /// Domains never looked at because the batch was cancelled
    pub skipped: usize,

    /// Whether cancellation was requested during the batch
    pub aborted: bool,

    /// Wall-clock time of the batch
    pub duration: Duration,
}

impl BatchReport {
    /// Number of domains whose task actually ran.
    pub fn processed(&self) -> usize {
        self.quotes.len() + self.failed
    }
}

/// Configuration options for checking runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Maximum number of lookups in flight at once
    /// Default: 10, Range: 1-100
    pub concurrency: usize,

    /// Timeout for each HTTP request
    /// Default: 10 seconds
    #[serde(skip)]
    pub timeout: Duration,

    /// Lifetime of a cart before it is replaced
    /// Default: 5 minutes
    #[serde(skip)]
    pub session_ttl: Duration,

    /// OVH subsidiary ("ES", "FR", ...)
    pub subsidiary: String,

    /// Registrar API root, without trailing slash
    pub api_base: String,

    /// Only accept offers whose action is "create" (a brand-new registration)
    /// Default: true
    pub require_new_registration: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            timeout: Duration::from_secs(10),
            session_ttl: DEFAULT_SESSION_TTL,
            subsidiary: DEFAULT_SUBSIDIARY.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            require_new_registration: true,
        }
    }
}

impl CheckConfig {
    /// Set the worker pool width, clamped to 1-100.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn with_subsidiary<S: Into<String>>(mut self, subsidiary: S) -> Self {
        self.subsidiary = subsidiary.into().to_uppercase();
        self
    }

    pub fn with_api_base<S: Into<String>>(mut self, api_base: S) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Also accept transfer/renewal offers, not just new registrations.
    pub fn with_new_registration_only(mut self, enabled: bool) -> Self {
        self.require_new_registration = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sort_key_prefixes() {
        assert_eq!("p".parse::<SortKey>().unwrap(), SortKey::Price);
        assert_eq!("RENEW".parse::<SortKey>().unwrap(), SortKey::Renew);
        assert_eq!("alpha".parse::<SortKey>().unwrap(), SortKey::Alphabetic);
        assert_eq!("n".parse::<SortKey>().unwrap(), SortKey::None);
        assert!("x".parse::<SortKey>().is_err());
        assert!("".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_only_none_streams() {
        assert_eq!(SortKey::None.output_mode(), OutputMode::Streaming);
        for key in [SortKey::Alphabetic, SortKey::Price, SortKey::Renew, SortKey::Order] {
            assert_eq!(key.output_mode(), OutputMode::Collected);
        }
    }

    #[test]
    fn test_max_price() {
        let quote = DomainQuote::new("a.com", dec!(10), dec!(5));
        assert_eq!(quote.max_price(), dec!(10));
        let quote = DomainQuote::new("b.com", dec!(3), dec!(8.49));
        assert_eq!(quote.max_price(), dec!(8.49));
    }

    #[test]
    fn test_within_ceilings() {
        let quote = DomainQuote::new("a.com", dec!(10), dec!(5));
        assert!(quote.within(None, None));
        assert!(quote.within(Some(dec!(10)), Some(dec!(5))));
        assert!(!quote.within(Some(dec!(9.99)), None));
        assert!(!quote.within(None, Some(dec!(4))));
    }

    #[test]
    fn test_config_builders() {
        let config = CheckConfig::default()
            .with_concurrency(0)
            .with_subsidiary("fr")
            .with_api_base("https://example.test/api/");
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.subsidiary, "FR");
        assert_eq!(config.api_base, "https://example.test/api");
        assert_eq!(config.session_ttl, Duration::from_secs(300));
        assert!(config.require_new_registration);
    }
}
