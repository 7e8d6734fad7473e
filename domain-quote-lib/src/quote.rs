//! Per-domain price lookup.
//!
//! One lookup is one round trip. The registrar returns a list of offers of
//! which only the first one is meaningful; a domain is quoted only when that
//! offer is orderable, is a new registration (unless configured otherwise)
//! and carries both a `TOTAL` and a `RENEW` price.

use crate::error::DomainQuoteError;
use crate::protocols::{Offer, RegistrarApi};
use crate::session::Session;
use crate::types::DomainQuote;
use std::fmt;
use std::sync::Arc;

/// Price label of the first registration period (taxes included).
pub const TOTAL_LABEL: &str = "TOTAL";

/// Price label of every renewal.
pub const RENEW_LABEL: &str = "RENEW";

/// Offer action for a brand-new registration.
pub const CREATE_ACTION: &str = "create";

/// Why a successful lookup still did not produce a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotOrderableReason {
    /// The registrar returned no offers at all
    NoOffer,
    /// The offer exists but cannot be ordered (taken, reserved, ...)
    Unavailable,
    /// The offer is a transfer/renewal rather than a new registration
    NotNewRegistration,
    /// `TOTAL` or `RENEW` price missing (premium domains, mostly)
    IncompletePricing,
}

impl fmt::Display for NotOrderableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOffer => write!(f, "no offer"),
            Self::Unavailable => write!(f, "not orderable"),
            Self::NotNewRegistration => write!(f, "not a new registration"),
            Self::IncompletePricing => write!(f, "incomplete pricing"),
        }
    }
}

/// Outcome of a lookup that did not yield a quote.
#[derive(Debug, Clone)]
pub enum QuoteFailure {
    /// Legitimate business outcome, not an error
    NotOrderable(NotOrderableReason),
    /// Transport failure or unexpected response shape
    Error(DomainQuoteError),
}

impl QuoteFailure {
    pub fn is_error(&self) -> bool {
        matches!(self, QuoteFailure::Error(_))
    }
}

impl From<DomainQuoteError> for QuoteFailure {
    fn from(err: DomainQuoteError) -> Self {
        QuoteFailure::Error(err)
    }
}

impl fmt::Display for QuoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteFailure::NotOrderable(reason) => write!(f, "{}", reason),
            QuoteFailure::Error(err) => write!(f, "{}", err),
        }
    }
}

/// Stateless lookup client over a [`RegistrarApi`].
#[derive(Clone)]
pub struct QuoteClient {
    api: Arc<dyn RegistrarApi>,
    require_new_registration: bool,
}

impl QuoteClient {
    pub fn new(api: Arc<dyn RegistrarApi>, require_new_registration: bool) -> Self {
        Self {
            api,
            require_new_registration,
        }
    }

    /// Look up `fqdn` within `session` and turn the first offer into a quote.
    pub async fn quote(&self, session: &Session, fqdn: &str) -> Result<DomainQuote, QuoteFailure> {
        let offers = self.api.offers(session.token(), fqdn).await?;
        extract_quote(fqdn, &offers, self.require_new_registration)
    }
}

impl fmt::Debug for QuoteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteClient")
            .field("require_new_registration", &self.require_new_registration)
            .finish()
    }
}

/// Build a quote from the registrar's offer list.
pub fn extract_quote(
    fqdn: &str,
    offers: &[Offer],
    require_new_registration: bool,
) -> Result<DomainQuote, QuoteFailure> {
    let offer = offers
        .first()
        .ok_or(QuoteFailure::NotOrderable(NotOrderableReason::NoOffer))?;

    if !offer.orderable {
        return Err(QuoteFailure::NotOrderable(NotOrderableReason::Unavailable));
    }

    if require_new_registration && offer.action != CREATE_ACTION {
        return Err(QuoteFailure::NotOrderable(
            NotOrderableReason::NotNewRegistration,
        ));
    }

    let mut order_price = None;
    let mut renew_price = None;
    for line in &offer.prices {
        match line.label.as_str() {
            TOTAL_LABEL => order_price = Some(line.price.value),
            RENEW_LABEL => renew_price = Some(line.price.value),
            _ => {}
        }
    }

    match (order_price, renew_price) {
        (Some(order), Some(renew)) => Ok(DomainQuote::new(fqdn, order, renew)),
        _ => Err(QuoteFailure::NotOrderable(
            NotOrderableReason::IncompletePricing,
        )),
    }
}
