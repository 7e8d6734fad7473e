//! Registrar protocol implementations.
//!
//! The checking engine only talks to the registrar through [`RegistrarApi`],
//! so the HTTP client in [`ovh`] can be swapped for anything else that knows
//! how to open a cart and list offers.

/// OVH order-cart API over HTTPS
pub mod ovh;

pub use ovh::OvhClient;

use crate::error::DomainQuoteError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Remote operations the engine consumes.
#[async_trait]
pub trait RegistrarApi: Send + Sync {
    /// Open a new session (cart) and return its opaque token.
    async fn create_session(&self) -> Result<String, DomainQuoteError>;

    /// List the offers for `domain` inside the session identified by `token`.
    async fn offers(&self, token: &str, domain: &str) -> Result<Vec<Offer>, DomainQuoteError>;

    /// List every public TLD the registrar sells.
    async fn tld_catalog(&self) -> Result<Vec<String>, DomainQuoteError>;
}

/// One candidate transaction for a domain (new registration, transfer, ...).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Offer {
    pub orderable: bool,

    #[serde(default)]
    pub action: String,

    pub prices: Vec<OfferPrice>,
}

/// A labeled line of an offer's price breakdown ("TOTAL", "RENEW", ...).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OfferPrice {
    pub label: String,
    pub price: PriceValue,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PriceValue {
    pub value: Decimal,
}
