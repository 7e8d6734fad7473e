//! OVH order-cart API client.
//!
//! Three endpoints are used:
//! - `POST /order/cart` opens a cart whose id scopes later lookups
//! - `GET /order/cart/{cartId}/domain?domain=...` lists offers for a domain
//! - `GET /domain/data/extension?country=...` lists sellable TLDs

use crate::error::DomainQuoteError;
use crate::protocols::{Offer, RegistrarApi};
use crate::types::CheckConfig;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Description OVH's own web shop uses for anonymous carts.
const CART_DESCRIPTION: &str = "_ovhcom_legacy_order_cart_";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CartRequest<'a> {
    description: &'a str,
    ovh_subsidiary: &'a str,
}

/// HTTP implementation of [`RegistrarApi`] for OVH.
#[derive(Clone)]
pub struct OvhClient {
    /// Shared HTTP client (connection pool)
    http_client: reqwest::Client,
    /// API root without trailing slash
    api_base: String,
    /// Subsidiary used for carts and the TLD catalog
    subsidiary: String,
    /// Per-request timeout, reported back in timeout errors
    timeout: Duration,
}

impl OvhClient {
    /// Create a client with default settings.
    pub fn new() -> Result<Self, DomainQuoteError> {
        Self::with_config(&CheckConfig::default())
    }

    /// Create a client for the endpoint, subsidiary and timeout in `config`.
    pub fn with_config(config: &CheckConfig) -> Result<Self, DomainQuoteError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.concurrency)
            .user_agent(concat!("domain-quote/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DomainQuoteError::network_with_source(
                    "Failed to create registrar HTTP client",
                    e.to_string(),
                )
            })?;

        Ok(Self {
            http_client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            subsidiary: config.subsidiary.clone(),
            timeout: config.timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn map_send_error(&self, operation: &str, err: reqwest::Error) -> DomainQuoteError {
        if err.is_timeout() {
            DomainQuoteError::timeout(operation, self.timeout)
        } else {
            DomainQuoteError::network_with_source(format!("{} failed", operation), err.to_string())
        }
    }

    async fn read_body(
        &self,
        operation: &str,
        response: reqwest::Response,
    ) -> Result<String, DomainQuoteError> {
        let status = response.status();
        if !status.is_success() {
            return Err(DomainQuoteError::network_with_status(
                format!("{} returned {}", operation, status),
                status.as_u16(),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| self.map_send_error(operation, e))
    }
}

#[async_trait]
impl RegistrarApi for OvhClient {
    async fn create_session(&self) -> Result<String, DomainQuoteError> {
        let url = self.url("/order/cart");
        debug!(url = %url, subsidiary = %self.subsidiary, "Requesting cart");

        let response = self
            .http_client
            .post(&url)
            .json(&CartRequest {
                description: CART_DESCRIPTION,
                ovh_subsidiary: &self.subsidiary,
            })
            .send()
            .await
            .map_err(|e| self.map_send_error("cart creation", e))?;

        let body = self.read_body("cart creation", response).await?;
        let cart_id = parse_cart_id(&body)?;

        debug!(cart_id = %cart_id, "Got cart");
        Ok(cart_id)
    }

    async fn offers(&self, token: &str, domain: &str) -> Result<Vec<Offer>, DomainQuoteError> {
        let url = self.url(&format!("/order/cart/{}/domain", token));

        let response = self
            .http_client
            .get(&url)
            .query(&[("domain", domain)])
            .send()
            .await
            .map_err(|e| self.map_send_error("domain lookup", e))?;

        match response.status() {
            // OVH answers 404 when the cart vanished server-side
            StatusCode::NOT_FOUND => Err(DomainQuoteError::network_with_status(
                format!("cart {} not found while looking up {}", token, domain),
                404,
            )),
            _ => {
                let body = self.read_body("domain lookup", response).await?;
                parse_offers(domain, &body)
            }
        }
    }

    async fn tld_catalog(&self) -> Result<Vec<String>, DomainQuoteError> {
        let url = self.url("/domain/data/extension");
        debug!(url = %url, "Fetching TLD catalog");

        let response = self
            .http_client
            .get(&url)
            .query(&[("country", self.subsidiary.as_str())])
            .send()
            .await
            .map_err(|e| self.map_send_error("TLD catalog", e))?;

        let body = self.read_body("TLD catalog", response).await?;
        serde_json::from_str::<Vec<String>>(&body)
            .map_err(|e| DomainQuoteError::malformed("TLD catalog", e.to_string()))
    }
}

/// Extract the `cartId` field from a cart creation response.
pub fn parse_cart_id(body: &str) -> Result<String, DomainQuoteError> {
    let json: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| DomainQuoteError::malformed("cart creation", e.to_string()))?;

    json.get("cartId")
        .and_then(|id| id.as_str())
        .filter(|id| !id.is_empty())
        .map(String::from)
        .ok_or_else(|| DomainQuoteError::malformed("cart creation", "missing 'cartId' field"))
}

/// Decode the offer list returned for `domain`.
pub fn parse_offers(domain: &str, body: &str) -> Result<Vec<Offer>, DomainQuoteError> {
    serde_json::from_str::<Vec<Offer>>(body)
        .map_err(|e| DomainQuoteError::malformed(format!("'{}'", domain), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_client_creation() {
        assert!(OvhClient::new().is_ok());
    }

    #[tokio::test]
    async fn test_timeout_reports_configured_duration() {
        // Accepted by the backlog but never answered.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let config = CheckConfig::default()
            .with_api_base(format!("http://{}", addr))
            .with_timeout(Duration::from_millis(200));
        let client = OvhClient::with_config(&config).unwrap();

        match client.create_session().await {
            Err(DomainQuoteError::Timeout { duration, .. }) => {
                assert_eq!(duration, Duration::from_millis(200));
            }
            other => panic!("expected a timeout, got {:?}", other),
        }
        drop(listener);
    }

    #[test]
    fn test_url_join_strips_trailing_slash() {
        let config = CheckConfig::default().with_api_base("https://api.example.test/v6/");
        let client = OvhClient::with_config(&config).unwrap();
        assert_eq!(
            client.url("/order/cart"),
            "https://api.example.test/v6/order/cart"
        );
    }

    #[test]
    fn test_parse_cart_id() {
        let body = r#"{"cartId":"ab12-cd34","description":"x","expire":"2026-10-19T00:00:00Z"}"#;
        assert_eq!(parse_cart_id(body).unwrap(), "ab12-cd34");
        assert!(parse_cart_id(r#"{"description":"x"}"#).is_err());
        assert!(parse_cart_id("not json").is_err());
    }

    #[test]
    fn test_parse_offers() {
        let body = r#"[
            {
                "orderable": true,
                "action": "create",
                "offer": "gold",
                "prices": [
                    {"label": "PRICE", "price": {"value": 8.99, "currencyCode": "EUR"}},
                    {"label": "TOTAL", "price": {"value": 10.87, "currencyCode": "EUR"}},
                    {"label": "RENEW", "price": {"value": 12.09, "currencyCode": "EUR"}}
                ]
            }
        ]"#;

        let offers = parse_offers("example.es", body).unwrap();
        assert_eq!(offers.len(), 1);
        assert!(offers[0].orderable);
        assert_eq!(offers[0].action, "create");
        assert_eq!(offers[0].prices[1].label, "TOTAL");
        assert_eq!(offers[0].prices[1].price.value, dec!(10.87));
    }

    #[test]
    fn test_parse_offers_malformed() {
        let err = parse_offers("example.es", r#"{"message":"Invalid domain"}"#).unwrap_err();
        assert!(matches!(err, DomainQuoteError::MalformedResponse { .. }));

        let err = parse_offers("example.es", r#"[{"orderable": true}]"#).unwrap_err();
        assert!(matches!(err, DomainQuoteError::MalformedResponse { .. }));
    }
}
