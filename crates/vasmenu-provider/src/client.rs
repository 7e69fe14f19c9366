//! Outbound HTTP client for provider catalog endpoints.
//!
//! Wraps `reqwest` with signed headers, a per-provider request timeout, and
//! typed error mapping. The raw payload is returned as `serde_json::Value`;
//! shaping it into canonical products is the adapters' job
//! ([`crate::adapters`]).

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use vasmenu_core::ProviderConnection;

use crate::error::ProviderError;
use crate::signer::signed_headers;

/// Seam between the sync orchestrator and the network. Production code uses
/// [`CatalogClient`]; tests substitute a scripted stub.
#[async_trait]
pub trait CatalogFetch: Send + Sync {
    /// Fetch one provider's full catalog payload.
    async fn fetch_catalog(&self, conn: &ProviderConnection)
        -> Result<serde_json::Value, ProviderError>;
}

/// HTTP implementation of [`CatalogFetch`].
///
/// One shared connection pool serves every provider; the request timeout is
/// applied per call from the provider's configuration.
pub struct CatalogClient {
    client: Client,
}

impl CatalogClient {
    /// Creates a client with the given `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(user_agent: &str) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Joins a provider's base URL and products path with exactly one slash.
    fn catalog_url(conn: &ProviderConnection) -> String {
        format!(
            "{}/{}",
            conn.base_url.trim_end_matches('/'),
            conn.endpoints.products.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl CatalogFetch for CatalogClient {
    async fn fetch_catalog(
        &self,
        conn: &ProviderConnection,
    ) -> Result<serde_json::Value, ProviderError> {
        let url = Self::catalog_url(conn);
        let headers = signed_headers(conn, Utc::now().timestamp_millis())?;

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .timeout(Duration::from_secs(conn.request_timeout_secs))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
            context: format!("catalog response from '{}'", conn.id),
            source: e,
        })
    }
}
