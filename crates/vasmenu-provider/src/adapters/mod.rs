//! Response adapters: one per provider payload variant.
//!
//! Each adapter maps its vendor's raw catalog payload into canonical
//! [`Product`] records. Adapters never fail: an entry that cannot be mapped
//! is skipped with a log line, and a payload whose collection field is
//! missing or mis-shaped yields an empty list. One bad provider degrades to
//! fewer products, not a crashed sync.

mod airserv;
mod generic;
mod kazpay;
mod vendlink;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use vasmenu_core::{Product, ProviderConnection, FALLBACK_CATEGORY};

pub use airserv::AirservAdapter;
pub use generic::GenericAdapter;
pub use kazpay::KazpayAdapter;
pub use vendlink::VendlinkAdapter;

/// Contract every provider variant implements: raw payload in, canonical
/// products out. Pure: `now` is injected so the mapping is deterministic
/// under test.
pub trait CatalogAdapter: Send + Sync {
    fn normalize(
        &self,
        raw: &serde_json::Value,
        conn: &ProviderConnection,
        now: DateTime<Utc>,
    ) -> Vec<Product>;
}

/// Provider-id → adapter lookup with a generic best-effort fallback for
/// unregistered providers.
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn CatalogAdapter>>,
    generic: Arc<dyn CatalogAdapter>,
}

impl AdapterRegistry {
    /// Registry pre-populated with every built-in vendor adapter.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self {
            adapters: HashMap::new(),
            generic: Arc::new(GenericAdapter),
        };
        registry.register("kazpay", Arc::new(KazpayAdapter));
        registry.register("vendlink", Arc::new(VendlinkAdapter));
        registry.register("airserv", Arc::new(AirservAdapter));
        registry
    }

    pub fn register(&mut self, provider_id: &str, adapter: Arc<dyn CatalogAdapter>) {
        self.adapters.insert(provider_id.to_string(), adapter);
    }

    /// Adapter for `provider_id`, or the generic fallback.
    #[must_use]
    pub fn adapter_for(&self, provider_id: &str) -> Arc<dyn CatalogAdapter> {
        self.adapters
            .get(provider_id)
            .map_or_else(|| Arc::clone(&self.generic), Arc::clone)
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

/// Resolve a vendor category against the provider's declared vocabulary,
/// falling back to [`FALLBACK_CATEGORY`].
fn resolve_category(raw: Option<&str>, conn: &ProviderConnection) -> String {
    match raw {
        Some(category) if conn.declares_category(category) => category.to_string(),
        _ => FALLBACK_CATEGORY.to_string(),
    }
}

/// Parse an RFC 3339 timestamp, returning `None` on any failure.
fn parse_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Split a comma-separated tag string into trimmed, lowercased tags.
fn tags_from_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Best-effort decimal from a JSON number or numeric string.
fn decimal_from_value(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        serde_json::Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

/// Store an entry's expiry under the canonical metadata key, when present
/// and parseable.
fn insert_expiry(
    metadata: &mut serde_json::Map<String, serde_json::Value>,
    raw_expiry: Option<&str>,
) {
    if let Some(expiry) = raw_expiry.and_then(parse_rfc3339) {
        metadata.insert(
            vasmenu_core::EXPIRES_AT_KEY.to_string(),
            serde_json::Value::String(expiry.to_rfc3339()),
        );
    }
}

#[cfg(test)]
pub(crate) fn test_conn(id: &str, categories: &[&str]) -> ProviderConnection {
    ProviderConnection {
        id: id.to_string(),
        name: format!("{id} provider"),
        base_url: "https://api.example.com".to_string(),
        api_key: "k".to_string(),
        api_secret: "s".to_string(),
        endpoints: vasmenu_core::ProviderEndpoints {
            products: "/products".to_string(),
            pricing: None,
            availability: None,
        },
        categories: categories.iter().map(ToString::to_string).collect(),
        sync_interval_secs: 300,
        request_timeout_secs: 10,
        max_retries: 3,
        retry_delay_ms: 0,
    }
}
