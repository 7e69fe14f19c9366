//! Adapter for the KazPay services API.
//!
//! Envelope: `{"status": "...", "services": [...]}`. Amounts arrive as
//! integer minor units (`amount_cents`); tags as a comma-separated string;
//! expiry as RFC 3339 `valid_until`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use vasmenu_core::{Product, ProviderConnection};

use super::{insert_expiry, parse_rfc3339, resolve_category, tags_from_csv, CatalogAdapter};

pub struct KazpayAdapter;

#[derive(Debug, Deserialize)]
struct KazpayService {
    service_id: String,
    service_name: String,
    #[serde(default)]
    service_type: Option<String>,
    amount_cents: i64,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    description: Option<String>,
    /// Comma-separated, e.g. `"featured,instant"`.
    #[serde(default)]
    tags: Option<String>,
    #[serde(default)]
    valid_until: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

fn default_active() -> bool {
    true
}

impl CatalogAdapter for KazpayAdapter {
    fn normalize(
        &self,
        raw: &serde_json::Value,
        conn: &ProviderConnection,
        now: DateTime<Utc>,
    ) -> Vec<Product> {
        let Some(services) = raw.get("services").and_then(serde_json::Value::as_array) else {
            tracing::warn!(provider = %conn.id, "kazpay payload has no 'services' array");
            return Vec::new();
        };

        services
            .iter()
            .filter_map(|entry| {
                let service: KazpayService = match serde_json::from_value(entry.clone()) {
                    Ok(s) => s,
                    Err(e) => {
                        tracing::debug!(provider = %conn.id, error = %e, "skipping unmappable kazpay entry");
                        return None;
                    }
                };
                map_service(service, conn, now)
            })
            .collect()
    }
}

fn map_service(
    service: KazpayService,
    conn: &ProviderConnection,
    now: DateTime<Utc>,
) -> Option<Product> {
    if service.service_id.trim().is_empty() || service.service_name.trim().is_empty() {
        return None;
    }
    if service.amount_cents < 0 {
        tracing::debug!(
            provider = %conn.id,
            service_id = %service.service_id,
            "skipping kazpay entry with negative amount"
        );
        return None;
    }

    let mut metadata = serde_json::Map::new();
    insert_expiry(&mut metadata, service.valid_until.as_deref());

    Some(Product {
        provider_id: conn.id.clone(),
        external_id: service.service_id,
        name: service.service_name,
        category: resolve_category(service.service_type.as_deref(), conn),
        price: Decimal::new(service.amount_cents, 2),
        currency: service.currency.unwrap_or_else(|| "ZAR".to_string()),
        available: service.active,
        description: service.description.filter(|d| !d.is_empty()),
        tags: service.tags.as_deref().map(tags_from_csv).unwrap_or_default(),
        provider_name: conn.name.clone(),
        updated_at: service
            .updated_at
            .as_deref()
            .and_then(parse_rfc3339)
            .unwrap_or(now),
        metadata,
    })
}
