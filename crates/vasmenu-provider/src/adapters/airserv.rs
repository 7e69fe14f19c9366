//! Adapter for the AirServ catalogue API.
//!
//! Envelope: `{"catalogue": [...]}`. Ids may arrive as numbers or strings,
//! costs as JSON floats, feature tags as a string array.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use vasmenu_core::{Product, ProviderConnection};

use super::{insert_expiry, parse_rfc3339, resolve_category, CatalogAdapter};

pub struct AirservAdapter;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AirservEntry {
    /// Number or string; normalized to a string id.
    id: serde_json::Value,
    title: String,
    #[serde(default)]
    group: Option<String>,
    cost: f64,
    #[serde(default)]
    currency_code: Option<String>,
    #[serde(default = "default_enabled")]
    enabled: bool,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    info: Option<String>,
    #[serde(default)]
    expiry: Option<String>,
    #[serde(default)]
    modified: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl CatalogAdapter for AirservAdapter {
    fn normalize(
        &self,
        raw: &serde_json::Value,
        conn: &ProviderConnection,
        now: DateTime<Utc>,
    ) -> Vec<Product> {
        let Some(entries) = raw.get("catalogue").and_then(serde_json::Value::as_array) else {
            tracing::warn!(provider = %conn.id, "airserv payload has no 'catalogue' array");
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(|entry| {
                let entry: AirservEntry = match serde_json::from_value(entry.clone()) {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::debug!(provider = %conn.id, error = %e, "skipping unmappable airserv entry");
                        return None;
                    }
                };
                map_entry(entry, conn, now)
            })
            .collect()
    }
}

fn external_id(raw: &serde_json::Value) -> Option<String> {
    match raw {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn map_entry(entry: AirservEntry, conn: &ProviderConnection, now: DateTime<Utc>) -> Option<Product> {
    let id = external_id(&entry.id)?;
    if entry.title.trim().is_empty() {
        return None;
    }

    let price = Decimal::from_f64(entry.cost)?;
    if price.is_sign_negative() {
        tracing::debug!(provider = %conn.id, id = %id, "skipping airserv entry with negative cost");
        return None;
    }

    let mut metadata = serde_json::Map::new();
    insert_expiry(&mut metadata, entry.expiry.as_deref());

    Some(Product {
        provider_id: conn.id.clone(),
        external_id: id,
        name: entry.title,
        category: resolve_category(entry.group.as_deref(), conn),
        price: price.round_dp(2),
        currency: entry.currency_code.unwrap_or_else(|| "ZAR".to_string()),
        available: entry.enabled,
        description: entry.info.filter(|i| !i.is_empty()),
        tags: entry.features.iter().map(|f| f.trim().to_lowercase()).collect(),
        provider_name: conn.name.clone(),
        updated_at: entry
            .modified
            .as_deref()
            .and_then(parse_rfc3339)
            .unwrap_or(now),
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_conn;
    use super::*;

    fn fixture() -> serde_json::Value {
        serde_json::json!({
            "catalogue": [
                {
                    "id": 1001,
                    "title": "1GB Data Bundle",
                    "group": "Mobile Services",
                    "cost": 85.0,
                    "currencyCode": "ZAR",
                    "enabled": true,
                    "features": ["Featured", "data"],
                    "info": "Valid for 30 days",
                    "modified": "2026-08-03T12:00:00Z"
                },
                {
                    "id": "SIM-SWAP",
                    "title": "SIM Swap",
                    "group": "Mobile Services",
                    "cost": 0.0,
                    "enabled": true
                },
                {
                    "id": null,
                    "title": "Orphan entry",
                    "cost": 10.0
                },
                {
                    "id": 1002,
                    "title": "Broken entry"
                }
            ]
        })
    }

    #[test]
    fn maps_numeric_and_string_ids_and_skips_invalid_entries() {
        let conn = test_conn("airserv", &["Mobile Services"]);
        let products = AirservAdapter.normalize(&fixture(), &conn, Utc::now());
        let ids: Vec<&str> = products.iter().map(|p| p.external_id.as_str()).collect();
        assert_eq!(ids, vec!["1001", "SIM-SWAP"]);
    }

    #[test]
    fn float_costs_become_two_decimal_prices() {
        let conn = test_conn("airserv", &["Mobile Services"]);
        let products = AirservAdapter.normalize(&fixture(), &conn, Utc::now());
        let bundle = products.iter().find(|p| p.external_id == "1001").unwrap();
        assert_eq!(bundle.price, Decimal::new(8500, 2));
    }

    #[test]
    fn zero_cost_entries_are_kept() {
        let conn = test_conn("airserv", &["Mobile Services"]);
        let products = AirservAdapter.normalize(&fixture(), &conn, Utc::now());
        let swap = products.iter().find(|p| p.external_id == "SIM-SWAP").unwrap();
        assert!(swap.price.is_zero());
    }

    #[test]
    fn features_become_tags() {
        let conn = test_conn("airserv", &["Mobile Services"]);
        let products = AirservAdapter.normalize(&fixture(), &conn, Utc::now());
        let bundle = products.iter().find(|p| p.external_id == "1001").unwrap();
        assert_eq!(bundle.tags, vec!["featured", "data"]);
        assert!(bundle.is_featured());
    }

    #[test]
    fn payload_without_catalogue_yields_empty_list() {
        let conn = test_conn("airserv", &["Mobile Services"]);
        let raw = serde_json::json!({"items": []});
        assert!(AirservAdapter.normalize(&raw, &conn, Utc::now()).is_empty());
    }
}
