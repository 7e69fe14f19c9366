//! Adapter for the VendLink catalog API.
//!
//! Envelope: `{"data": {"items": [...]}}`, camelCase fields, prices as
//! decimal strings under a nested `price` object.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use vasmenu_core::{Product, ProviderConnection};

use super::{insert_expiry, parse_rfc3339, resolve_category, CatalogAdapter};

pub struct VendlinkAdapter;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VendlinkItem {
    product_code: String,
    display_name: String,
    #[serde(default)]
    category_name: Option<String>,
    price: VendlinkPrice,
    #[serde(default = "default_in_stock")]
    in_stock: bool,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    expires_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VendlinkPrice {
    /// Decimal string, e.g. `"149.00"`.
    amount: String,
    #[serde(default)]
    currency: Option<String>,
}

fn default_in_stock() -> bool {
    true
}

impl CatalogAdapter for VendlinkAdapter {
    fn normalize(
        &self,
        raw: &serde_json::Value,
        conn: &ProviderConnection,
        now: DateTime<Utc>,
    ) -> Vec<Product> {
        let Some(items) = raw
            .get("data")
            .and_then(|d| d.get("items"))
            .and_then(serde_json::Value::as_array)
        else {
            tracing::warn!(provider = %conn.id, "vendlink payload has no 'data.items' array");
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|entry| {
                let item: VendlinkItem = match serde_json::from_value(entry.clone()) {
                    Ok(i) => i,
                    Err(e) => {
                        tracing::debug!(provider = %conn.id, error = %e, "skipping unmappable vendlink entry");
                        return None;
                    }
                };
                map_item(item, conn, now)
            })
            .collect()
    }
}

fn map_item(item: VendlinkItem, conn: &ProviderConnection, now: DateTime<Utc>) -> Option<Product> {
    if item.product_code.trim().is_empty() || item.display_name.trim().is_empty() {
        return None;
    }

    let Ok(price) = item.price.amount.trim().parse::<Decimal>() else {
        tracing::debug!(
            provider = %conn.id,
            product_code = %item.product_code,
            "skipping vendlink entry with unparseable price"
        );
        return None;
    };
    if price.is_sign_negative() {
        return None;
    }

    let mut metadata = serde_json::Map::new();
    insert_expiry(&mut metadata, item.expires_at.as_deref());

    Some(Product {
        provider_id: conn.id.clone(),
        external_id: item.product_code,
        name: item.display_name,
        category: resolve_category(item.category_name.as_deref(), conn),
        price,
        currency: item.price.currency.unwrap_or_else(|| "ZAR".to_string()),
        available: item.in_stock,
        description: item.description.filter(|d| !d.is_empty()),
        tags: item.labels.iter().map(|l| l.trim().to_lowercase()).collect(),
        provider_name: conn.name.clone(),
        updated_at: item
            .updated_at
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
            "data": {
                "items": [
                    {
                        "productCode": "NFLX-BASIC",
                        "displayName": "Netflix Voucher",
                        "categoryName": "Vouchers",
                        "price": {"amount": "149.00", "currency": "ZAR"},
                        "inStock": true,
                        "labels": ["Featured", "streaming"],
                        "description": "One month of streaming",
                        "updatedAt": "2026-08-02T10:30:00Z"
                    },
                    {
                        "productCode": "DSTV-BOX",
                        "displayName": "DStv Subscription",
                        "categoryName": "Bill Payments",
                        "price": {"amount": "zero rand"},
                        "inStock": true
                    },
                    {
                        "productCode": "AIRTIME-10",
                        "displayName": "R10 Airtime",
                        "categoryName": "Mobile Services",
                        "price": {"amount": "10"},
                        "inStock": false,
                        "expiresAt": "2026-01-01T00:00:00Z"
                    }
                ]
            }
        })
    }

    #[test]
    fn maps_items_and_skips_unparseable_prices() {
        let conn = test_conn("vendlink", &["Vouchers", "Bill Payments", "Mobile Services"]);
        let products = VendlinkAdapter.normalize(&fixture(), &conn, Utc::now());
        let ids: Vec<&str> = products.iter().map(|p| p.external_id.as_str()).collect();
        assert_eq!(ids, vec!["NFLX-BASIC", "AIRTIME-10"]);
    }

    #[test]
    fn decimal_string_prices_parse_exactly() {
        let conn = test_conn("vendlink", &["Vouchers"]);
        let products = VendlinkAdapter.normalize(&fixture(), &conn, Utc::now());
        let netflix = products.iter().find(|p| p.external_id == "NFLX-BASIC").unwrap();
        assert_eq!(netflix.price, Decimal::new(14900, 2));
        assert_eq!(netflix.currency, "ZAR");
    }

    #[test]
    fn labels_become_lowercased_tags() {
        let conn = test_conn("vendlink", &["Vouchers"]);
        let products = VendlinkAdapter.normalize(&fixture(), &conn, Utc::now());
        let netflix = products.iter().find(|p| p.external_id == "NFLX-BASIC").unwrap();
        assert_eq!(netflix.tags, vec!["featured", "streaming"]);
    }

    #[test]
    fn out_of_stock_and_expiry_are_carried_through() {
        let conn = test_conn("vendlink", &["Mobile Services"]);
        let products = VendlinkAdapter.normalize(&fixture(), &conn, Utc::now());
        let airtime = products.iter().find(|p| p.external_id == "AIRTIME-10").unwrap();
        assert!(!airtime.available);
        assert!(airtime.expires_at().is_some());
    }

    #[test]
    fn payload_without_items_yields_empty_list() {
        let conn = test_conn("vendlink", &["Vouchers"]);
        let raw = serde_json::json!({"data": {}});
        assert!(VendlinkAdapter.normalize(&raw, &conn, Utc::now()).is_empty());
    }

    #[test]
    fn negative_price_is_skipped() {
        let conn = test_conn("vendlink", &["Vouchers"]);
        let raw = serde_json::json!({
            "data": {"items": [
                {"productCode": "NEG", "displayName": "Refund?", "price": {"amount": "-5.00"}}
            ]}
        });
        assert!(VendlinkAdapter.normalize(&raw, &conn, Utc::now()).is_empty());
    }
}
