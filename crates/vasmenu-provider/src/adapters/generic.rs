//! Best-effort adapter for providers without a registered variant.
//!
//! Accepts an already-list-shaped payload — a bare JSON array, or an array
//! under a `products` or `items` key — and passes canonical-looking fields
//! through, defaulting the rest: category falls back when undeclared,
//! price to zero, availability to true unless explicitly false.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use vasmenu_core::{Product, ProviderConnection};

use super::{decimal_from_value, insert_expiry, parse_rfc3339, resolve_category, CatalogAdapter};

pub struct GenericAdapter;

impl CatalogAdapter for GenericAdapter {
    fn normalize(
        &self,
        raw: &serde_json::Value,
        conn: &ProviderConnection,
        now: DateTime<Utc>,
    ) -> Vec<Product> {
        let Some(entries) = list_shaped(raw) else {
            tracing::warn!(provider = %conn.id, "generic adapter found no product list in payload");
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(|entry| map_entry(entry, conn, now))
            .collect()
    }
}

/// Locate the entry array: the payload itself, or `products`/`items`.
fn list_shaped(raw: &serde_json::Value) -> Option<&Vec<serde_json::Value>> {
    if let Some(array) = raw.as_array() {
        return Some(array);
    }
    for key in ["products", "items"] {
        if let Some(array) = raw.get(key).and_then(serde_json::Value::as_array) {
            return Some(array);
        }
    }
    None
}

fn string_field(entry: &serde_json::Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| entry.get(*key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn map_entry(
    entry: &serde_json::Value,
    conn: &ProviderConnection,
    now: DateTime<Utc>,
) -> Option<Product> {
    let external_id = string_field(entry, &["id", "product_id", "code"])?;
    let name = string_field(entry, &["name", "title"])?;

    let price = entry
        .get("price")
        .and_then(decimal_from_value)
        .unwrap_or(Decimal::ZERO);
    if price.is_sign_negative() {
        tracing::debug!(provider = %conn.id, id = %external_id, "skipping entry with negative price");
        return None;
    }

    // Available unless the payload says false outright.
    let available = entry
        .get("available")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(true);

    let tags = entry
        .get("tags")
        .and_then(serde_json::Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(serde_json::Value::as_str)
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let mut metadata = serde_json::Map::new();
    insert_expiry(
        &mut metadata,
        entry.get("expires_at").and_then(serde_json::Value::as_str),
    );

    Some(Product {
        provider_id: conn.id.clone(),
        external_id,
        name,
        category: resolve_category(
            entry.get("category").and_then(serde_json::Value::as_str),
            conn,
        ),
        price,
        currency: string_field(entry, &["currency"]).unwrap_or_else(|| "ZAR".to_string()),
        available,
        description: string_field(entry, &["description"]),
        tags,
        provider_name: conn.name.clone(),
        updated_at: entry
            .get("updated_at")
            .and_then(serde_json::Value::as_str)
            .and_then(parse_rfc3339)
            .unwrap_or(now),
        metadata,
    })
}
