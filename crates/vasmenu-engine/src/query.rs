//! Read-only search over the current menu.
//!
//! Operates on the flattened product set — the featured shelf plus every
//! category bucket, de-duplicated by composite identity (featured entries
//! are encountered first). Results keep that encounter order; nothing is
//! re-ranked.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::menu::{MenuEntry, MenuStructure};

/// Optional exact-match and range filters applied alongside the text query.
#[derive(Debug, Default, Clone)]
pub struct SearchFilters {
    pub category: Option<String>,
    pub provider_id: Option<String>,
    pub available_only: bool,
    pub max_price: Option<Decimal>,
}

/// Search the menu's flattened product set.
///
/// The text query matches case-insensitively as a substring of the name,
/// description, or any tag; an empty query matches everything.
#[must_use]
pub fn search_menu(menu: &MenuStructure, query: &str, filters: &SearchFilters) -> Vec<MenuEntry> {
    let needle = query.trim().to_lowercase();
    let mut seen: HashSet<String> = HashSet::new();
    let mut results = Vec::new();

    let buckets = std::iter::once(&menu.featured).chain(menu.categories.iter());
    for bucket in buckets {
        for entry in &bucket.products {
            if !seen.insert(entry.product.key()) {
                continue;
            }
            if matches(entry, &needle, filters) {
                results.push(entry.clone());
            }
        }
    }
    results
}

fn matches(entry: &MenuEntry, needle: &str, filters: &SearchFilters) -> bool {
    let product = &entry.product;

    if let Some(category) = &filters.category {
        if product.category != *category {
            return false;
        }
    }
    if let Some(provider_id) = &filters.provider_id {
        if product.provider_id != *provider_id {
            return false;
        }
    }
    if filters.available_only && !entry.available {
        return false;
    }
    if let Some(max_price) = filters.max_price {
        if product.price > max_price {
            return false;
        }
    }

    if needle.is_empty() {
        return true;
    }
    if product.name.to_lowercase().contains(needle) {
        return true;
    }
    if let Some(description) = &product.description {
        if description.to_lowercase().contains(needle) {
            return true;
        }
    }
    product.tags.iter().any(|tag| tag.contains(needle))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use vasmenu_core::Product;

    use crate::menu::{build_menu, MenuConfig};

    use super::*;

    fn make_product(external_id: &str, name: &str, category: &str) -> Product {
        Product {
            provider_id: "kazpay".to_string(),
            external_id: external_id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            price: Decimal::new(10_000, 2),
            currency: "ZAR".to_string(),
            available: true,
            description: Some("voucher for streaming".to_string()),
            tags: vec!["streaming".to_string()],
            provider_name: "KazPay".to_string(),
            updated_at: Utc::now(),
            metadata: serde_json::Map::new(),
        }
    }

    fn build_test_menu(products: Vec<Product>) -> MenuStructure {
        build_menu(&products, &MenuConfig::default(), Utc::now(), 1)
    }

    #[test]
    fn empty_query_returns_full_deduplicated_set() {
        let mut featured = make_product("A", "Netflix Voucher", "Vouchers");
        featured.tags.push("featured".to_string());
        let menu = build_test_menu(vec![
            featured,
            make_product("B", "DStv Payment", "Bill Payments"),
        ]);

        let results = search_menu(&menu, "", &SearchFilters::default());
        assert_eq!(
            results.len(),
            2,
            "featured/category overlap must not duplicate results"
        );
    }

    #[test]
    fn text_match_covers_name_description_and_tags() {
        let menu = build_test_menu(vec![
            make_product("A", "Netflix Voucher", "Vouchers"),
            make_product("B", "Electricity", "Bill Payments"),
        ]);

        assert_eq!(search_menu(&menu, "NETFLIX", &SearchFilters::default()).len(), 1);
        // "streaming" appears in both products' description and tags.
        assert_eq!(search_menu(&menu, "streaming", &SearchFilters::default()).len(), 2);
        assert!(search_menu(&menu, "casino", &SearchFilters::default()).is_empty());
    }

    #[test]
    fn category_and_provider_filters_are_exact() {
        let menu = build_test_menu(vec![
            make_product("A", "Netflix Voucher", "Vouchers"),
            make_product("B", "DStv Payment", "Bill Payments"),
        ]);

        let filters = SearchFilters {
            category: Some("Vouchers".to_string()),
            ..SearchFilters::default()
        };
        let results = search_menu(&menu, "", &filters);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product.external_id, "A");

        let filters = SearchFilters {
            provider_id: Some("vendlink".to_string()),
            ..SearchFilters::default()
        };
        assert!(search_menu(&menu, "", &filters).is_empty());
    }

    #[test]
    fn max_price_is_an_inclusive_ceiling() {
        let mut cheap = make_product("A", "Cheap Voucher", "Vouchers");
        cheap.price = Decimal::new(500, 2);
        let menu = build_test_menu(vec![
            cheap,
            make_product("B", "Pricey Voucher", "Vouchers"),
        ]);

        let filters = SearchFilters {
            max_price: Some(Decimal::new(500, 2)),
            ..SearchFilters::default()
        };
        let results = search_menu(&menu, "", &filters);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product.external_id, "A");
    }

    #[test]
    fn available_only_uses_effective_availability() {
        let mut expired = make_product("A", "Netflix Voucher", "Vouchers");
        expired.metadata.insert(
            vasmenu_core::EXPIRES_AT_KEY.to_string(),
            serde_json::Value::String(
                (Utc::now() - chrono::Duration::hours(1)).to_rfc3339(),
            ),
        );
        let menu = build_test_menu(vec![
            expired,
            make_product("B", "Netflix Gift", "Vouchers"),
        ]);

        let filters = SearchFilters {
            available_only: true,
            ..SearchFilters::default()
        };
        let results = search_menu(&menu, "netflix", &filters);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product.external_id, "B");
    }

    #[test]
    fn results_keep_menu_encounter_order() {
        let mut featured = make_product("F", "Featured Voucher", "Vouchers");
        featured.tags.push("featured".to_string());
        let menu = build_test_menu(vec![
            make_product("A", "Plain Voucher", "Vouchers"),
            featured,
        ]);

        let results = search_menu(&menu, "voucher", &SearchFilters::default());
        let ids: Vec<&str> = results.iter().map(|e| e.product.external_id.as_str()).collect();
        // Featured shelf is flattened first.
        assert_eq!(ids, vec!["F", "A"]);
    }
}
