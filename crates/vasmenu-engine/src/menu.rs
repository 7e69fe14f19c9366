//! Deterministic menu generation: ranking, category partitioning, and the
//! featured shelf.
//!
//! [`build_menu`] is a pure function of the cached product snapshot, the
//! menu configuration, the injected `now`, and the version supplied by the
//! caller. No randomness anywhere; ties keep the snapshot's encounter
//! order.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use vasmenu_core::{format_price, Product};

/// Priority boost for products tagged `"featured"`.
const FEATURED_BOOST: i64 = 100;
/// Priority boost for products updated within the freshness window.
const FRESHNESS_BOOST: i64 = 20;
const FRESHNESS_WINDOW_DAYS: i64 = 7;

/// Categories emitted first, in this order. Categories outside the sequence
/// follow in discovery order.
const PREFERRED_CATEGORY_ORDER: [&str; 6] = [
    "Bill Payments",
    "Banking Services",
    "Vouchers",
    "Mobile Services",
    "VAS Services",
    "Other",
];

fn category_weight(category: &str) -> i64 {
    match category {
        "Bill Payments" => 80,
        "Vouchers" => 70,
        "Mobile Services" => 60,
        "Banking Services" => 50,
        _ => 10,
    }
}

/// Generation caps, sourced from the application config.
#[derive(Debug, Clone, Copy)]
pub struct MenuConfig {
    pub max_per_category: usize,
    pub max_featured: usize,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            max_per_category: 20,
            max_featured: 10,
        }
    }
}

/// One product as it appears on the menu, with its computed rank,
/// re-derived availability, and display price.
#[derive(Debug, Clone, Serialize)]
pub struct MenuEntry {
    pub product: Product,
    pub priority: i64,
    /// Effective availability: the upstream flag gated by the metadata
    /// expiry. May differ from `product.available`.
    pub available: bool,
    /// Rendered price, e.g. `"R12.99"` or `"Free"`.
    pub display_price: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBucket {
    pub name: String,
    /// Priority-descending, truncated to the configured cap with the
    /// highest-priority entries kept.
    pub products: Vec<MenuEntry>,
    /// Category size before truncation.
    pub total_count: usize,
    /// Available products in the category before truncation.
    pub available_count: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MenuStats {
    pub total_products: usize,
    pub total_categories: usize,
    pub available_products: usize,
}

/// A generated menu. The version strictly increases across generations of
/// one service instance; no history is retained beyond the current
/// snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct MenuStructure {
    pub version: u64,
    pub generated_at: DateTime<Utc>,
    pub categories: Vec<CategoryBucket>,
    /// Capped, priority-ranked shelf of available products. Entries here
    /// also appear in their own category bucket — the overlap is by
    /// design.
    pub featured: CategoryBucket,
    /// Aggregated over category buckets only; the featured shelf is not
    /// double-counted.
    pub stats: MenuStats,
}

impl MenuStructure {
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&CategoryBucket> {
        self.categories.iter().find(|bucket| bucket.name == name)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|bucket| bucket.name.as_str())
    }
}

/// Rank one product at `now`: featured boost, plus its category weight,
/// plus a freshness boost when updated within the last seven days.
fn priority(product: &Product, now: DateTime<Utc>) -> i64 {
    let mut score = category_weight(&product.category);
    if product.is_featured() {
        score += FEATURED_BOOST;
    }
    if now.signed_duration_since(product.updated_at) <= Duration::days(FRESHNESS_WINDOW_DAYS) {
        score += FRESHNESS_BOOST;
    }
    score
}

/// Build a menu from a cache snapshot.
///
/// `products` must be in encounter order (registry order, then partition
/// order) — priority ties preserve it. The caller supplies the `version`;
/// the service increments a per-instance counter so versions strictly
/// increase.
#[must_use]
pub fn build_menu(
    products: &[Product],
    config: &MenuConfig,
    now: DateTime<Utc>,
    version: u64,
) -> MenuStructure {
    let entries: Vec<MenuEntry> = products
        .iter()
        .map(|product| MenuEntry {
            priority: priority(product, now),
            available: product.is_effectively_available(now),
            display_price: format_price(product.price, &product.currency),
            product: product.clone(),
        })
        .collect();

    // Partition by category in discovery order.
    let mut discovered: Vec<String> = Vec::new();
    let mut by_category: std::collections::HashMap<String, Vec<MenuEntry>> =
        std::collections::HashMap::new();
    for entry in &entries {
        let category = entry.product.category.clone();
        if !by_category.contains_key(&category) {
            discovered.push(category.clone());
        }
        by_category.entry(category).or_default().push(entry.clone());
    }

    // Preferred sequence first, then the rest in discovery order.
    let mut ordered_names: Vec<String> = PREFERRED_CATEGORY_ORDER
        .iter()
        .filter(|name| by_category.contains_key(**name))
        .map(ToString::to_string)
        .collect();
    ordered_names.extend(
        discovered
            .into_iter()
            .filter(|name| !PREFERRED_CATEGORY_ORDER.contains(&name.as_str())),
    );

    let categories: Vec<CategoryBucket> = ordered_names
        .into_iter()
        .map(|name| {
            let mut bucket = by_category.remove(&name).unwrap_or_default();
            // Stable sort: ties keep encounter order.
            bucket.sort_by(|a, b| b.priority.cmp(&a.priority));
            let total_count = bucket.len();
            let available_count = bucket.iter().filter(|e| e.available).count();
            bucket.truncate(config.max_per_category);
            CategoryBucket {
                name,
                products: bucket,
                total_count,
                available_count,
            }
        })
        .collect();

    let mut featured: Vec<MenuEntry> = entries.into_iter().filter(|e| e.available).collect();
    featured.sort_by(|a, b| b.priority.cmp(&a.priority));
    featured.truncate(config.max_featured);
    let featured_count = featured.len();
    let featured = CategoryBucket {
        name: "Featured".to_string(),
        products: featured,
        total_count: featured_count,
        available_count: featured_count,
    };

    let stats = MenuStats {
        total_products: categories.iter().map(|b| b.total_count).sum(),
        total_categories: categories.len(),
        available_products: categories.iter().map(|b| b.available_count).sum(),
    };

    MenuStructure {
        version,
        generated_at: now,
        categories,
        featured,
        stats,
    }
}
