//! Authoritative in-memory product store, partitioned by provider.
//!
//! Each partition holds the most recent *successfully* normalized product
//! list for one provider. Replacement swaps the whole partition in a single
//! map insert under a short-lived write lock, so readers always see a
//! complete partition, never a half-written one. A failed sync never
//! touches its partition ("last known good").

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use vasmenu_core::{Product, ProviderConnection};

#[derive(Debug, Clone)]
struct Partition {
    products: Arc<Vec<Product>>,
    last_sync: DateTime<Utc>,
}

/// Per-provider sync state reported to operators.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub provider_id: String,
    pub name: String,
    pub last_sync: Option<DateTime<Utc>>,
    pub product_count: usize,
    /// `true` once the provider has a successfully synced, non-empty
    /// partition.
    pub active: bool,
}

#[derive(Debug, Default)]
pub struct ProductCache {
    partitions: RwLock<HashMap<String, Partition>>,
}

impl ProductCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replace `provider_id`'s partition with `products`,
    /// recording `now` as the partition's last sync time.
    pub fn replace(&self, provider_id: &str, products: Vec<Product>, now: DateTime<Utc>) {
        let partition = Partition {
            products: Arc::new(products),
            last_sync: now,
        };
        self.partitions
            .write()
            .expect("product cache lock poisoned")
            .insert(provider_id.to_string(), partition);
    }

    /// The current partition for one provider, if it has ever synced.
    #[must_use]
    pub fn get(&self, provider_id: &str) -> Option<Arc<Vec<Product>>> {
        self.partitions
            .read()
            .expect("product cache lock poisoned")
            .get(provider_id)
            .map(|p| Arc::clone(&p.products))
    }

    #[must_use]
    pub fn last_sync(&self, provider_id: &str) -> Option<DateTime<Utc>> {
        self.partitions
            .read()
            .expect("product cache lock poisoned")
            .get(provider_id)
            .map(|p| p.last_sync)
    }

    #[must_use]
    pub fn product_count(&self, provider_id: &str) -> usize {
        self.get(provider_id).map_or(0, |products| products.len())
    }

    /// Concatenation of every partition, in the iteration order of `ids`.
    ///
    /// Callers pass provider ids in registry declaration order so the
    /// snapshot's encounter order, which menu tie-breaking relies on, is
    /// deterministic.
    #[must_use]
    pub fn snapshot<'a>(&self, ids: impl Iterator<Item = &'a str>) -> Vec<Product> {
        let partitions = self.partitions.read().expect("product cache lock poisoned");
        let mut all = Vec::new();
        for id in ids {
            if let Some(partition) = partitions.get(id) {
                all.extend(partition.products.iter().cloned());
            }
        }
        all
    }

    /// Operator-facing status for one configured provider.
    #[must_use]
    pub fn status(&self, conn: &ProviderConnection) -> ProviderStatus {
        let partitions = self.partitions.read().expect("product cache lock poisoned");
        let partition = partitions.get(&conn.id);
        let product_count = partition.map_or(0, |p| p.products.len());
        ProviderStatus {
            provider_id: conn.id.clone(),
            name: conn.name.clone(),
            last_sync: partition.map(|p| p.last_sync),
            product_count,
            active: product_count > 0,
        }
    }
}
