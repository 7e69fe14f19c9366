//! The catalog service: one constructed object owning the provider
//! registry, the product cache, and the current menu snapshot.
//!
//! Sync never tears down state on failure: a provider whose fetch fails
//! after all retries keeps its last-known-good partition, and a menu is
//! regenerated only from successfully cached data. Instances are
//! independent, so tests construct as many as they like.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde::Serialize;
use vasmenu_core::{Product, ProviderConnection, ProviderRegistry};
use vasmenu_provider::{retry_fixed, AdapterRegistry, CatalogFetch};

use crate::cache::{ProductCache, ProviderStatus};
use crate::error::EngineError;
use crate::menu::{build_menu, CategoryBucket, MenuConfig, MenuEntry, MenuStats, MenuStructure};
use crate::query::{search_menu, SearchFilters};

/// Outcome of one sync run for one provider.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub provider_id: String,
    /// `false` when every attempt failed and the previous partition was
    /// kept.
    pub synced: bool,
    /// Products now cached for the provider (the fresh count on success,
    /// the last-known-good count on failure).
    pub product_count: usize,
}

/// Cache-level totals for operators.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub total_products: usize,
    pub provider_count: usize,
    pub providers: Vec<ProviderStatus>,
}

pub struct CatalogService {
    registry: ProviderRegistry,
    fetcher: Arc<dyn CatalogFetch>,
    adapters: AdapterRegistry,
    cache: ProductCache,
    menu_config: MenuConfig,
    current_menu: RwLock<Option<Arc<MenuStructure>>>,
    menu_version: AtomicU64,
}

impl CatalogService {
    #[must_use]
    pub fn new(
        registry: ProviderRegistry,
        fetcher: Arc<dyn CatalogFetch>,
        adapters: AdapterRegistry,
        menu_config: MenuConfig,
    ) -> Self {
        Self {
            registry,
            fetcher,
            adapters,
            cache: ProductCache::new(),
            menu_config,
            current_menu: RwLock::new(None),
            menu_version: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn providers(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Sync one provider now, out of band or from the scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownProvider`] if `provider_id` is not in
    /// the registry. Fetch failures are not errors; they are logged and
    /// reported through [`SyncReport::synced`].
    pub async fn sync_provider(&self, provider_id: &str) -> Result<SyncReport, EngineError> {
        let conn = self
            .registry
            .get(provider_id)
            .ok_or_else(|| EngineError::UnknownProvider(provider_id.to_string()))?;
        Ok(self.run_sync(conn).await)
    }

    /// Sync every provider once, in registry order. Individual failures
    /// never abort the pass.
    pub async fn sync_all(&self) -> Vec<SyncReport> {
        let mut reports = Vec::with_capacity(self.registry.len());
        for conn in self.registry.iter() {
            reports.push(self.run_sync(conn).await);
        }
        reports
    }

    async fn run_sync(&self, conn: &ProviderConnection) -> SyncReport {
        let fetched = retry_fixed(conn.max_retries, conn.retry_delay_ms, || {
            self.fetcher.fetch_catalog(conn)
        })
        .await;

        match fetched {
            Ok(raw) => {
                let now = Utc::now();
                let products = self.adapters.adapter_for(&conn.id).normalize(&raw, conn, now);
                let product_count = products.len();
                self.cache.replace(&conn.id, products, now);
                tracing::info!(provider = %conn.id, count = product_count, "catalog sync complete");
                self.regenerate_menu();
                SyncReport {
                    provider_id: conn.id.clone(),
                    synced: true,
                    product_count,
                }
            }
            Err(e) => {
                tracing::error!(
                    provider = %conn.id,
                    error = %e,
                    "catalog sync failed after retries — keeping last known good"
                );
                SyncReport {
                    provider_id: conn.id.clone(),
                    synced: false,
                    product_count: self.cache.product_count(&conn.id),
                }
            }
        }
    }

    /// Every cached product, in registry-then-partition order.
    #[must_use]
    pub fn all_products(&self) -> Vec<Product> {
        self.cache.snapshot(self.registry.ids())
    }

    /// Cached products for one provider.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownProvider`] for an unregistered id.
    pub fn products_by_provider(&self, provider_id: &str) -> Result<Vec<Product>, EngineError> {
        if self.registry.get(provider_id).is_none() {
            return Err(EngineError::UnknownProvider(provider_id.to_string()));
        }
        Ok(self
            .cache
            .get(provider_id)
            .map(|products| products.to_vec())
            .unwrap_or_default())
    }

    /// Per-provider sync status, in registry order.
    #[must_use]
    pub fn provider_status(&self) -> Vec<ProviderStatus> {
        self.registry.iter().map(|conn| self.cache.status(conn)).collect()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let providers = self.provider_status();
        CacheStats {
            total_products: providers.iter().map(|p| p.product_count).sum(),
            provider_count: providers.len(),
            providers,
        }
    }

    /// Rebuild the menu from the current cache snapshot.
    ///
    /// Each generation gets a strictly increasing version. If generations
    /// race, every caller still receives its own freshly built menu, and
    /// the stored snapshot never moves backwards.
    pub fn regenerate_menu(&self) -> Arc<MenuStructure> {
        let products = self.all_products();
        let version = self.menu_version.fetch_add(1, Ordering::SeqCst) + 1;
        let menu = Arc::new(build_menu(&products, &self.menu_config, Utc::now(), version));

        let mut slot = self.current_menu.write().expect("menu lock poisoned");
        let newer_exists = slot.as_ref().is_some_and(|m| m.version > menu.version);
        if !newer_exists {
            *slot = Some(Arc::clone(&menu));
        }
        menu
    }

    /// The current menu snapshot, generating one on first use.
    #[must_use]
    pub fn current_menu(&self) -> Arc<MenuStructure> {
        if let Some(menu) = self.current_menu.read().expect("menu lock poisoned").as_ref() {
            return Arc::clone(menu);
        }
        self.regenerate_menu()
    }

    #[must_use]
    pub fn menu_by_category(&self, name: &str) -> Option<CategoryBucket> {
        self.current_menu().category(name).cloned()
    }

    #[must_use]
    pub fn featured_products(&self) -> Vec<MenuEntry> {
        self.current_menu().featured.products.clone()
    }

    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.current_menu()
            .category_names()
            .map(ToString::to_string)
            .collect()
    }

    #[must_use]
    pub fn menu_stats(&self) -> MenuStats {
        self.current_menu().stats
    }

    /// Search the current menu; see [`crate::query::search_menu`].
    #[must_use]
    pub fn search(&self, query: &str, filters: &SearchFilters) -> Vec<MenuEntry> {
        search_menu(&self.current_menu(), query, filters)
    }
}
