use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Relative endpoint paths on a provider's API. Only `products` is called
/// by the sync engine; `pricing` and `availability` are provisioned for the
/// surrounding platform but unused here.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderEndpoints {
    pub products: String,
    #[serde(default)]
    pub pricing: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
}

/// Static connection settings for one external catalog provider.
///
/// Loaded once at startup from the providers file and immutable for the
/// process lifetime.
#[derive(Clone, Deserialize)]
pub struct ProviderConnection {
    pub id: String,
    pub name: String,
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub endpoints: ProviderEndpoints,
    /// Category vocabulary this provider is allowed to publish into.
    /// Entries outside it are normalized to the fallback category.
    pub categories: Vec<String>,
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Additional attempts after the first failure of a catalog fetch.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_sync_interval_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    5_000
}

impl ProviderConnection {
    /// Returns `true` if `category` is in this provider's declared vocabulary.
    #[must_use]
    pub fn declares_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

impl std::fmt::Debug for ProviderConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConnection")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .field("api_secret", &"[redacted]")
            .field("categories", &self.categories)
            .field("sync_interval_secs", &self.sync_interval_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct ProvidersFile {
    pub providers: Vec<ProviderConnection>,
}

/// Ordered, immutable set of provider connections.
///
/// Preserves declaration order from the providers file; that order is the
/// encounter order for cache snapshots and menu ties.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<ProviderConnection>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new(providers: Vec<ProviderConnection>) -> Self {
        Self { providers }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ProviderConnection> {
        self.providers.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderConnection> {
        self.providers.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.id.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl From<ProvidersFile> for ProviderRegistry {
    fn from(file: ProvidersFile) -> Self {
        Self::new(file.providers)
    }
}

/// Load and validate provider connections from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_providers(path: &Path) -> Result<ProvidersFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProvidersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let providers_file: ProvidersFile =
        serde_yaml::from_str(&content).map_err(ConfigError::ProvidersFileParse)?;

    validate_providers(&providers_file)?;

    Ok(providers_file)
}

fn validate_providers(file: &ProvidersFile) -> Result<(), ConfigError> {
    if file.providers.is_empty() {
        return Err(ConfigError::Validation(
            "providers file declares no providers".to_string(),
        ));
    }

    let mut seen_ids = HashSet::new();

    for provider in &file.providers {
        if provider.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "provider id must be non-empty".to_string(),
            ));
        }
        if provider.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "provider '{}' has an empty display name",
                provider.id
            )));
        }
        if !provider.base_url.starts_with("http://") && !provider.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "provider '{}' has invalid base_url '{}'",
                provider.id, provider.base_url
            )));
        }
        if provider.endpoints.products.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "provider '{}' has an empty products endpoint",
                provider.id
            )));
        }
        if provider.api_key.trim().is_empty() || provider.api_secret.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "provider '{}' is missing credentials",
                provider.id
            )));
        }
        if provider.sync_interval_secs == 0 {
            return Err(ConfigError::Validation(format!(
                "provider '{}' has a zero sync interval",
                provider.id
            )));
        }

        if !seen_ids.insert(provider.id.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate provider id: '{}'",
                provider.id
            )));
        }
    }

    Ok(())
}
