use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category assigned when a provider entry carries no category, or one
/// outside the provider's declared vocabulary.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Metadata key under which adapters store an entry's expiry instant
/// (RFC 3339). The menu generator reads only this key when re-deriving
/// availability.
pub const EXPIRES_AT_KEY: &str = "expires_at";

/// Tag that marks a product for the featured shelf.
pub const FEATURED_TAG: &str = "featured";

/// A purchasable item normalized from a provider's native schema.
///
/// Identity is composite: (`provider_id`, `external_id`). Instances are
/// created by the response adapters on each sync and replaced wholesale on
/// the next successful sync for their provider; they are never mutated in
/// place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub provider_id: String,
    /// Provider-native identifier, unique within one provider's catalog.
    pub external_id: String,
    pub name: String,
    /// One of the provider's declared categories, or [`FALLBACK_CATEGORY`].
    pub category: String,
    /// Non-negative amount in major units of `currency`.
    pub price: Decimal,
    /// ISO 4217 code (e.g., `"ZAR"`).
    pub currency: String,
    /// Raw availability flag as reported upstream. Effective availability
    /// is re-derived at menu time; see [`Product::is_effectively_available`].
    pub available: bool,
    pub description: Option<String>,
    /// Feature tags (lowercased by adapters), e.g. `["featured", "instant"]`.
    pub tags: Vec<String>,
    pub provider_name: String,
    pub updated_at: DateTime<Utc>,
    /// Opaque provider-specific fields the canonical shape has no slot for.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    /// Composite identity, `"{provider_id}:{external_id}"`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.provider_id, self.external_id)
    }

    /// Returns `true` if the product carries the [`FEATURED_TAG`].
    #[must_use]
    pub fn is_featured(&self) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(FEATURED_TAG))
    }

    /// Expiry instant from `metadata["expires_at"]`, if present and parseable.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.metadata
            .get(EXPIRES_AT_KEY)
            .and_then(serde_json::Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Availability as the menu reports it: `false` when the upstream flag
    /// is false or the metadata expiry is in the past, `true` otherwise.
    #[must_use]
    pub fn is_effectively_available(&self, now: DateTime<Utc>) -> bool {
        if !self.available {
            return false;
        }
        match self.expires_at() {
            Some(expiry) => expiry > now,
            None => true,
        }
    }
}
